use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// OS droppings that show up in old site dumps.
const SYSTEM_FILES: [&str; 3] = ["Thumbs.db", ".DS_Store", "desktop.ini"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

fn is_system_file(name: &str) -> bool {
    SYSTEM_FILES.contains(&name)
}

/// Every image under `root`, recursively, sorted. Unreadable entries are
/// logged and skipped.
pub fn collect_image_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_str().is_some_and(is_system_file));
    for entry in walker {
        match entry {
            Ok(e) if e.file_type().is_file() && is_image_file(e.path()) => {
                files.push(e.into_path());
            }
            Ok(_) => {}
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
            }
        }
    }
    files.sort();
    files
}
