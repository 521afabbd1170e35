use std::fmt;
use std::path::{Component, Path};

/// Storage buckets the legacy images are spread across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Backgrounds,
    MountainImages,
    ContentImages,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [
        Bucket::MountainImages,
        Bucket::Backgrounds,
        Bucket::ContentImages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Backgrounds => "backgrounds",
            Bucket::MountainImages => "mountain-images",
            Bucket::ContentImages => "content-images",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn relative_slash_path(base: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(base).unwrap_or(file);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Bucket for a legacy image, decided by its path relative to the site root.
/// Backgrounds win over mountains when both words appear.
pub fn bucket_for_image(site_root: &Path, file: &Path) -> Bucket {
    let rel = relative_slash_path(site_root, file).to_lowercase();
    if rel.contains("background") {
        Bucket::Backgrounds
    } else if rel.contains("mountain") {
        Bucket::MountainImages
    } else {
        Bucket::ContentImages
    }
}

/// Path inside the bucket: the file's location under `images_root` with the
/// extension normalized to `.webp`, always forward slashes.
pub fn storage_path_for(images_root: &Path, file: &Path) -> String {
    let webp = file.with_extension("webp");
    relative_slash_path(images_root, &webp)
}
