//! Parsers for the legacy static ExploreTheMournes site.
//!
//! The old site is a flat directory of hand-written HTML pages plus an
//! `images/` tree. Mountain pages are every top-level `.html` file that is not
//! in [`MOUNTAIN_SKIP_LIST`]; activity and place pages come from fixed lists.

pub mod content_page;
pub mod mountain;
pub mod sections;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use content_page::{parse_content_page, parse_content_page_file, slug_for_file, ParsedPage};
pub use mountain::{parse_mountain_document, parse_mountain_html, ParsedMountain};

/// Top-level pages that are not mountains.
pub const MOUNTAIN_SKIP_LIST: [&str; 13] = [
    "index.html",
    "contact.html",
    "tips.html",
    "weather.html",
    "introduction.html",
    "maps.html",
    "fell-running.html",
    "hikingclubs.html",
    "mournes-triathlons.html",
    "mountaincode.html",
    "game-of-thrones.html",
    "mourne-wall.html",
    "silent-valley.html",
];

pub const ACTIVITY_FILES: [&str; 7] = [
    "fell-running.html",
    "hikingclubs.html",
    "mournes-triathlons.html",
    "mountaincode.html",
    "tips.html",
    "introduction.html",
    "weather.html",
];

pub const PLACE_FILES: [&str; 7] = [
    "game-of-thrones.html",
    "mourne-wall.html",
    "silent-valley.html",
    "spelga-dam.html",
    "lough-shannagh.html",
    "devils-coachroad.html",
    "windy-gap.html",
];

pub fn is_mountain_candidate(file_name: &str) -> bool {
    file_name.ends_with(".html") && !MOUNTAIN_SKIP_LIST.contains(&file_name)
}

/// Mountain page candidates directly under `site_root`, sorted by file name.
pub fn list_mountain_files(site_root: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(site_root)
        .with_context(|| format!("reading legacy site dir {}", site_root.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(is_mountain_candidate) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
