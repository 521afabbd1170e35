//! One-shot batch jobs that move the legacy site into the database and
//! object store.
//!
//! Every job walks its inputs sequentially, finishes one item before starting
//! the next, sleeps a fixed delay between items, logs per-item failures and
//! keeps going. The returned [`MigrationSummary`] is what the CLI prints.

pub mod content;
pub mod fix_links;
pub mod images;
pub mod pages;
pub mod unlinked;

use std::fmt;
use std::time::Duration;

pub use content::migrate_content;
pub use fix_links::{fix_image_links, slug_candidates};
pub use images::migrate_images;
pub use pages::migrate_pages;
pub use unlinked::{group_unlinked, list_unlinked_images};

pub const CONTENT_DELAY: Duration = Duration::from_millis(100);
pub const IMAGE_DELAY: Duration = Duration::from_millis(200);
pub const LINK_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSummary {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl MigrationSummary {
    pub fn record(&mut self, ok: bool) {
        if ok {
            self.success += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }
}

impl std::ops::AddAssign for MigrationSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.success += rhs.success;
        self.failed += rhs.failed;
        self.skipped += rhs.skipped;
    }
}

impl fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Success: {}\nFailed: {}\nSkipped: {}",
            self.success, self.failed, self.skipped
        )
    }
}

/// Per-item pause; a zero delay skips the timer entirely.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
