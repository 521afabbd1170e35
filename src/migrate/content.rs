use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::{pause, MigrationSummary};
use crate::database_ops::MountainStore;
use crate::legacy::{list_mountain_files, parse_mountain_html};

/// Parse every mountain page under `site_root` and upsert it with its
/// starting points. Fails only when the site directory itself can't be read.
#[instrument(skip(store), fields(site_root = %site_root.display()))]
pub async fn migrate_content<S>(store: &S, site_root: &Path, delay: Duration) -> Result<MigrationSummary>
where
    S: MountainStore + Sync + ?Sized,
{
    let files = list_mountain_files(site_root)?;
    info!(count = files.len(), "mountain pages found");

    let mut summary = MigrationSummary::default();
    for (i, path) in files.iter().enumerate() {
        let file = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        info!(n = i + 1, of = files.len(), %file, "processing");

        let parsed = match parse_mountain_html(path) {
            Ok(p) => p,
            Err(e) => {
                warn!(%file, error = %e, "could not parse mountain page");
                summary.record(false);
                pause(delay).await;
                continue;
            }
        };

        let slug = parsed.mountain.slug.clone();
        let stored = match store.upsert_mountain(&parsed.mountain).await {
            Ok(mountain_id) => {
                match store.replace_starting_points(mountain_id, &parsed.starting_points).await {
                    Ok(n) => info!(%slug, starting_points = n, "mountain stored"),
                    // The mountain row is in; a bad starting point doesn't fail the page.
                    Err(e) => error!(%slug, error = %e, "error inserting starting points"),
                }
                true
            }
            Err(e) => {
                error!(%slug, error = %e, "error inserting mountain");
                false
            }
        };
        summary.record(stored);
        pause(delay).await;
    }
    info!(total = summary.total(), failed = summary.failed, "mountain pages done");
    Ok(summary)
}
