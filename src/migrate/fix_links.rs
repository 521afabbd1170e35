use anyhow::Result;
use itertools::Itertools;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{pause, MigrationSummary};
use crate::database_ops::{ImageLinks, MountainLookup};
use crate::media::Bucket;

const IMAGE_EXTENSIONS: [&str; 4] = [".webp", ".jpg", ".jpeg", ".png"];

/// Mountain slugs an orphaned image might belong to, most likely first.
///
/// `backgrounds/bearnagh-bg.webp` yields `bearnagh-bg.webp`, `bearnagh-bg`,
/// `bearnagh` and `slieve-bearnagh`; top-level files keep their extension in
/// the first candidate.
pub fn slug_candidates(storage_path: &str) -> Vec<String> {
    let lower = storage_path.to_lowercase();
    let inner = Bucket::ALL
        .iter()
        .find_map(|b| lower.strip_prefix(&format!("{}/", b.as_str())))
        .unwrap_or(&lower);

    let first = inner.split('/').next().unwrap_or_default();
    let last = inner.rsplit('/').next().unwrap_or_default();
    let filename = IMAGE_EXTENSIONS
        .iter()
        .find_map(|ext| last.strip_suffix(ext))
        .unwrap_or(last);

    let base = [
        first,
        filename,
        filename.strip_suffix("-bg").unwrap_or(filename),
        filename.strip_suffix("-background").unwrap_or(filename),
    ];
    let slieve = base
        .iter()
        .filter(|p| !p.starts_with("slieve-") && p.len() < 10)
        .map(|p| format!("slieve-{p}"));

    base.iter()
        .map(|s| s.to_string())
        .chain(slieve)
        .filter(|s| !s.is_empty())
        .unique()
        .collect()
}

/// First candidate that resolves to a mountain, tried in order.
pub async fn find_mountain<L>(lookup: &L, candidates: &[String]) -> Result<Option<(String, Uuid)>>
where
    L: MountainLookup + Sync + ?Sized,
{
    for slug in candidates {
        if let Some(id) = lookup.mountain_id_by_slug(slug).await? {
            return Ok(Some((slug.clone(), id)));
        }
    }
    Ok(None)
}

/// Link every image without a mountain to the first mountain whose slug
/// matches a candidate. Images with no match are counted as skipped.
#[instrument(skip(store))]
pub async fn fix_image_links<S>(store: &S, delay: Duration) -> Result<MigrationSummary>
where
    S: ImageLinks + Sync + ?Sized,
{
    let images = store.unlinked_images().await?;
    info!(count = images.len(), "unlinked images");

    let mut summary = MigrationSummary::default();
    for img in &images {
        let candidates = slug_candidates(&img.storage_path);
        info!(path = %img.storage_path, tried = %candidates.join(", "), "matching");

        match find_mountain(store, &candidates).await {
            Ok(Some((slug, mountain_id))) => {
                let linked = match store.link_image(img.id, mountain_id).await {
                    Ok(()) => {
                        info!(path = %img.storage_path, %slug, "linked");
                        true
                    }
                    Err(e) => {
                        warn!(path = %img.storage_path, error = %e, "error linking image");
                        false
                    }
                };
                summary.record(linked);
            }
            Ok(None) => {
                info!(path = %img.storage_path, "no matching mountain");
                summary.skipped += 1;
            }
            Err(e) => {
                warn!(path = %img.storage_path, error = %e, "mountain lookup failed");
                summary.record(false);
            }
        }
        pause(delay).await;
    }
    info!(total = summary.total(), linked = summary.success, "link repair done");
    Ok(summary)
}
