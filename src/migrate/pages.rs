use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::{pause, MigrationSummary};
use crate::database_ops::models::ContentKind;
use crate::database_ops::ContentStore;
use crate::legacy::{parse_content_page_file, slug_for_file, ACTIVITY_FILES, PLACE_FILES};

/// Activities first, then places. Returns the combined summary.
pub async fn migrate_pages<S>(store: &S, site_root: &Path, delay: Duration) -> Result<MigrationSummary>
where
    S: ContentStore + Sync + ?Sized,
{
    let mut total = migrate_kind(store, site_root, ContentKind::Activity, &ACTIVITY_FILES, delay).await;
    total += migrate_kind(store, site_root, ContentKind::Place, &PLACE_FILES, delay).await;
    Ok(total)
}

#[instrument(skip(store, files), fields(kind = kind.table()))]
async fn migrate_kind<S>(
    store: &S,
    site_root: &Path,
    kind: ContentKind,
    files: &[&str],
    delay: Duration,
) -> MigrationSummary
where
    S: ContentStore + Sync + ?Sized,
{
    let mut summary = MigrationSummary::default();
    for file in files {
        let path = site_root.join(file);
        if !path.is_file() {
            warn!(%file, "file not found");
            summary.skipped += 1;
            continue;
        }

        let parsed = match parse_content_page_file(&path) {
            Ok(p) => p,
            Err(e) => {
                error!(%file, error = %e, "could not parse page");
                summary.record(false);
                pause(delay).await;
                continue;
            }
        };
        let title = parsed.title.clone();
        let page = parsed.into_new_page(slug_for_file(file));
        let stored = match store.upsert_content_page(kind, &page).await {
            Ok(()) => {
                info!(%title, slug = %page.slug, sections = page.content.sections.len(), "migrated");
                true
            }
            Err(e) => {
                error!(%title, error = %e, "error inserting page");
                false
            }
        };
        summary.record(stored);
        pause(delay).await;
    }
    info!(
        migrated = summary.success,
        of = files.len(),
        skipped = summary.skipped,
        "{} done",
        kind.table()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_ops::models::NewContentPage;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        reject_slug: Option<&'static str>,
        stored: Mutex<Vec<(ContentKind, String)>>,
    }

    #[async_trait]
    impl ContentStore for FakeStore {
        async fn upsert_content_page(&self, kind: ContentKind, page: &NewContentPage) -> Result<()> {
            if self.reject_slug == Some(page.slug.as_str()) {
                bail!("connection reset");
            }
            self.stored.lock().unwrap().push((kind, page.slug.clone()));
            Ok(())
        }
    }

    fn page(title: &str) -> String {
        format!("<html><head><title>{title}</title></head><body><h2>{title}</h2></body></html>")
    }

    #[tokio::test]
    async fn missing_files_skip_and_failures_continue() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("fell-running.html"), page("Fell Running")).unwrap();
        fs::write(root.join("tips.html"), b"\xff\xfe\x00\x81").unwrap();
        fs::write(root.join("weather.html"), page("Weather")).unwrap();
        fs::write(root.join("mourne-wall.html"), page("The Mourne Wall")).unwrap();

        let store = FakeStore {
            reject_slug: Some("weather"),
            ..FakeStore::default()
        };
        let summary = migrate_pages(&store, root, Duration::ZERO).await.unwrap();

        let listed = ACTIVITY_FILES.len() + PLACE_FILES.len();
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, listed - 4);
        assert_eq!(summary.total(), listed);
        assert_eq!(
            *store.stored.lock().unwrap(),
            vec![
                (ContentKind::Activity, "fell-running".to_string()),
                (ContentKind::Place, "mourne-wall".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_site_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = FakeStore::default();
        let summary = migrate_pages(&store, dir.path(), Duration::ZERO).await.unwrap();
        assert_eq!(summary.success + summary.failed, 0);
        assert_eq!(summary.skipped, ACTIVITY_FILES.len() + PLACE_FILES.len());
    }
}
