use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::database_ops::images::unlinked_images;
use crate::database_ops::Db;

const PREVIEW: usize = 5;

/// Group storage paths by `bucket/dir`; files sitting directly in a bucket go
/// under `bucket/root`. Keys come back sorted.
pub fn group_unlinked<'a, I>(paths: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        let parts: Vec<&str> = path.split('/').collect();
        let dir = if parts.len() > 2 { parts[1] } else { "root" };
        grouped
            .entry(format!("{}/{dir}", parts[0]))
            .or_default()
            .push(path.to_string());
    }
    grouped
}

pub fn render_report(total: usize, grouped: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {total} unlinked images:");
    if grouped.is_empty() {
        return out;
    }
    for (key, paths) in grouped {
        let _ = writeln!(out, "\n{key}/ ({} images):", paths.len());
        for p in paths.iter().take(PREVIEW) {
            let _ = writeln!(out, "  - {p}");
        }
        if paths.len() > PREVIEW {
            let _ = writeln!(out, "  ... and {} more", paths.len() - PREVIEW);
        }
    }
    let _ = writeln!(out, "\n{}", "=".repeat(60));
    let _ = writeln!(out, "Summary:");
    for (key, paths) in grouped {
        let _ = writeln!(out, "  {key}: {} images", paths.len());
    }
    out
}

/// Report of images still missing a mountain link, ready for stdout.
pub async fn list_unlinked_images(db: &Db) -> Result<String> {
    let images = unlinked_images(db).await?;
    let grouped = group_unlinked(images.iter().map(|i| i.storage_path.as_str()));
    Ok(render_report(images.len(), &grouped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_bucket_and_directory() {
        let g = group_unlinked([
            "mountain-images/donard/1.webp",
            "backgrounds/bearnagh-bg.webp",
            "mountain-images/donard/2.webp",
            "mountain-images/binnian/a.webp",
        ]);
        let keys: Vec<&str> = g.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["backgrounds/root", "mountain-images/binnian", "mountain-images/donard"]
        );
        assert_eq!(g["mountain-images/donard"].len(), 2);
    }

    #[test]
    fn report_previews_five_per_group() {
        let paths: Vec<String> = (1..=7).map(|i| format!("content-images/walks/{i}.webp")).collect();
        let g = group_unlinked(paths.iter().map(String::as_str));
        let report = render_report(7, &g);
        assert!(report.starts_with("Found 7 unlinked images:"));
        assert!(report.contains("content-images/walks/ (7 images):"));
        assert!(report.contains("  - content-images/walks/5.webp"));
        assert!(!report.contains("  - content-images/walks/6.webp"));
        assert!(report.contains("  ... and 2 more"));
        assert!(report.contains("  content-images/walks: 7 images"));
    }

    #[test]
    fn empty_report_has_no_summary() {
        let report = render_report(0, &BTreeMap::new());
        assert_eq!(report, "Found 0 unlinked images:\n");
    }
}
