use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument};

use super::{pause, MigrationSummary};
use crate::database_ops::images::insert_image;
use crate::database_ops::models::NewImage;
use crate::database_ops::Db;
use crate::media::{
    bucket_for_image, collect_image_files, optimize_image, storage_path_for, Bucket,
    DEFAULT_MAX_WIDTH, WEBP_CONTENT_TYPE,
};
use crate::storage::StorageClient;

/// Where one legacy file ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    pub bucket: Bucket,
    /// Path inside the bucket.
    pub path: String,
    pub original_filename: String,
}

impl ImagePlan {
    /// `bucket/path` as stored in the `images` table.
    pub fn storage_path(&self) -> String {
        format!("{}/{}", self.bucket, self.path)
    }

    pub fn metadata(&self, width: u32, height: u32) -> NewImage {
        NewImage {
            storage_path: self.storage_path(),
            title: Some(self.original_filename.clone()),
            caption: None,
            alt_text: self.original_filename.clone(),
            width: i32::try_from(width).ok(),
            height: i32::try_from(height).ok(),
        }
    }
}

pub fn plan_image(site_root: &Path, images_root: &Path, file: &Path) -> ImagePlan {
    ImagePlan {
        bucket: bucket_for_image(site_root, file),
        path: storage_path_for(images_root, file),
        original_filename: file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Re-encode and upload every image under `<site_root>/images`.
#[instrument(skip(db, storage), fields(site_root = %site_root.display()))]
pub async fn migrate_images(
    db: &Db,
    storage: &StorageClient,
    site_root: &Path,
    delay: Duration,
) -> Result<MigrationSummary> {
    let images_root = site_root.join("images");
    if !images_root.is_dir() {
        bail!("images path not found: {}", images_root.display());
    }
    let files = collect_image_files(&images_root);
    info!(count = files.len(), "image files found");

    let mut summary = MigrationSummary::default();
    for (i, file) in files.iter().enumerate() {
        let plan = plan_image(site_root, &images_root, file);
        info!(n = i + 1, of = files.len(), bucket = %plan.bucket, path = %plan.path, "processing");
        let uploaded = match process_image(db, storage, file, &plan).await {
            Ok(size) => {
                info!(path = %plan.path, kb = size / 1024, "uploaded");
                true
            }
            Err(e) => {
                error!(file = %file.display(), error = %e, "failed to process image");
                false
            }
        };
        summary.record(uploaded);
        pause(delay).await;
    }
    info!(total = summary.total(), failed = summary.failed, "image migration done");
    Ok(summary)
}

async fn process_image(db: &Db, storage: &StorageClient, file: &Path, plan: &ImagePlan) -> Result<usize> {
    let raw = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    // Decode and resize are CPU-bound.
    let optimized = tokio::task::spawn_blocking(move || optimize_image(&raw, DEFAULT_MAX_WIDTH))
        .await
        .context("optimize task panicked")??;
    let size = optimized.bytes.len();

    storage
        .upload(
            plan.bucket.as_str(),
            &plan.path,
            optimized.bytes.clone(),
            WEBP_CONTENT_TYPE,
            true,
        )
        .await?;

    // Upload succeeded; a metadata failure is logged but the file is already in place.
    if let Err(e) = insert_image(db, &plan.metadata(optimized.width, optimized.height)).await {
        error!(storage_path = %plan.storage_path(), error = %e, "error inserting image metadata");
    }
    Ok(size)
}
