use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use super::db::Db;
use super::models::{NewImage, UnlinkedImage};
use super::mountains::MountainLookup;

pub async fn insert_image(db: &Db, img: &NewImage) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO images (storage_path, title, caption, alt_text, width, height) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .persistent(false)
    .bind(&img.storage_path)
    .bind(&img.title)
    .bind(&img.caption)
    .bind(&img.alt_text)
    .bind(img.width)
    .bind(img.height)
    .fetch_one(&db.pool)
    .await
    .with_context(|| format!("inserting image metadata for {}", img.storage_path))?;
    Ok(id)
}

/// Images with no owning mountain, ordered by storage path.
pub async fn unlinked_images(db: &Db) -> Result<Vec<UnlinkedImage>> {
    let rows = sqlx::query_as::<_, UnlinkedImage>(
        "SELECT id, storage_path, title FROM images WHERE mountain_id IS NULL ORDER BY storage_path",
    )
    .persistent(false)
    .fetch_all(&db.pool)
    .await
    .context("fetching unlinked images")?;
    Ok(rows)
}

pub async fn link_image(db: &Db, image_id: Uuid, mountain_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE images SET mountain_id = $1 WHERE id = $2")
        .persistent(false)
        .bind(mountain_id)
        .bind(image_id)
        .execute(&db.pool)
        .await
        .with_context(|| format!("linking image {image_id}"))?;
    Ok(())
}

pub async fn count_images(db: &Db) -> Result<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM images")
        .persistent(false)
        .fetch_one(&db.pool)
        .await?;
    Ok(n)
}

/// Reads and writes behind the image link repair.
#[async_trait]
pub trait ImageLinks: MountainLookup {
    async fn unlinked_images(&self) -> Result<Vec<UnlinkedImage>>;
    async fn link_image(&self, image_id: Uuid, mountain_id: Uuid) -> Result<()>;
}

#[async_trait]
impl ImageLinks for Db {
    async fn unlinked_images(&self) -> Result<Vec<UnlinkedImage>> {
        unlinked_images(self).await
    }

    async fn link_image(&self, image_id: Uuid, mountain_id: Uuid) -> Result<()> {
        link_image(self, image_id, mountain_id).await
    }
}
