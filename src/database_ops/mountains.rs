use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

use super::db::Db;
use super::models::{Image, Mountain, MountainWithRelations, NewMountain, NewStartingPoint, StartingPoint};

const MOUNTAIN_COLUMNS: &str = "id, slug, name, gaelic_name, meaning, height, terrain, views, \
     description, region, photographer_credit, seo_title, seo_description, published, \
     created_at, updated_at";

/// Published mountains ordered by name.
pub async fn get_all_mountains(db: &Db) -> Result<Vec<Mountain>> {
    let sql = format!("SELECT {MOUNTAIN_COLUMNS} FROM mountains WHERE published = true ORDER BY name");
    let rows = sqlx::query_as::<_, Mountain>(&sql)
        .persistent(false)
        .fetch_all(&db.pool)
        .await
        .context("fetching mountains")?;
    Ok(rows)
}

/// A published mountain plus its starting points (in display order) and images.
///
/// Relation fetch failures are logged and degrade to empty lists so the page
/// still renders.
pub async fn get_mountain_by_slug(db: &Db, slug: &str) -> Result<Option<MountainWithRelations>> {
    let sql = format!(
        "SELECT {MOUNTAIN_COLUMNS} FROM mountains WHERE slug = $1 AND published = true"
    );
    let Some(mountain) = sqlx::query_as::<_, Mountain>(&sql)
        .persistent(false)
        .bind(slug)
        .fetch_optional(&db.pool)
        .await
        .with_context(|| format!("fetching mountain {slug}"))?
    else {
        return Ok(None);
    };

    let starting_points = match starting_points_for(db, mountain.id).await {
        Ok(points) => points,
        Err(e) => {
            error!(slug, error = %e, "error fetching starting points");
            Vec::new()
        }
    };
    let images = match images_for(db, mountain.id).await {
        Ok(images) => images,
        Err(e) => {
            error!(slug, error = %e, "error fetching images");
            Vec::new()
        }
    };

    Ok(Some(MountainWithRelations {
        mountain,
        starting_points,
        images,
    }))
}

async fn starting_points_for(db: &Db, mountain_id: Uuid) -> Result<Vec<StartingPoint>> {
    let rows = sqlx::query_as::<_, StartingPoint>(
        "SELECT id, mountain_id, name, description, latitude, longitude, google_maps_url, \
         parking_available, difficulty, display_order \
         FROM starting_points WHERE mountain_id = $1 ORDER BY display_order",
    )
    .persistent(false)
    .bind(mountain_id)
    .fetch_all(&db.pool)
    .await?;
    Ok(rows)
}

async fn images_for(db: &Db, mountain_id: Uuid) -> Result<Vec<Image>> {
    let rows = sqlx::query_as::<_, Image>(
        "SELECT id, storage_path, title, caption, photographer_credit, alt_text, width, height, \
         mountain_id, is_featured, display_order \
         FROM images WHERE mountain_id = $1 ORDER BY display_order, storage_path",
    )
    .persistent(false)
    .bind(mountain_id)
    .fetch_all(&db.pool)
    .await?;
    Ok(rows)
}

/// Insert or refresh a mountain keyed on slug; returns its id.
pub async fn upsert_mountain(db: &Db, m: &NewMountain) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO mountains \
           (slug, name, gaelic_name, meaning, height, terrain, views, description, region, \
            seo_title, seo_description, published) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (slug) DO UPDATE SET \
           name = EXCLUDED.name, gaelic_name = EXCLUDED.gaelic_name, meaning = EXCLUDED.meaning, \
           height = EXCLUDED.height, terrain = EXCLUDED.terrain, views = EXCLUDED.views, \
           description = EXCLUDED.description, region = EXCLUDED.region, \
           seo_title = EXCLUDED.seo_title, seo_description = EXCLUDED.seo_description, \
           published = EXCLUDED.published, updated_at = now() \
         RETURNING id",
    )
    .persistent(false)
    .bind(&m.slug)
    .bind(&m.name)
    .bind(&m.gaelic_name)
    .bind(&m.meaning)
    .bind(m.height)
    .bind(&m.terrain)
    .bind(&m.views)
    .bind(&m.description)
    .bind(&m.region)
    .bind(&m.seo_title)
    .bind(&m.seo_description)
    .bind(m.published)
    .fetch_one(&db.pool)
    .await
    .with_context(|| format!("upserting mountain {}", m.slug))?;
    Ok(id)
}

/// Replace a mountain's starting points with `points`, so re-running the
/// import doesn't duplicate them.
pub async fn replace_starting_points(
    db: &Db,
    mountain_id: Uuid,
    points: &[NewStartingPoint],
) -> Result<usize> {
    let mut tx = db.pool.begin().await?;
    sqlx::query("DELETE FROM starting_points WHERE mountain_id = $1")
        .persistent(false)
        .bind(mountain_id)
        .execute(&mut *tx)
        .await?;
    for p in points {
        sqlx::query(
            "INSERT INTO starting_points \
               (mountain_id, name, description, latitude, longitude, google_maps_url, \
                difficulty, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .persistent(false)
        .bind(mountain_id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.latitude)
        .bind(p.longitude)
        .bind(&p.google_maps_url)
        .bind(&p.difficulty)
        .bind(p.display_order)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(points.len())
}

/// Writes performed by the mountain content migration.
#[async_trait]
pub trait MountainStore {
    async fn upsert_mountain(&self, m: &NewMountain) -> Result<Uuid>;
    async fn replace_starting_points(
        &self,
        mountain_id: Uuid,
        points: &[NewStartingPoint],
    ) -> Result<usize>;
}

#[async_trait]
impl MountainStore for Db {
    async fn upsert_mountain(&self, m: &NewMountain) -> Result<Uuid> {
        upsert_mountain(self, m).await
    }

    async fn replace_starting_points(
        &self,
        mountain_id: Uuid,
        points: &[NewStartingPoint],
    ) -> Result<usize> {
        replace_starting_points(self, mountain_id, points).await
    }
}

/// Slug -> id resolution used by the image link repair.
#[async_trait]
pub trait MountainLookup {
    async fn mountain_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>>;
}

#[async_trait]
impl MountainLookup for Db {
    async fn mountain_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM mountains WHERE slug = $1")
            .persistent(false)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }
}
