// Activities and places share one table shape, so one set of queries serves both.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::types::Json;

use super::db::Db;
use super::models::{ContentKind, ContentPage, NewContentPage};

fn select_columns(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Place => {
            "id, slug, title, content, published, seo_title, seo_description, \
             latitude, longitude, created_at"
        }
        // Activities carry no coordinates.
        ContentKind::Activity => {
            "id, slug, title, content, published, seo_title, seo_description, \
             NULL::float8 AS latitude, NULL::float8 AS longitude, created_at"
        }
    }
}

/// Published pages of one kind ordered by title.
pub async fn list_published(db: &Db, kind: ContentKind) -> Result<Vec<ContentPage>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE published = true ORDER BY title",
        select_columns(kind),
        kind.table()
    );
    let rows = sqlx::query_as::<_, ContentPage>(&sql)
        .persistent(false)
        .fetch_all(&db.pool)
        .await
        .with_context(|| format!("fetching {}", kind.table()))?;
    Ok(rows)
}

pub async fn get_published_by_slug(
    db: &Db,
    kind: ContentKind,
    slug: &str,
) -> Result<Option<ContentPage>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE slug = $1 AND published = true",
        select_columns(kind),
        kind.table()
    );
    let row = sqlx::query_as::<_, ContentPage>(&sql)
        .persistent(false)
        .bind(slug)
        .fetch_optional(&db.pool)
        .await
        .with_context(|| format!("fetching {} {slug}", kind.label()))?;
    Ok(row)
}

/// Insert or update keyed on slug.
pub async fn upsert_content_page(db: &Db, kind: ContentKind, page: &NewContentPage) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (slug, title, content, published, seo_title, seo_description) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (slug) DO UPDATE SET \
           title = EXCLUDED.title, content = EXCLUDED.content, published = EXCLUDED.published, \
           seo_title = EXCLUDED.seo_title, seo_description = EXCLUDED.seo_description",
        kind.table()
    );
    sqlx::query(&sql)
        .persistent(false)
        .bind(&page.slug)
        .bind(&page.title)
        .bind(Json(&page.content))
        .bind(page.published)
        .bind(&page.seo_title)
        .bind(&page.seo_description)
        .execute(&db.pool)
        .await
        .with_context(|| format!("upserting {} {}", kind.label(), page.slug))?;
    Ok(())
}

#[async_trait]
pub trait ContentStore {
    async fn upsert_content_page(&self, kind: ContentKind, page: &NewContentPage) -> Result<()>;
}

#[async_trait]
impl ContentStore for Db {
    async fn upsert_content_page(&self, kind: ContentKind, page: &NewContentPage) -> Result<()> {
        upsert_content_page(self, kind, page).await
    }
}
