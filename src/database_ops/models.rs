// Row types for the portal tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mountain {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub gaelic_name: Option<String>,
    pub meaning: Option<String>,
    pub height: Option<i32>,
    pub terrain: Option<String>,
    pub views: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub photographer_credit: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert/upsert payload for a mountain parsed from the legacy site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMountain {
    pub slug: String,
    pub name: String,
    pub gaelic_name: Option<String>,
    pub meaning: Option<String>,
    pub height: Option<i32>,
    pub terrain: Option<String>,
    pub views: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StartingPoint {
    pub id: Uuid,
    pub mountain_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_maps_url: Option<String>,
    pub parking_available: bool,
    pub difficulty: Option<String>,
    pub display_order: i32,
}

impl StartingPoint {
    /// Both coordinates present and non-zero.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some((lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStartingPoint {
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_maps_url: Option<String>,
    pub difficulty: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    /// `bucket/path/inside/bucket.webp`
    pub storage_path: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub photographer_credit: Option<String>,
    pub alt_text: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub mountain_id: Option<Uuid>,
    pub is_featured: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImage {
    pub storage_path: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Minimal projection used by the link-repair and listing jobs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnlinkedImage {
    pub id: Uuid,
    pub storage_path: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MountainWithRelations {
    #[serde(flatten)]
    pub mountain: Mountain,
    pub starting_points: Vec<StartingPoint>,
    pub images: Vec<Image>,
}

/// One accordion block of an activity or place page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(rename = "type", default = "ContentSection::default_kind")]
    pub kind: String,
    pub title: String,
    /// Trusted HTML carried over from the legacy site.
    pub content: String,
}

impl ContentSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: Self::default_kind(),
            title: title.into(),
            content: content.into(),
        }
    }

    fn default_kind() -> String {
        "section".to_string()
    }
}

/// Loosely-typed JSON blob stored in `activities.content` / `places.content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sections: Vec<ContentSection>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    #[serde(default)]
    pub background_image_path: Option<String>,
}

/// Activities and places share one row shape; places add coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentPage {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: Json<PageContent>,
    pub published: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentPage {
    pub slug: String,
    pub title: String,
    pub content: PageContent,
    pub published: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Activity,
    Place,
}

impl ContentKind {
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Activity => "activities",
            ContentKind::Place => "places",
        }
    }

    /// URL prefix under which the pages are served.
    pub fn route(self) -> &'static str {
        self.table()
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Activity => "Activity",
            ContentKind::Place => "Place",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_content_tolerates_missing_fields() {
        let c: PageContent = serde_json::from_str(r#"{"sections":[{"title":"A","content":"<p>x</p>"}]}"#)
            .unwrap();
        assert_eq!(c.subtitle, None);
        assert_eq!(c.sections.len(), 1);
        assert_eq!(c.sections[0].kind, "section");
        assert!(c.gallery_images.is_empty());

        let empty: PageContent = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PageContent::default());
    }

    #[test]
    fn section_serializes_kind_as_type() {
        let v = serde_json::to_value(ContentSection::new("Intro", "<p>hi</p>")).unwrap();
        assert_eq!(v["type"], "section");
        assert_eq!(v["title"], "Intro");
    }

    #[test]
    fn content_kind_tables() {
        assert_eq!(ContentKind::Activity.table(), "activities");
        assert_eq!(ContentKind::Place.table(), "places");
    }
}
