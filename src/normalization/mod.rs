//! Text normalization shared by the legacy importer and the link-repair job.

pub mod coords;
pub mod slug;
pub mod text;

pub use coords::{extract_coordinates_from_url, Coordinates};
pub use slug::slugify;
pub use text::{clean_text, extract_height};
