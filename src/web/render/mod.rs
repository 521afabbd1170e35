//! Server-side HTML for the public site.
//!
//! Everything interpolated into markup goes through [`escape::escape`] except
//! activity/place section bodies, which are HTML imported from the legacy site.

pub mod accordion;
pub mod escape;
pub mod gallery;
pub mod layout;
pub mod map;
pub mod pages;

pub use accordion::{render_accordion, AccordionSection};
pub use escape::escape;
pub use gallery::{render_gallery, GalleryImage};
pub use layout::{document, PageMeta};
pub use map::{calculate_center, render_map, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use pages::RenderContext;
