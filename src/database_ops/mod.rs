pub mod contact;
pub mod content;
pub mod db;
pub mod images;
pub mod models;
pub mod mountains;

pub use db::Db;
pub use content::ContentStore;
pub use images::ImageLinks;
pub use mountains::{MountainLookup, MountainStore};
