//! Legacy image discovery, bucket/path mapping and WebP re-encoding.

pub mod optimize;
pub mod paths;
pub mod walk;

pub use optimize::{optimize_image, OptimizedImage, DEFAULT_MAX_WIDTH, WEBP_CONTENT_TYPE};
pub use paths::{bucket_for_image, storage_path_for, Bucket};
pub use walk::{collect_image_files, is_image_file};
