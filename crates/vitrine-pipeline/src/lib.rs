pub mod artifact;
pub mod builder;
pub mod count;
pub mod error;
pub mod fetch;
pub mod propagate;
pub mod rows;

pub use builder::build_tree;
pub use count::{count_products, find_missing_thumbnails, scan_media_links};
pub use error::PipelineError;
pub use fetch::SourceClient;
pub use propagate::propagate_thumbnails;
pub use rows::CatalogRow;
