pub mod app_config;
pub mod brand;
pub mod catalog;
pub mod config;
pub mod csv;
pub mod error;
pub mod medialink;
pub mod path;
pub mod report;

pub use app_config::AppConfig;
pub use brand::Brand;
pub use catalog::{Artifact, BuildStamp, Catalog, CatalogNode, DriveFile, VideoFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use report::{BuildReport, Warning, WarningKind};
