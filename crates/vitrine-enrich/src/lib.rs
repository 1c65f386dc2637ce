pub mod drive;
pub mod error;
pub mod previews;
pub mod videos;

pub use drive::DriveClient;
pub use error::EnrichError;
pub use previews::{run_preview_enrichment, PreviewStats};
pub use videos::{run_video_enrichment, VideoStats};
