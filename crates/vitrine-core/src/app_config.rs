use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

/// Resolved pipeline configuration, loaded once at startup from the process
/// environment and threaded explicitly through every component entry point.
#[derive(Clone)]
pub struct AppConfig {
    pub brands_csv_url: String,
    pub catalog_csv_url: String,
    pub mirror_log_url: Option<String>,
    pub drive_api_base: String,
    pub drive_api_key: Option<String>,
    pub video_base_url: Option<String>,
    pub output_path: PathBuf,
    pub report_path: PathBuf,
    pub placeholder_thumbnail: String,
    pub public_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub batch_size: usize,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("brands_csv_url", &self.brands_csv_url)
            .field("catalog_csv_url", &self.catalog_csv_url)
            .field("mirror_log_url", &self.mirror_log_url)
            .field("drive_api_base", &self.drive_api_base)
            .field(
                "drive_api_key",
                &self.drive_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("video_base_url", &self.video_base_url)
            .field("output_path", &self.output_path)
            .field("report_path", &self.report_path)
            .field("placeholder_thumbnail", &self.placeholder_thumbnail)
            .field("public_dir", &self.public_dir)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("batch_size", &self.batch_size)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl AppConfig {
    /// Drive API key, required by the preview-enrichment path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `VITRINE_DRIVE_API_KEY` was not set.
    pub fn require_drive_api_key(&self) -> Result<&str, ConfigError> {
        self.drive_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("VITRINE_DRIVE_API_KEY".to_string()))
    }

    /// Mirror-log CSV URL, required by the video-enrichment path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `VITRINE_MIRROR_LOG_URL` was not set.
    pub fn require_mirror_log_url(&self) -> Result<&str, ConfigError> {
        self.mirror_log_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("VITRINE_MIRROR_LOG_URL".to_string()))
    }

    /// Public base URL for mirrored videos, required by the video-enrichment path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `VITRINE_VIDEO_BASE_URL` was not set.
    pub fn require_video_base_url(&self) -> Result<&str, ConfigError> {
        self.video_base_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("VITRINE_VIDEO_BASE_URL".to_string()))
    }
}
