//! Artifact and report persistence.
//!
//! The artifact is the single JSON document the client-side viewer consumes.
//! Enrichment runs load it back with [`load_artifact`], mutate it, and
//! overwrite it with [`write_artifact`]; a malformed root document is a hard
//! error.

use std::path::Path;

use vitrine_core::catalog::Artifact;
use vitrine_core::report::BuildReport;

use crate::error::PipelineError;

/// Number of sample entries per list included in the build-health report.
pub const REPORT_SAMPLE_LIMIT: usize = 20;

/// Serialize the artifact to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`PipelineError::ArtifactIo`] on filesystem failure.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<(), PipelineError> {
    let json = serde_json::to_string(artifact).map_err(|e| PipelineError::ArtifactParse {
        path: path.display().to_string(),
        source: e,
    })?;
    write_text(path, &json)
}

/// Load the artifact back from disk.
///
/// # Errors
///
/// - [`PipelineError::ArtifactIo`] — file unreadable.
/// - [`PipelineError::ArtifactParse`] — malformed root JSON structure.
pub fn load_artifact(path: &Path) -> Result<Artifact, PipelineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::ArtifactIo {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| PipelineError::ArtifactParse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write the build-health report with sample lists truncated to
/// [`REPORT_SAMPLE_LIMIT`].
///
/// # Errors
///
/// Returns [`PipelineError::ArtifactIo`] on filesystem failure.
pub fn write_report(path: &Path, report: &BuildReport) -> Result<(), PipelineError> {
    let summary = report.summarize(REPORT_SAMPLE_LIMIT);
    let json =
        serde_json::to_string_pretty(&summary).map_err(|e| PipelineError::ArtifactParse {
            path: path.display().to_string(),
            source: e,
        })?;
    write_text(path, &json)
}

fn write_text(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let io_err = |e: std::io::Error| PipelineError::ArtifactIo {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    std::fs::write(path, contents).map_err(io_err)
}
