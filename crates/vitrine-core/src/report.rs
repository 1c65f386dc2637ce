//! Build-health accumulator and its serialized report form.

use serde::Serialize;

/// Category of a non-fatal build warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    InvalidColor,
    InvalidContactUrl,
    DuplicateSlug,
    EmptyBrandRow,
    DuplicateProductPath,
    FolderProductConflict,
    UnmatchedMediaLink,
}

#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

/// A node whose thumbnail references a file that does not exist on disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingThumbnail {
    /// Full tree path of the node.
    pub path: String,
    /// Thumbnail reference as recorded on the node.
    pub thumbnail: String,
}

/// Mutable accumulator carried through a build run.
///
/// Warnings never abort the run; they are collected here, logged by the
/// caller, and sampled into the serialized report.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub brand_count: usize,
    pub product_count: usize,
    pub category_count: usize,
    pub warnings: Vec<Warning>,
    pub invalid_links: Vec<String>,
    pub missing_thumbnails: Vec<MissingThumbnail>,
}

impl BuildReport {
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.warnings.push(Warning {
            kind,
            message: message.into(),
        });
    }

    /// Serializable summary with each sample list truncated to `sample_limit`.
    #[must_use]
    pub fn summarize(&self, sample_limit: usize) -> ReportSummary {
        ReportSummary {
            brand_count: self.brand_count,
            product_count: self.product_count,
            category_count: self.category_count,
            warning_count: self.warnings.len(),
            invalid_link_count: self.invalid_links.len(),
            missing_thumbnail_count: self.missing_thumbnails.len(),
            warnings: self.warnings.iter().take(sample_limit).cloned().collect(),
            invalid_links: self
                .invalid_links
                .iter()
                .take(sample_limit)
                .cloned()
                .collect(),
            missing_thumbnails: self
                .missing_thumbnails
                .iter()
                .take(sample_limit)
                .cloned()
                .collect(),
        }
    }
}

/// The build-health report as written to disk.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub brand_count: usize,
    pub product_count: usize,
    pub category_count: usize,
    pub warning_count: usize,
    pub invalid_link_count: usize,
    pub missing_thumbnail_count: usize,
    pub warnings: Vec<Warning>,
    pub invalid_links: Vec<String>,
    pub missing_thumbnails: Vec<MissingThumbnail>,
}
