//! Path-matched video enrichment from the mirror log.
//!
//! The mirror log is a CSV describing a file-copy operation from an external
//! source tree into object storage. Rows flagged as found are indexed by
//! normalized folder path; catalog products are then matched by their own
//! normalized tree path. A miss is the common case — most products have no
//! video coverage — and is neither an error nor logged.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use vitrine_core::catalog::{for_each_product_mut, BuildStamp, CatalogNode, VideoFile};
use vitrine_core::csv::Table;
use vitrine_core::path::match_key;
use vitrine_core::AppConfig;
use vitrine_pipeline::artifact::{load_artifact, write_artifact};
use vitrine_pipeline::SourceClient;

use crate::error::EnrichError;

/// Folder-path value marking the mirror root; such rows describe no product
/// folder and are excluded from the index.
const ROOT_SENTINEL: &str = "root";

#[derive(Debug, Default, Clone, Copy)]
pub struct VideoStats {
    pub products_processed: u64,
    pub products_matched: u64,
}

/// Build the lookup from normalized folder path to mirrored videos.
///
/// Only rows whose `found` flag is truthy (`yes`/`true`/`1`, case-insensitive)
/// are included; rows whose folder path is the literal sentinel `root` are
/// excluded.
#[must_use]
pub fn build_video_index(table: &Table, public_base: &str) -> HashMap<String, Vec<VideoFile>> {
    let base = public_base.trim_end_matches('/');
    let mut index: HashMap<String, Vec<VideoFile>> = HashMap::new();

    for record in table.records() {
        let folder = record.get("folder");
        let destination = record.get("destination");
        if folder.is_empty() || destination.is_empty() || folder == ROOT_SENTINEL {
            continue;
        }
        if !is_truthy(record.get("found")) {
            continue;
        }

        let name = file_stem(destination).to_string();
        index.entry(match_key(folder)).or_default().push(VideoFile {
            name,
            key: destination.to_string(),
            url: format!("{base}/{destination}"),
        });
    }

    index
}

fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.to_lowercase().as_str(),
        "yes" | "true" | "1"
    )
}

/// Final path component of an object key, extension stripped.
fn file_stem(key: &str) -> &str {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Walk the tree and embed videos on every Product whose normalized path has
/// an index entry.
pub fn enrich_videos(
    tree: &mut BTreeMap<String, CatalogNode>,
    index: &HashMap<String, Vec<VideoFile>>,
) -> VideoStats {
    let mut stats = VideoStats::default();
    for_each_product_mut(tree, &mut |path, product| {
        stats.products_processed += 1;
        if let Some(videos) = index.get(&match_key(path)) {
            product.videos = Some(videos.clone());
            stats.products_matched += 1;
        }
    });
    stats
}

/// Full video-enrichment run: fetch the mirror log, load the artifact, match
/// and embed, stamp `meta.videoBuild`, overwrite the artifact.
///
/// # Errors
///
/// Returns [`EnrichError`] if required configuration is missing, the mirror
/// log cannot be fetched, or the artifact cannot be loaded or written back.
pub async fn run_video_enrichment(config: &AppConfig) -> Result<BuildStamp, EnrichError> {
    let mirror_url = config.require_mirror_log_url()?;
    let public_base = config.require_video_base_url()?;

    let client = SourceClient::new(config.http_timeout_secs, &config.user_agent)?;
    let raw = client.fetch_csv(mirror_url).await?;
    let index = build_video_index(&Table::parse(&raw), public_base);

    let mut artifact = load_artifact(&config.output_path)?;
    let started = Instant::now();

    let stats = enrich_videos(&mut artifact.catalog.tree, &index);

    let stamp = BuildStamp {
        timestamp: chrono::Utc::now(),
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        products_processed: stats.products_processed,
        products_matched: stats.products_matched,
        // The mirror log fetch is the only remote call this run makes.
        api_calls: 1,
    };
    artifact.meta.video_build = Some(stamp.clone());
    write_artifact(&config.output_path, &artifact)?;

    tracing::info!(
        processed = stats.products_processed,
        matched = stats.products_matched,
        indexed_folders = index.len(),
        "video enrichment finished"
    );
    Ok(stamp)
}
