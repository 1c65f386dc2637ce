//! Drive preview enrichment.
//!
//! Runs as a separate process over the already-built artifact: walk every
//! Product carrying a media link, resolve the drive folder id from the link,
//! list the folder's media children, and embed the file list on the Product.
//! Per-folder failures never abort the run — they are logged, counted, and
//! treated as zero files found.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use futures::future::join_all;

use vitrine_core::catalog::{for_each_product, for_each_product_mut, BuildStamp, CatalogNode, DriveFile};
use vitrine_core::medialink::extract_folder_id;
use vitrine_core::AppConfig;
use vitrine_pipeline::artifact::{load_artifact, write_artifact};

use crate::drive::DriveClient;
use crate::error::EnrichError;

/// Pause inserted after every [`RATE_LIMIT_EVERY`]-th sequential listing.
const RATE_LIMIT_PAUSE_MS: u64 = 500;
const RATE_LIMIT_EVERY: u64 = 10;

#[derive(Debug, Default, Clone, Copy)]
pub struct PreviewStats {
    /// Products carrying a media link that the walk visited.
    pub processed: u64,
    /// Products that ended up with at least one preview file.
    pub matched: u64,
    /// Listing calls actually issued against the drive API.
    pub api_calls: u64,
    /// Per-folder listing failures (treated as zero files).
    pub failures: u64,
    /// Links no extraction pattern matched; skipped without error.
    pub unresolved_links: u64,
}

/// A product to enrich: its tree path and the folder id resolved from its
/// link, if any pattern matched.
struct Target {
    path: String,
    folder_id: Option<String>,
}

fn collect_targets(tree: &BTreeMap<String, CatalogNode>) -> Vec<Target> {
    let mut targets = Vec::new();
    for_each_product(tree, &mut |path, product| {
        if !product.link.is_empty() {
            targets.push(Target {
                path: path.to_string(),
                folder_id: extract_folder_id(&product.link),
            });
        }
    });
    targets
}

fn attach(
    tree: &mut BTreeMap<String, CatalogNode>,
    listings: &HashMap<String, Vec<DriveFile>>,
    stats: &mut PreviewStats,
) {
    for_each_product_mut(tree, &mut |path, product| {
        if let Some(files) = listings.get(path) {
            if !files.is_empty() {
                stats.matched += 1;
            }
            product.previews = Some(files.clone());
        }
    });
}

/// Sequential variant: one listing at a time, with a crude rate-limit pause
/// after every tenth processed item.
pub async fn enrich_sequential(
    client: &DriveClient,
    tree: &mut BTreeMap<String, CatalogNode>,
) -> PreviewStats {
    let targets = collect_targets(tree);
    let mut stats = PreviewStats::default();
    let mut listings: HashMap<String, Vec<DriveFile>> = HashMap::new();

    for target in targets {
        stats.processed += 1;

        let Some(folder_id) = target.folder_id else {
            stats.unresolved_links += 1;
            continue;
        };

        stats.api_calls += 1;
        let files = match client.list_media(&folder_id).await {
            Ok(files) => files,
            Err(e) => {
                stats.failures += 1;
                tracing::warn!(
                    path = %target.path,
                    folder_id = %folder_id,
                    error = %e,
                    "drive listing failed; treating as zero files"
                );
                Vec::new()
            }
        };
        listings.insert(target.path, files);

        if stats.processed % RATE_LIMIT_EVERY == 0 {
            tokio::time::sleep(Duration::from_millis(RATE_LIMIT_PAUSE_MS)).await;
        }
    }

    attach(tree, &listings, &mut stats);
    stats
}

/// Batched variant: partitions targets into fixed-size groups, fans out the
/// per-folder listings within a group concurrently with a failure-tolerant
/// gather, and memoizes listings by folder id for the run. Two products in
/// the same group sharing a folder id may both fetch it; the second insert
/// is an idempotent overwrite.
pub async fn enrich_batched(
    client: &DriveClient,
    tree: &mut BTreeMap<String, CatalogNode>,
    batch_size: usize,
) -> PreviewStats {
    let targets = collect_targets(tree);
    let mut stats = PreviewStats::default();
    let mut cache: HashMap<String, Vec<DriveFile>> = HashMap::new();
    let mut listings: HashMap<String, Vec<DriveFile>> = HashMap::new();

    let batch_size = batch_size.max(1);

    for group in targets.chunks(batch_size) {
        let mut fetches = Vec::new();
        for target in group {
            stats.processed += 1;
            match &target.folder_id {
                None => stats.unresolved_links += 1,
                Some(id) if cache.contains_key(id) => {}
                Some(id) => {
                    let id = id.clone();
                    fetches.push(async move {
                        let result = client.list_media(&id).await;
                        (id, result)
                    });
                }
            }
        }

        for (id, result) in join_all(fetches).await {
            stats.api_calls += 1;
            let files = match result {
                Ok(files) => files,
                Err(e) => {
                    stats.failures += 1;
                    tracing::warn!(
                        folder_id = %id,
                        error = %e,
                        "drive listing failed in batch; treating as zero files"
                    );
                    Vec::new()
                }
            };
            cache.insert(id, files);
        }

        for target in group {
            if let Some(id) = &target.folder_id {
                if let Some(files) = cache.get(id) {
                    listings.insert(target.path.clone(), files.clone());
                }
            }
        }
    }

    attach(tree, &listings, &mut stats);
    stats
}

/// Full preview-enrichment run: load the artifact, enrich, stamp
/// `meta.previewBuild`, overwrite the artifact.
///
/// `batch_size <= 1` selects the sequential variant.
///
/// # Errors
///
/// Returns [`EnrichError`] if required configuration is missing, the
/// artifact cannot be loaded, or the artifact cannot be written back.
/// Per-folder listing failures do NOT error — they are absorbed into stats.
pub async fn run_preview_enrichment(
    config: &AppConfig,
    batch_size: usize,
) -> Result<BuildStamp, EnrichError> {
    let api_key = config.require_drive_api_key()?;
    let client = DriveClient::new(
        &config.drive_api_base,
        api_key,
        config.http_timeout_secs,
        &config.user_agent,
    )?;

    let mut artifact = load_artifact(&config.output_path)?;
    let started = Instant::now();

    let stats = if batch_size <= 1 {
        enrich_sequential(&client, &mut artifact.catalog.tree).await
    } else {
        enrich_batched(&client, &mut artifact.catalog.tree, batch_size).await
    };

    let stamp = BuildStamp {
        timestamp: chrono::Utc::now(),
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        products_processed: stats.processed,
        products_matched: stats.matched,
        api_calls: stats.api_calls,
    };
    artifact.meta.preview_build = Some(stamp.clone());
    write_artifact(&config.output_path, &artifact)?;

    tracing::info!(
        processed = stats.processed,
        matched = stats.matched,
        api_calls = stats.api_calls,
        failures = stats.failures,
        unresolved = stats.unresolved_links,
        "preview enrichment finished"
    );
    Ok(stamp)
}
