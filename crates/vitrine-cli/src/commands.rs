//! Subcommand handlers, called from `main` after config and logging are
//! established. Warnings accumulated during a build are logged here in one
//! place and sampled into the report; only hard errors propagate.

use vitrine_core::brand::parse_brands;
use vitrine_core::catalog::{Artifact, Catalog, Meta};
use vitrine_core::csv::Table;
use vitrine_core::{AppConfig, BuildReport};
use vitrine_pipeline::artifact::{write_artifact, write_report};
use vitrine_pipeline::{
    build_tree, count_products, find_missing_thumbnails, propagate_thumbnails, scan_media_links,
    CatalogRow, SourceClient,
};

pub(crate) async fn run_build(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let client = SourceClient::new(config.http_timeout_secs, &config.user_agent)?;
    let (brands_csv, catalog_csv) = client
        .fetch_sources(&config.brands_csv_url, &config.catalog_csv_url)
        .await?;

    let mut report = BuildReport::default();

    let brands = parse_brands(&Table::parse(&brands_csv), &mut report);
    let rows = CatalogRow::from_table(&Table::parse(&catalog_csv));

    let mut tree = build_tree(&rows, &mut report);
    propagate_thumbnails(&mut tree, &config.placeholder_thumbnail);
    let total_products = count_products(&mut tree);
    scan_media_links(&tree, &mut report);

    report.brand_count = brands.len();
    report.product_count = total_products;
    report.category_count = tree.len();
    report.missing_thumbnails =
        find_missing_thumbnails(&tree, &config.public_dir, &config.placeholder_thumbnail).await;

    for warning in &report.warnings {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
    }
    if !report.missing_thumbnails.is_empty() {
        tracing::warn!(
            count = report.missing_thumbnails.len(),
            "thumbnails reference files missing from the public dir"
        );
    }

    if dry_run {
        println!(
            "dry-run: {} brands, {} products across {} categories, {} warnings",
            report.brand_count,
            report.product_count,
            report.category_count,
            report.warnings.len()
        );
        return Ok(());
    }

    let artifact = Artifact {
        brands,
        catalog: Catalog {
            total_products,
            tree,
        },
        meta: Meta::default(),
    };
    write_artifact(&config.output_path, &artifact)?;
    write_report(&config.report_path, &report)?;

    tracing::info!(
        brands = report.brand_count,
        products = report.product_count,
        categories = report.category_count,
        artifact = %config.output_path.display(),
        "build finished"
    );
    Ok(())
}

pub(crate) async fn run_previews(config: &AppConfig, batch_size: usize) -> anyhow::Result<()> {
    let stamp = vitrine_enrich::run_preview_enrichment(config, batch_size).await?;
    println!(
        "previews: {} products processed, {} matched, {} API calls in {} ms",
        stamp.products_processed, stamp.products_matched, stamp.api_calls, stamp.duration_ms
    );
    Ok(())
}

pub(crate) async fn run_videos(config: &AppConfig) -> anyhow::Result<()> {
    let stamp = vitrine_enrich::run_video_enrichment(config).await?;
    println!(
        "videos: {} products processed, {} matched in {} ms",
        stamp.products_processed, stamp.products_matched, stamp.duration_ms
    );
    Ok(())
}
