//! Post-build counting and diagnostics.
//!
//! The counting pass mutates Folder counts; everything else here is pure
//! diagnostics that feeds the build report and never blocks the artifact
//! write.

use std::collections::BTreeMap;
use std::path::Path;

use vitrine_core::catalog::{for_each_product, CatalogNode};
use vitrine_core::medialink::extract_folder_id;
use vitrine_core::report::{BuildReport, MissingThumbnail, WarningKind};

/// Fill every Folder's `count` with its descendant product total (post-order)
/// and return the grand total across the tree.
pub fn count_products(tree: &mut BTreeMap<String, CatalogNode>) -> usize {
    tree.values_mut().map(count_node).sum()
}

fn count_node(node: &mut CatalogNode) -> usize {
    match node {
        CatalogNode::Product(_) => 1,
        CatalogNode::Folder(folder) => {
            let count = folder.children.values_mut().map(count_node).sum();
            folder.count = count;
            count
        }
    }
}

/// Record products whose media link matches none of the known drive
/// patterns. The preview enrichment will skip them, so surface them in the
/// build report up front.
pub fn scan_media_links(tree: &BTreeMap<String, CatalogNode>, report: &mut BuildReport) {
    let mut invalid = Vec::new();
    for_each_product(tree, &mut |path, product| {
        if !product.link.is_empty() && extract_folder_id(&product.link).is_none() {
            invalid.push((path.to_string(), product.link.clone()));
        }
    });
    for (path, link) in invalid {
        report.warn(
            WarningKind::UnmatchedMediaLink,
            format!("product '{path}': media link '{link}' matches no known pattern"),
        );
        report.invalid_links.push(link);
    }
}

/// Check that every non-placeholder thumbnail references an existing file
/// under `public_dir`. Unreadable paths count as missing — this list is
/// diagnostic only.
pub async fn find_missing_thumbnails(
    tree: &BTreeMap<String, CatalogNode>,
    public_dir: &Path,
    placeholder: &str,
) -> Vec<MissingThumbnail> {
    fn collect(
        prefix: &str,
        children: &BTreeMap<String, CatalogNode>,
        placeholder: &str,
        out: &mut Vec<(String, String)>,
    ) {
        for (key, node) in children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}/{key}")
            };
            let thumbnail = node.thumbnail();
            if !thumbnail.is_empty() && thumbnail != placeholder {
                out.push((path.clone(), thumbnail.to_string()));
            }
            if let CatalogNode::Folder(folder) = node {
                collect(&path, &folder.children, placeholder, out);
            }
        }
    }

    let mut candidates = Vec::new();
    collect("", tree, placeholder, &mut candidates);

    let mut missing = Vec::new();
    for (path, thumbnail) in candidates {
        let exists = tokio::fs::try_exists(public_dir.join(&thumbnail))
            .await
            .unwrap_or(false);
        if !exists {
            missing.push(MissingThumbnail { path, thumbnail });
        }
    }
    missing
}
