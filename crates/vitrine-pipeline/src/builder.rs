//! Folds flat catalog rows into the nested catalog tree.
//!
//! Construction is decoupled from row order: a pre-scan decides which rows
//! are leaves, folder metadata is accumulated keyed by path and attached
//! after all rows are consumed, and an arena keeps node ownership flat until
//! the final conversion to the nested serde tree.

use std::collections::{BTreeMap, HashMap, HashSet};

use vitrine_core::catalog::{CatalogNode, FolderNode, ProductNode};
use vitrine_core::path::{normalize, split_parent};
use vitrine_core::report::{BuildReport, WarningKind};

use crate::rows::CatalogRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// Root pseudo-folder; its children are the top-level categories.
const ROOT: NodeId = NodeId(0);

#[derive(Debug, Default)]
struct Slot {
    children: BTreeMap<String, Child>,
}

#[derive(Debug)]
enum Child {
    Folder(NodeId),
    Product(ProductNode),
}

/// Folder-level metadata recorded from non-leaf rows, keyed by path and
/// attached only after the full tree shape is known.
#[derive(Debug, Clone, Default)]
struct FolderMeta {
    thumbnail: String,
    link: Option<String>,
    order: Option<i64>,
}

struct TreeBuilder {
    arena: Vec<Slot>,
    by_path: HashMap<String, NodeId>,
    meta: HashMap<String, FolderMeta>,
}

impl TreeBuilder {
    fn new() -> Self {
        let mut by_path = HashMap::new();
        by_path.insert(String::new(), ROOT);
        Self {
            arena: vec![Slot::default()],
            by_path,
            meta: HashMap::new(),
        }
    }

    /// Ensure a Folder exists at `path`, creating intermediates as needed.
    ///
    /// Returns `None` (with a warning) if a Product already occupies a
    /// segment of the path; the first occupant wins.
    fn ensure_folder(&mut self, path: &str, report: &mut BuildReport) -> Option<NodeId> {
        if let Some(&id) = self.by_path.get(path) {
            return Some(id);
        }

        let (parent, key) = split_parent(path);
        let parent_id = self.ensure_folder(parent, report)?;

        if let Some(Child::Product(_)) = self.arena[parent_id.0].children.get(key) {
            report.warn(
                WarningKind::FolderProductConflict,
                format!("path '{path}' collides with an existing product; row ignored"),
            );
            return None;
        }

        let id = NodeId(self.arena.len());
        self.arena.push(Slot::default());
        self.arena[parent_id.0]
            .children
            .insert(key.to_string(), Child::Folder(id));
        self.by_path.insert(path.to_string(), id);
        Some(id)
    }

    fn insert_product(&mut self, full: &str, product: ProductNode, report: &mut BuildReport) {
        let (parent, key) = split_parent(full);
        let Some(parent_id) = self.ensure_folder(parent, report) else {
            return;
        };

        if self.arena[parent_id.0].children.contains_key(key) {
            report.warn(
                WarningKind::DuplicateProductPath,
                format!("duplicate tree path '{full}'; first occurrence wins"),
            );
            return;
        }

        self.arena[parent_id.0]
            .children
            .insert(key.to_string(), Child::Product(product));
    }

    /// Record folder metadata for `path`. Merging is per field, first
    /// non-empty value wins, so repeated folder rows cannot clobber each
    /// other based on spreadsheet order.
    fn record_meta(&mut self, path: &str, row: &CatalogRow) {
        let meta = self.meta.entry(path.to_string()).or_default();
        if meta.thumbnail.is_empty() {
            meta.thumbnail = row.thumbnail.clone();
        }
        if meta.link.is_none() && !row.link.is_empty() {
            meta.link = Some(row.link.clone());
        }
        if meta.order.is_none() {
            meta.order = row.order;
        }
    }

    /// Convert the arena to the nested tree, attaching folder metadata and
    /// reclassifying childless link-carrying Folders into Products.
    fn finish(mut self) -> BTreeMap<String, CatalogNode> {
        let roots = std::mem::take(&mut self.arena[ROOT.0].children);
        let mut tree = BTreeMap::new();
        for (key, child) in roots {
            let node = match child {
                Child::Product(p) => CatalogNode::Product(p),
                Child::Folder(id) => self.convert_folder(id, &key),
            };
            tree.insert(key, node);
        }
        tree
    }

    fn convert_folder(&mut self, id: NodeId, path: &str) -> CatalogNode {
        let slot_children = std::mem::take(&mut self.arena[id.0].children);
        let mut children = BTreeMap::new();
        for (key, child) in slot_children {
            let child_path = format!("{path}/{key}");
            let node = match child {
                Child::Product(p) => CatalogNode::Product(p),
                Child::Folder(fid) => self.convert_folder(fid, &child_path),
            };
            children.insert(key, node);
        }

        let meta = self.meta.remove(path).unwrap_or_default();

        // Reclassification: zero children plus a recorded media link means
        // this "folder" was really a product row whose path never gained
        // descendants.
        if children.is_empty() {
            if let Some(link) = meta.link {
                let (_, name) = split_parent(path);
                return CatalogNode::Product(ProductNode {
                    name: name.to_string(),
                    link,
                    thumbnail: meta.thumbnail,
                    previews: None,
                    videos: None,
                });
            }
        }

        CatalogNode::Folder(FolderNode {
            thumbnail: meta.thumbnail,
            children,
            count: 0,
            order: meta.order,
            link: meta.link,
        })
    }
}

/// Build the catalog tree from typed rows.
///
/// Rows with an empty (post-normalization) path or empty name are skipped
/// silently — not counted, not warned. A row is a candidate leaf if it
/// carries a media link, and a confirmed leaf only if no other row's path
/// nests strictly under its own.
#[must_use]
pub fn build_tree(rows: &[CatalogRow], report: &mut BuildReport) -> BTreeMap<String, CatalogNode> {
    // Pre-scan: every strict prefix of every row path has children.
    let mut has_children: HashSet<String> = HashSet::new();
    for row in rows {
        let full = normalize(&row.path);
        let mut end = 0;
        while let Some(pos) = full[end..].find('/') {
            end += pos;
            has_children.insert(full[..end].to_string());
            end += 1;
        }
    }

    let mut builder = TreeBuilder::new();

    for row in rows {
        let full = normalize(&row.path);
        if full.is_empty() || row.name.trim().is_empty() {
            continue;
        }

        let candidate_leaf = !row.link.is_empty();
        let confirmed_leaf = candidate_leaf && !has_children.contains(&full);

        if confirmed_leaf {
            builder.insert_product(
                &full,
                ProductNode {
                    name: row.name.clone(),
                    link: row.link.clone(),
                    thumbnail: row.thumbnail.clone(),
                    previews: None,
                    videos: None,
                },
                report,
            );
        } else if builder.ensure_folder(&full, report).is_some() {
            builder.record_meta(&full, row);
        }
    }

    builder.finish()
}
