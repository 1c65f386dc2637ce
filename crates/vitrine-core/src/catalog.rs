//! The catalog tree and the on-disk artifact it is serialized into.
//!
//! The artifact is rebuilt from scratch on every build run. Enrichment runs
//! are separate processes: they load the artifact back from disk, mutate
//! Product nodes in place, stamp `meta`, and overwrite the same file.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brand::Brand;

/// One node of the catalog tree: a Folder with children or a leaf Product.
///
/// A node starts life as a Folder; the builder reclassifies it to a Product
/// only if, after the full tree is built, it has no children but carries a
/// media link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogNode {
    Folder(FolderNode),
    Product(ProductNode),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Possibly inherited; guaranteed non-empty after thumbnail propagation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
    /// Children keyed by path segment. `BTreeMap` gives a deterministic
    /// iteration order, which the child-thumbnail adoption pass relies on.
    #[serde(default)]
    pub children: BTreeMap<String, CatalogNode>,
    /// Aggregate descendant product count, filled by the counting pass.
    #[serde(default)]
    pub count: usize,
    /// Optional top-level display order from the spreadsheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Media link recorded on the folder row, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub name: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
    /// Drive preview files attached by the preview-enrichment run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews: Option<Vec<DriveFile>>,
    /// Mirrored videos attached by the video-enrichment run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoFile>>,
}

/// One image/video file listed from a drive folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub thumbnail_url: String,
    pub preview_url: String,
    pub view_url: String,
}

/// One mirrored video resolved from the mirror log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFile {
    pub name: String,
    /// Object key relative to the public base URL.
    pub key: String,
    pub url: String,
}

/// Root of the serialized artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub brands: BTreeMap<String, Brand>,
    pub catalog: Catalog,
    #[serde(default, skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub total_products: usize,
    pub tree: BTreeMap<String, CatalogNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_build: Option<BuildStamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_build: Option<BuildStamp>,
}

impl Meta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preview_build.is_none() && self.video_build.is_none()
    }
}

/// Run statistics stamped onto the artifact by an enrichment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStamp {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub products_processed: u64,
    pub products_matched: u64,
    pub api_calls: u64,
}

impl CatalogNode {
    #[must_use]
    pub fn thumbnail(&self) -> &str {
        match self {
            CatalogNode::Folder(f) => &f.thumbnail,
            CatalogNode::Product(p) => &p.thumbnail,
        }
    }

    pub fn set_thumbnail(&mut self, thumbnail: String) {
        match self {
            CatalogNode::Folder(f) => f.thumbnail = thumbnail,
            CatalogNode::Product(p) => p.thumbnail = thumbnail,
        }
    }
}

/// Visit every Product in the tree mutably, with its fully qualified path
/// (ancestor keys joined with `/`).
pub fn for_each_product_mut<F>(tree: &mut BTreeMap<String, CatalogNode>, f: &mut F)
where
    F: FnMut(&str, &mut ProductNode),
{
    fn walk<F>(prefix: &str, children: &mut BTreeMap<String, CatalogNode>, f: &mut F)
    where
        F: FnMut(&str, &mut ProductNode),
    {
        for (key, node) in children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}/{key}")
            };
            match node {
                CatalogNode::Product(product) => f(&path, product),
                CatalogNode::Folder(folder) => walk(&path, &mut folder.children, f),
            }
        }
    }
    walk("", tree, f);
}

/// Immutable counterpart of [`for_each_product_mut`].
pub fn for_each_product<F>(tree: &BTreeMap<String, CatalogNode>, f: &mut F)
where
    F: FnMut(&str, &ProductNode),
{
    fn walk<F>(prefix: &str, children: &BTreeMap<String, CatalogNode>, f: &mut F)
    where
        F: FnMut(&str, &ProductNode),
    {
        for (key, node) in children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}/{key}")
            };
            match node {
                CatalogNode::Product(product) => f(&path, product),
                CatalogNode::Folder(folder) => walk(&path, &folder.children, f),
            }
        }
    }
    walk("", tree, f);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> CatalogNode {
        CatalogNode::Product(ProductNode {
            name: name.to_string(),
            link: format!("https://drive.example/{name}"),
            thumbnail: String::new(),
            previews: None,
            videos: None,
        })
    }

    #[test]
    fn node_serde_round_trips_through_tagged_json() {
        let mut children = BTreeMap::new();
        children.insert("Tote".to_string(), product("GG Tote"));
        let node = CatalogNode::Folder(FolderNode {
            thumbnail: "images/bags.webp".to_string(),
            children,
            count: 1,
            order: Some(2),
            link: None,
        });

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["children"]["Tote"]["type"], "product");

        let back: CatalogNode = serde_json::from_value(json).unwrap();
        match back {
            CatalogNode::Folder(f) => {
                assert_eq!(f.count, 1);
                assert_eq!(f.order, Some(2));
            }
            CatalogNode::Product(_) => panic!("expected folder"),
        }
    }

    #[test]
    fn for_each_product_joins_ancestor_keys() {
        let mut inner = BTreeMap::new();
        inner.insert("Tote".to_string(), product("Tote"));
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            CatalogNode::Folder(FolderNode {
                children: inner,
                ..FolderNode::default()
            }),
        );

        let mut seen = Vec::new();
        for_each_product(&tree, &mut |path, _| seen.push(path.to_string()));
        assert_eq!(seen, vec!["BAGS/Tote"]);
    }
}
