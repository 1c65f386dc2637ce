//! Thumbnail propagation across the built tree.
//!
//! Two directional passes, in this order — children must be finalized before
//! ancestors read them:
//!
//! 1. bottom-up: a Folder lacking a thumbnail adopts the first non-empty
//!    child thumbnail in map iteration order;
//! 2. top-down: anything still empty inherits from its nearest ancestor, and
//!    failing that the global placeholder.
//!
//! Net effect: own > nearest descendant > nearest ancestor > placeholder.
//! After both passes every node has a non-empty thumbnail.

use std::collections::BTreeMap;

use vitrine_core::catalog::CatalogNode;

pub fn propagate_thumbnails(tree: &mut BTreeMap<String, CatalogNode>, placeholder: &str) {
    for node in tree.values_mut() {
        pull_from_children(node);
    }
    for node in tree.values_mut() {
        fill_from_ancestors(node, "", placeholder);
    }
}

fn pull_from_children(node: &mut CatalogNode) {
    if let CatalogNode::Folder(folder) = node {
        for child in folder.children.values_mut() {
            pull_from_children(child);
        }
        if folder.thumbnail.is_empty() {
            if let Some(adopted) = folder
                .children
                .values()
                .map(CatalogNode::thumbnail)
                .find(|t| !t.is_empty())
            {
                folder.thumbnail = adopted.to_string();
            }
        }
    }
}

fn fill_from_ancestors(node: &mut CatalogNode, inherited: &str, placeholder: &str) {
    let own = node.thumbnail();
    let current = if own.is_empty() {
        let resolved = if inherited.is_empty() {
            placeholder
        } else {
            inherited
        };
        node.set_thumbnail(resolved.to_string());
        resolved.to_string()
    } else {
        own.to_string()
    };

    if let CatalogNode::Folder(folder) = node {
        for child in folder.children.values_mut() {
            fill_from_ancestors(child, &current, placeholder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::catalog::{FolderNode, ProductNode};

    const PLACEHOLDER: &str = "images/placeholder.webp";

    fn product(thumbnail: &str) -> CatalogNode {
        CatalogNode::Product(ProductNode {
            name: "p".to_string(),
            link: "https://drive.example/p".to_string(),
            thumbnail: thumbnail.to_string(),
            previews: None,
            videos: None,
        })
    }

    fn folder_with(thumbnail: &str, children: Vec<(&str, CatalogNode)>) -> CatalogNode {
        CatalogNode::Folder(FolderNode {
            thumbnail: thumbnail.to_string(),
            children: children
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            ..FolderNode::default()
        })
    }

    fn all_thumbnails(tree: &BTreeMap<String, CatalogNode>) -> Vec<String> {
        fn walk(node: &CatalogNode, out: &mut Vec<String>) {
            out.push(node.thumbnail().to_string());
            if let CatalogNode::Folder(f) = node {
                for child in f.children.values() {
                    walk(child, out);
                }
            }
        }
        let mut out = Vec::new();
        for node in tree.values() {
            walk(node, &mut out);
        }
        out
    }

    #[test]
    fn folder_adopts_first_nonempty_child_thumbnail() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            folder_with(
                "",
                vec![("A", product("")), ("B", product("images/b.webp"))],
            ),
        );
        propagate_thumbnails(&mut tree, PLACEHOLDER);
        match &tree["BAGS"] {
            CatalogNode::Folder(f) => assert_eq!(f.thumbnail, "images/b.webp"),
            CatalogNode::Product(_) => unreachable!(),
        }
    }

    #[test]
    fn descendant_preference_beats_ancestor() {
        // Folder has a thumbnail of its own; empty grandchild sits under an
        // empty child folder that adopted from a sibling product.
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            folder_with(
                "images/bags.webp",
                vec![(
                    "Tote",
                    folder_with("", vec![("X", product("images/x.webp")), ("Y", product(""))]),
                )],
            ),
        );
        propagate_thumbnails(&mut tree, PLACEHOLDER);
        let bags = match &tree["BAGS"] {
            CatalogNode::Folder(f) => f,
            CatalogNode::Product(_) => unreachable!(),
        };
        let tote = match &bags.children["Tote"] {
            CatalogNode::Folder(f) => f,
            CatalogNode::Product(_) => unreachable!(),
        };
        // Tote pulled from its child X, not from its ancestor BAGS.
        assert_eq!(tote.thumbnail, "images/x.webp");
        // Y had no descendant to offer, so it inherits from its ancestor
        // chain — Tote's (now non-empty) value.
        assert_eq!(tote.children["Y"].thumbnail(), "images/x.webp");
    }

    #[test]
    fn empty_product_inherits_from_ancestor() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            folder_with("images/bags.webp", vec![("Tote", product(""))]),
        );
        propagate_thumbnails(&mut tree, PLACEHOLDER);
        let bags = match &tree["BAGS"] {
            CatalogNode::Folder(f) => f,
            CatalogNode::Product(_) => unreachable!(),
        };
        assert_eq!(bags.children["Tote"].thumbnail(), "images/bags.webp");
    }

    #[test]
    fn propagation_is_total_with_placeholder_fallback() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            folder_with("", vec![("Tote", folder_with("", vec![("X", product(""))]))]),
        );
        tree.insert("EMPTY".to_string(), folder_with("", vec![]));
        propagate_thumbnails(&mut tree, PLACEHOLDER);
        for t in all_thumbnails(&tree) {
            assert_eq!(t, PLACEHOLDER);
        }
    }

    #[test]
    fn existing_thumbnails_are_never_overwritten() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "BAGS".to_string(),
            folder_with("images/bags.webp", vec![("Tote", product("images/t.webp"))]),
        );
        propagate_thumbnails(&mut tree, PLACEHOLDER);
        let bags = match &tree["BAGS"] {
            CatalogNode::Folder(f) => f,
            CatalogNode::Product(_) => unreachable!(),
        };
        assert_eq!(bags.thumbnail, "images/bags.webp");
        assert_eq!(bags.children["Tote"].thumbnail(), "images/t.webp");
    }
}
