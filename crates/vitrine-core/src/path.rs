//! Category-path normalization.
//!
//! Every path that reaches the tree builder or a lookup table goes through
//! this module first. Skipping normalization at any entry point makes the
//! tree silently fragment into duplicate branches (`Bags/Tote` vs
//! `bags\Tote`), so there is exactly one normalization seam and it is here.

/// Segments of a path-like string: split on `/` or `\`, trimmed, empties
/// dropped.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Canonical display form of a category path.
///
/// Forward-slash-joined trimmed segments with the first segment upper-cased.
/// Empty input yields an empty string. Idempotent.
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut out = String::new();
    for (i, seg) in segments(path).enumerate() {
        if i > 0 {
            out.push('/');
            out.push_str(seg);
        } else {
            out.push_str(&seg.to_uppercase());
        }
    }
    out
}

/// Case-insensitive lookup key for a path.
///
/// Same segmentation as [`normalize`], lowercased throughout. Used on both
/// sides of the mirror-log video match so `BAGS/Tote` and `Bags/tote`
/// resolve to the same key.
#[must_use]
pub fn match_key(path: &str) -> String {
    segments(path)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a normalized path into (parent path, last segment).
///
/// Returns `("", path)` for a single-segment path.
#[must_use]
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}
