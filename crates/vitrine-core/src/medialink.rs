//! Drive folder-id extraction from product media links.
//!
//! Links arrive in several shapes depending on how the spreadsheet author
//! copied them out of the drive UI. Patterns are tried in order and the
//! first match wins.

use std::sync::LazyLock;

use regex::Regex;

static FOLDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"/folders/([A-Za-z0-9_-]+)",
        r"[?&]id=([A-Za-z0-9_-]+)",
        r"/file/d/([A-Za-z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("folder-id pattern must compile"))
    .collect()
});

/// Extract a drive folder/file identifier from a media link.
///
/// Returns `None` when no pattern matches; callers treat that as an
/// unresolvable link, not an error.
#[must_use]
pub fn extract_folder_id(link: &str) -> Option<String> {
    FOLDER_PATTERNS
        .iter()
        .find_map(|re| re.captures(link))
        .map(|caps| caps[1].to_string())
}
