//! Brand table ingestion and validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::csv::{Record, Table};
use crate::report::{BuildReport, WarningKind};

/// Fallback palette, documented here and applied per channel when a color
/// cell is missing or not a 6-hex-digit value.
pub const DEFAULT_PRIMARY_COLOR: &str = "#C9A227"; // gold
pub const DEFAULT_ACCENT_COLOR: &str = "#8A8A8A";
pub const DEFAULT_TEXT_COLOR: &str = "#1A1A1A";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

/// Fixed template a contact URL must match to be kept.
const CONTACT_URL_PREFIX: &str = "https://wa.me/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub slug: String,
    pub name: String,
    pub palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    pub default_category: String,
}

/// Parse the brand table into a slug-keyed map.
///
/// Slug uniqueness is enforced first-wins: a duplicate slug is dropped with a
/// warning. Rows missing slug or name are skipped with a warning. Color and
/// contact-URL problems degrade to the documented fallbacks and warn; they
/// never drop the brand.
#[must_use]
pub fn parse_brands(table: &Table, report: &mut BuildReport) -> BTreeMap<String, Brand> {
    let mut brands = BTreeMap::new();

    for record in table.records() {
        let slug = record.get("slug").to_string();
        let name = record.get("name").to_string();

        if slug.is_empty() || name.is_empty() {
            report.warn(
                WarningKind::EmptyBrandRow,
                format!("brand row skipped: missing slug or name (slug={slug:?}, name={name:?})"),
            );
            continue;
        }

        if brands.contains_key(&slug) {
            report.warn(
                WarningKind::DuplicateSlug,
                format!("duplicate brand slug '{slug}' dropped; first occurrence wins"),
            );
            continue;
        }

        let palette = Palette {
            primary: parse_color(&record, "primaryColor", DEFAULT_PRIMARY_COLOR, &slug, report),
            accent: parse_color(&record, "accentColor", DEFAULT_ACCENT_COLOR, &slug, report),
            text: parse_color(&record, "textColor", DEFAULT_TEXT_COLOR, &slug, report),
            background: parse_color(
                &record,
                "backgroundColor",
                DEFAULT_BACKGROUND_COLOR,
                &slug,
                report,
            ),
        };

        let whatsapp = parse_contact_url(record.get("whatsapp"), &slug, report);

        brands.insert(
            slug.clone(),
            Brand {
                slug,
                name,
                palette,
                whatsapp,
                default_category: record.get("defaultCategory").to_string(),
            },
        );
    }

    brands
}

/// Validate one color cell, falling back to `default` with a warning.
///
/// Accepts exactly 6 hex digits with an optional `#` prefix; canonical form
/// is `#` plus the digits upper-cased. An empty cell falls back silently —
/// only a present-but-invalid value warns.
fn parse_color(
    record: &Record<'_>,
    column: &str,
    default: &str,
    slug: &str,
    report: &mut BuildReport,
) -> String {
    let raw = record.get(column);
    if raw.is_empty() {
        return default.to_string();
    }

    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{}", hex.to_uppercase())
    } else {
        report.warn(
            WarningKind::InvalidColor,
            format!("brand '{slug}': invalid {column} '{raw}', using fallback {default}"),
        );
        default.to_string()
    }
}

/// Keep a contact URL only if it matches `https://wa.me/<digits>` (an
/// optional query string is allowed). Anything else is discarded with a
/// warning; an empty cell is simply absent.
fn parse_contact_url(raw: &str, slug: &str, report: &mut BuildReport) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    if let Some(rest) = raw.strip_prefix(CONTACT_URL_PREFIX) {
        let digits = rest.split('?').next().unwrap_or("");
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return Some(raw.to_string());
        }
    }

    report.warn(
        WarningKind::InvalidContactUrl,
        format!("brand '{slug}': contact URL '{raw}' does not match {CONTACT_URL_PREFIX}<digits>, discarded"),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &str) -> Table {
        let header = "slug,name,primaryColor,accentColor,textColor,backgroundColor,whatsapp,defaultCategory";
        Table::parse(&format!("{header}\n{rows}"))
    }

    #[test]
    fn invalid_primary_color_falls_back_to_gold_with_warning() {
        let mut report = BuildReport::default();
        let brands = parse_brands(&table("chanel,Chanel,bad,,,,,"), &mut report);
        let brand = &brands["chanel"];
        assert_eq!(brand.palette.primary, DEFAULT_PRIMARY_COLOR);
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::InvalidColor && w.message.contains("chanel")),
            "expected an invalid-color warning naming chanel, got: {:?}",
            report.warnings
        );
    }

    #[test]
    fn valid_colors_are_canonicalized() {
        let mut report = BuildReport::default();
        let brands = parse_brands(&table("dior,Dior,aabbcc,#112233,,,,"), &mut report);
        let brand = &brands["dior"];
        assert_eq!(brand.palette.primary, "#AABBCC");
        assert_eq!(brand.palette.accent, "#112233");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_color_cell_falls_back_without_warning() {
        let mut report = BuildReport::default();
        let brands = parse_brands(&table("dior,Dior,,,,,,"), &mut report);
        assert_eq!(brands["dior"].palette.background, DEFAULT_BACKGROUND_COLOR);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn duplicate_slug_first_wins_with_warning() {
        let mut report = BuildReport::default();
        let brands = parse_brands(
            &table("chanel,Chanel,,,,,,\nchanel,Chanel Again,,,,,,"),
            &mut report,
        );
        assert_eq!(brands.len(), 1);
        assert_eq!(brands["chanel"].name, "Chanel");
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::DuplicateSlug));
    }

    #[test]
    fn row_without_slug_is_skipped_with_warning() {
        let mut report = BuildReport::default();
        let brands = parse_brands(&table(",Nameless,,,,,,"), &mut report);
        assert!(brands.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::EmptyBrandRow));
    }

    #[test]
    fn valid_contact_url_is_kept() {
        let mut report = BuildReport::default();
        let brands = parse_brands(
            &table("chanel,Chanel,,,,,https://wa.me/5511999999999,"),
            &mut report,
        );
        assert_eq!(
            brands["chanel"].whatsapp.as_deref(),
            Some("https://wa.me/5511999999999")
        );
    }

    #[test]
    fn contact_url_with_query_string_is_kept() {
        let mut report = BuildReport::default();
        let brands = parse_brands(
            &table("chanel,Chanel,,,,,https://wa.me/551199?text=hi,"),
            &mut report,
        );
        assert!(brands["chanel"].whatsapp.is_some());
    }

    #[test]
    fn malformed_contact_url_is_discarded_with_warning() {
        let mut report = BuildReport::default();
        let brands = parse_brands(
            &table("chanel,Chanel,,,,,https://wa.me/not-digits,"),
            &mut report,
        );
        assert!(brands["chanel"].whatsapp.is_none());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::InvalidContactUrl));
    }

    #[test]
    fn foreign_contact_url_is_discarded() {
        let mut report = BuildReport::default();
        let brands = parse_brands(
            &table("chanel,Chanel,,,,,https://example.com/55119999,"),
            &mut report,
        );
        assert!(brands["chanel"].whatsapp.is_none());
    }
}
