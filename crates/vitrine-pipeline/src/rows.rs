//! Typed extraction from the master catalog table.
//!
//! Column presence is validated here, at the parser boundary, so the tree
//! builder works with named fields instead of an open-ended mapping.

use vitrine_core::csv::Table;

/// One row of the master catalog spreadsheet.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub name: String,
    /// Raw path as exported; normalized exactly once by the builder.
    pub path: String,
    pub link: String,
    pub thumbnail: String,
    /// Top-level display order. An unparseable cell is left unset — no
    /// ordering is forced.
    pub order: Option<i64>,
}

impl CatalogRow {
    /// Extract typed rows from the parsed table.
    #[must_use]
    pub fn from_table(table: &Table) -> Vec<Self> {
        table
            .records()
            .map(|record| Self {
                name: record.get("name").to_string(),
                path: record.get("path").to_string(),
                link: record.get("link").to_string(),
                thumbnail: record.get("thumbnail").to_string(),
                order: record.get("order").parse::<i64>().ok(),
            })
            .collect()
    }
}
