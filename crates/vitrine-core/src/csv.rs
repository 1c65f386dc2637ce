//! Lenient delimited-text parser for spreadsheet exports.
//!
//! The source spreadsheets are exported by non-technical staff, so this parser
//! never rejects a row: missing trailing cells read as empty strings and
//! malformed quoting degrades gracefully instead of erroring.
//!
//! Known limitation (deliberate): doubled `""` escapes inside quoted fields
//! are NOT supported — a `"` always toggles the quoted flag. None of the
//! source exports use the escape, and changing the semantics here would
//! silently re-shape cells the downstream tree build depends on.

/// A parsed delimited-text table: one header row plus zero or more data rows.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed view of one data row, keyed by header name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl Table {
    /// Parse raw CSV text into a table.
    ///
    /// Strips a UTF-8 byte-order mark if present, splits lines on CRLF/LF,
    /// and treats the first line as headers. Header names are
    /// whitespace-collapsed; cell values are trimmed. Empty lines are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let mut lines = raw.lines();

        let headers = lines
            .next()
            .map(|line| split_line(line).iter().map(|h| collapse_ws(h)).collect())
            .unwrap_or_default();

        let rows = lines
            .filter(|line| !line.trim().is_empty())
            .map(split_line)
            .collect();

        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (headers excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over data rows as header-keyed records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            headers: &self.headers,
            cells,
        })
    }
}

impl Record<'_> {
    /// Cell value under `header`, or `""` if the column is absent or the row
    /// is short. Header matching uses the whitespace-collapsed header names.
    #[must_use]
    pub fn get(&self, header: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|idx| self.cells.get(idx))
            .map_or("", String::as_str)
    }
}

/// Split a single CSV line into trimmed cells.
///
/// Character scan with a quoted-field flag: `"` toggles the flag, `,` splits
/// only while unquoted, everything else accumulates into the current cell.
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Collapse runs of whitespace into single spaces and trim the ends.
fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_table() {
        let table = Table::parse("name,path\nTote,Bags/Tote\nClutch,Bags/Clutch\n");
        assert_eq!(table.headers(), &["name", "path"]);
        assert_eq!(table.len(), 2);
        let first = table.records().next().unwrap();
        assert_eq!(first.get("name"), "Tote");
        assert_eq!(first.get("path"), "Bags/Tote");
    }

    #[test]
    fn parse_strips_bom() {
        let table = Table::parse("\u{feff}name,path\nTote,Bags\n");
        assert_eq!(table.headers(), &["name", "path"]);
    }

    #[test]
    fn parse_handles_crlf_lines() {
        let table = Table::parse("name,path\r\nTote,Bags\r\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.records().next().unwrap().get("path"), "Bags");
    }

    #[test]
    fn parse_skips_empty_lines() {
        let table = Table::parse("name\nTote\n\n   \nClutch\n");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let table = Table::parse("name,note\n\"Tote, large\",fine\n");
        let rec = table.records().next().unwrap();
        assert_eq!(rec.get("name"), "Tote, large");
        assert_eq!(rec.get("note"), "fine");
    }

    #[test]
    fn doubled_quote_escape_is_not_supported() {
        // Deliberate limitation: `""` toggles twice instead of escaping,
        // so the inner quotes vanish and the comma still splits.
        let table = Table::parse("a,b\n\"say \"\"hi\"\", ok\",x\n");
        let rec = table.records().next().unwrap();
        assert_eq!(rec.get("a"), "say hi");
    }

    #[test]
    fn missing_trailing_cells_read_as_empty() {
        let table = Table::parse("a,b,c\n1,2\n");
        let rec = table.records().next().unwrap();
        assert_eq!(rec.get("b"), "2");
        assert_eq!(rec.get("c"), "");
    }

    #[test]
    fn unknown_header_reads_as_empty() {
        let table = Table::parse("a\n1\n");
        let rec = table.records().next().unwrap();
        assert_eq!(rec.get("nope"), "");
    }

    #[test]
    fn headers_are_whitespace_collapsed() {
        let table = Table::parse("  product   name ,path\nTote,Bags\n");
        assert_eq!(table.headers(), &["product name", "path"]);
        assert_eq!(table.records().next().unwrap().get("product name"), "Tote");
    }

    #[test]
    fn cells_are_trimmed() {
        let table = Table::parse("a,b\n  Tote  ,  Bags \n");
        let rec = table.records().next().unwrap();
        assert_eq!(rec.get("a"), "Tote");
        assert_eq!(rec.get("b"), "Bags");
    }

    #[test]
    fn reparsing_serialized_record_round_trips() {
        let table = Table::parse("name,note\n\"Tote, large\",fine\n");
        let rec = table.records().next().unwrap();
        // Re-serialize with the same quoting rule the parser honors.
        let line = format!("\"{}\",{}", rec.get("name"), rec.get("note"));
        let again = Table::parse(&format!("name,note\n{line}\n"));
        let rec2 = again.records().next().unwrap();
        assert_eq!(rec2.get("name"), rec.get("name"));
        assert_eq!(rec2.get("note"), rec.get("note"));
    }
}
