// 📦 Catalog - Known items, loaded once at startup
// Header-driven parsing of the semicolon-delimited label data export

use crate::barcode::Barcode;
use crate::error::{LoadError, LoadResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// SOURCE FORMAT
// ============================================================================

pub const COL_OLD_NUMBER: &str = "gammelt varenummer";
pub const COL_NAME: &str = "varenavn";
pub const COL_COLOR: &str = "farve";
pub const COL_BARCODE: &str = "stregkode";
pub const COL_NEW_NUMBER: &str = "nyt varenummer";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a data file as UTF-8, dropping a leading byte-order mark if present
pub(crate) fn read_text(path: &Path) -> LoadResult<String> {
    let bytes = fs::read(path).map_err(|source| LoadError::Unreachable {
        path: path.to_path_buf(),
        source,
    })?;

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    String::from_utf8(body.to_vec()).map_err(|_| LoadError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Semicolon reader shared by both data files.
///
/// Quoting is off: fields are taken literally between separators, so an
/// item name such as `Cushion 20" Sand` survives unchanged.
pub(crate) fn semicolon_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

/// 1-based source line of a record
pub(crate) fn line_of(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

// ============================================================================
// ITEM
// ============================================================================

/// One sellable product variant (a cushion in a given color).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub old_number: String,
    pub name: String,
    pub color: String,
    pub barcode: Barcode,
    pub new_number: String,
}

/// Positions of the required columns, resolved from the header line
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    old_number: usize,
    name: usize,
    color: usize,
    barcode: usize,
    new_number: usize,
}

impl ColumnMap {
    fn from_header(header: &StringRecord, path: &Path) -> LoadResult<Self> {
        let find = |column: &str| -> LoadResult<usize> {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };

        Ok(ColumnMap {
            old_number: find(COL_OLD_NUMBER)?,
            name: find(COL_NAME)?,
            color: find(COL_COLOR)?,
            barcode: find(COL_BARCODE)?,
            new_number: find(COL_NEW_NUMBER)?,
        })
    }

    fn widest(&self) -> usize {
        [
            self.old_number,
            self.name,
            self.color,
            self.barcode,
            self.new_number,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn item(&self, record: &StringRecord, line: usize, path: &Path) -> LoadResult<Item> {
        if record.len() <= self.widest() {
            return Err(LoadError::MalformedRow {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "expected at least {} fields, found {}",
                    self.widest() + 1,
                    record.len()
                ),
            });
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let raw_barcode = field(self.barcode);
        let barcode = Barcode::parse(&raw_barcode).ok_or_else(|| LoadError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason: format!("'{}' is not a 13-digit barcode", raw_barcode),
        })?;

        Ok(Item {
            old_number: field(self.old_number),
            name: field(self.name),
            color: field(self.color),
            barcode,
            new_number: field(self.new_number),
        })
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Immutable table of known items, in source file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    by_barcode: HashMap<String, usize>,
}

impl Catalog {
    /// Load the catalog from disk. Any failure is fatal for startup.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let text = read_text(path)?;
        let catalog = Catalog::parse(&text, path)?;

        info!(
            path = %path.display(),
            items = catalog.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Parse catalog text; `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> LoadResult<Self> {
        let mut reader = semicolon_reader(text);
        let mut records = reader.records();

        let header = loop {
            match records.next() {
                Some(result) => {
                    let record = result.map_err(|source| LoadError::Csv {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    if !is_blank(&record) {
                        break record;
                    }
                }
                None => {
                    return Err(LoadError::MissingHeader {
                        path: path.to_path_buf(),
                    })
                }
            }
        };

        let columns = ColumnMap::from_header(&header, path)?;
        debug!(?columns, "catalog columns resolved");

        let mut catalog = Catalog::default();

        for (idx, result) in records.enumerate() {
            let record = result.map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            if is_blank(&record) {
                continue;
            }

            let line = line_of(&record, idx + 2);
            let item = columns.item(&record, line, path)?;

            if catalog.by_barcode.contains_key(item.barcode.as_str()) {
                return Err(LoadError::DuplicateBarcode {
                    path: path.to_path_buf(),
                    line,
                    barcode: item.barcode.to_string(),
                });
            }

            catalog
                .by_barcode
                .insert(item.barcode.to_string(), catalog.items.len());
            catalog.items.push(item);
        }

        Ok(catalog)
    }

    /// Exact, case-sensitive lookup
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Item> {
        self.by_barcode.get(barcode).map(|&idx| &self.items[idx])
    }

    pub fn exists(&self, barcode: &str) -> bool {
        self.by_barcode.contains_key(barcode)
    }

    /// Catalog order index of a barcode
    pub fn position(&self, barcode: &str) -> Option<usize> {
        self.by_barcode.get(barcode).copied()
    }

    /// All items in source file order
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CANONICAL: &str = "\
Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer
1001;Palissade Seat Cushion FR;Anthracite;5710000000017;AB100
1002;Palissade Seat Cushion FR;Sky Grey;5710000000024;AB101
1003;Palissade Lounge Cushion textile;Iron Red;5710000000031;AB102
";

    fn path() -> &'static Path {
        Path::new("catalog.txt")
    }

    #[test]
    fn test_parse_canonical_order() {
        let catalog = Catalog::parse(CANONICAL, path()).unwrap();

        assert_eq!(catalog.len(), 3);
        let item = catalog.find_by_barcode("5710000000024").unwrap();
        assert_eq!(item.old_number, "1002");
        assert_eq!(item.name, "Palissade Seat Cushion FR");
        assert_eq!(item.color, "Sky Grey");
        assert_eq!(item.new_number, "AB101");
    }

    #[test]
    fn test_shuffled_header_parses_identically() {
        let shuffled = "\
STREGKODE;nyt varenummer;Farve;Gammelt Varenummer;varenavn
5710000000017;AB100;Anthracite;1001;Palissade Seat Cushion FR
5710000000024;AB101;Sky Grey;1002;Palissade Seat Cushion FR
5710000000031;AB102;Iron Red;1003;Palissade Lounge Cushion textile
";
        let canonical = Catalog::parse(CANONICAL, path()).unwrap();
        let reordered = Catalog::parse(shuffled, path()).unwrap();

        assert_eq!(canonical.all(), reordered.all());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = "\
Stregkode;Pris;Varenavn;Farve;Gammelt varenummer;Nyt varenummer
5710000000017;199;Seat Cushion;Anthracite;1001;AB100
";
        let catalog = Catalog::parse(text, path()).unwrap();
        assert_eq!(catalog.all()[0].name, "Seat Cushion");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let text = "Gammelt varenummer;Varenavn;Farve;Nyt varenummer\n1001;A;B;AB100\n";
        let err = Catalog::parse(text, path()).unwrap_err();

        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, COL_BARCODE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let err = Catalog::parse("", path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { .. }));
    }

    #[test]
    fn test_short_row_is_fatal_with_line_number() {
        let text = format!("{}1004;Only Name\n", CANONICAL);
        let err = Catalog::parse(&text, path()).unwrap_err();

        match err {
            LoadError::MalformedRow { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_barcode_row_is_fatal() {
        let text = format!("{}1004;Pillow;Sand;57100000;AB103\n", CANONICAL);
        assert!(matches!(
            Catalog::parse(&text, path()),
            Err(LoadError::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_duplicate_barcode_is_fatal() {
        let text = format!("{}1004;Pillow;Sand;5710000000017;AB103\n", CANONICAL);
        let err = Catalog::parse(&text, path()).unwrap_err();

        match err {
            LoadError::DuplicateBarcode { barcode, line, .. } => {
                assert_eq!(barcode, "5710000000017");
                assert_eq!(line, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = Catalog::parse(CANONICAL, path()).unwrap();

        assert!(catalog.exists("5710000000017"));
        assert!(!catalog.exists("571000000001"));
        assert!(!catalog.exists(" 5710000000017"));
        assert!(catalog.find_by_barcode("5710000000099").is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let catalog = Catalog::parse(CANONICAL, path()).unwrap();
        let numbers: Vec<&str> = catalog.all().iter().map(|i| i.old_number.as_str()).collect();

        assert_eq!(numbers, vec!["1001", "1002", "1003"]);
        assert_eq!(catalog.position("5710000000031"), Some(2));
    }

    #[test]
    fn test_quotes_are_literal() {
        let text = "\
Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer
1001;Cushion 20\" Square;Sand;5710000000017;AB100
";
        let catalog = Catalog::parse(text, path()).unwrap();
        assert_eq!(catalog.all()[0].name, "Cushion 20\" Square");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let text = "Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer\r\n\r\n1001;Seat;Sand;5710000000017;AB100\r\n\r\n";
        let catalog = Catalog::parse(text, path()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all()[0].new_number, "AB100");
    }

    #[test]
    fn test_load_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBF").unwrap();
        file.write_all(CANONICAL.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_rejects_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer\n")
            .unwrap();
        // Latin-1 encoded 'ø'
        file.write_all(b"1001;R\xF8d hynde;R\xF8d;5710000000017;AB100\n")
            .unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Encoding { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Unreachable { .. }));
    }
}
