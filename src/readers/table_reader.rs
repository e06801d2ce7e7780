use crate::error::{ProcessingError, Result};
use crate::models::CellValue;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// A sheet loaded into memory: header names plus rows of raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// Build a table from raw headers; header names are normalised and every
    /// row is padded or truncated to the header width.
    pub fn new(raw_headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = normalize_headers(raw_headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Name blank headers `Unnamed: {index}` and suffix duplicates with `.1`, `.2`, ...
///
/// Generated names never collide with a header that already carries the suffix.
fn normalize_headers(raw_headers: Vec<String>) -> Vec<String> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::new();

    raw_headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let header = header.trim().to_string();
            let base = if header.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header
            };

            let counter = counters.entry(base.clone()).or_insert(0);
            let mut name = base.clone();
            while emitted.contains(&name) {
                *counter += 1;
                name = format!("{}.{}", base, counter);
            }
            emitted.insert(name.clone());
            name
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Delimited,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") | Some("txt") | Some("tsv") => SourceFormat::Delimited,
            _ => SourceFormat::Spreadsheet,
        }
    }
}

/// Loads one sheet (or one delimited file) into a `SourceTable`.
pub struct TableReader {
    delimiter: Option<u8>,
}

impl TableReader {
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    /// Force a delimiter for text sources instead of sniffing it
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    /// Read `sheet` from `path`. The sheet name is ignored for delimited files.
    pub fn read_table(&self, path: &Path, sheet: &str) -> Result<SourceTable> {
        match SourceFormat::from_path(path) {
            SourceFormat::Spreadsheet => self.read_sheet(path, sheet),
            SourceFormat::Delimited => self.read_delimited(path),
        }
    }

    /// Sheet names of a workbook; a delimited file has none.
    pub fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        match SourceFormat::from_path(path) {
            SourceFormat::Spreadsheet => Ok(open_workbook_auto(path)?.sheet_names()),
            SourceFormat::Delimited => Ok(Vec::new()),
        }
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<SourceTable> {
        let mut workbook = open_workbook_auto(path)?;

        let available = workbook.sheet_names();
        if !available.iter().any(|name| name == sheet) {
            return Err(ProcessingError::SheetNotFound {
                sheet: sheet.to_string(),
                path: path.to_path_buf(),
                available: available.join(", "),
            });
        }

        let range = workbook.worksheet_range(sheet)?;

        // The used range may not begin at column A; pad so letters stay aligned
        let leading_columns = range.start().map_or(0, |(_, col)| col as usize);
        let mut rows = range.rows().map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(leading_columns)
                .chain(row.iter().map(cell_from_data))
                .collect::<Vec<_>>()
        });

        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.as_label().unwrap_or_default())
                .collect(),
            None => Vec::new(),
        };
        let table = SourceTable::new(headers, rows.collect());

        debug!(
            "Read sheet '{}' from {}: {} rows, {} columns",
            sheet,
            path.display(),
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }

    fn read_delimited(&self, path: &Path) -> Result<SourceTable> {
        let bytes = std::fs::read(path)?;
        let content = decode_text(&bytes);

        let delimiter = self
            .delimiter
            .unwrap_or_else(|| sniff_delimiter(content.lines().next().unwrap_or_default()));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from_text).collect());
        }

        let table = SourceTable::new(headers, rows);
        debug!(
            "Read delimited file {}: {} rows, {} columns",
            path.display(),
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(text) => CellValue::from_text(text),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(_) => data
            .as_datetime()
            .map_or(CellValue::Empty, |dt| CellValue::Text(dt.to_string())),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        // Formula errors read as missing, like empty cells
        _ => CellValue::Empty,
    }
}

/// UTF-8 (with or without BOM) when valid, Windows-1252 otherwise.
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

fn sniff_delimiter(header_line: &str) -> u8 {
    [b';', b'\t', b',']
        .into_iter()
        .max_by_key(|candidate| {
            (
                header_line.bytes().filter(|b| b == candidate).count(),
                // prefer comma on ties
                *candidate == b',',
            )
        })
        .filter(|candidate| header_line.as_bytes().contains(candidate))
        .unwrap_or(b',')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_normalize_headers() {
        let headers = normalize_headers(vec![
            "Nr".to_string(),
            "".to_string(),
            "Wert".to_string(),
            "Wert".to_string(),
            " Wert ".to_string(),
        ]);

        assert_eq!(
            headers,
            vec!["Nr", "Unnamed: 1", "Wert", "Wert.1", "Wert.2"]
        );
    }

    #[test]
    fn test_normalize_headers_skips_taken_suffixes() {
        let headers = normalize_headers(vec!["W".to_string(), "W.1".to_string(), "W".to_string()]);
        assert_eq!(headers, vec!["W", "W.1", "W.2"]);

        let headers = normalize_headers(vec!["W".to_string(), "W".to_string(), "W.1".to_string()]);
        assert_eq!(headers, vec!["W", "W.1", "W.1.1"]);

        // every column stays addressable by its own name
        let headers = normalize_headers(vec!["W".to_string(), "W.1".to_string(), "W".to_string()]);
        assert_eq!(crate::readers::resolve_column(&headers, "W.2").ok(), Some(2));
        assert_eq!(crate::readers::resolve_column(&headers, "W.1").ok(), Some(1));
    }

    #[test]
    fn test_source_format() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data/Bohrungen.xlsx")),
            SourceFormat::Spreadsheet
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("points.CSV")),
            SourceFormat::Delimited
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("export.tsv")),
            SourceFormat::Delimited
        );
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("Nr;Bohr_ID;Rechtswert;Hochwert"), b';');
        assert_eq!(sniff_delimiter("Nr,Bohr_ID,Rechtswert"), b',');
        assert_eq!(sniff_delimiter("Nr\tBohr_ID"), b'\t');
        assert_eq!(sniff_delimiter("single"), b',');
    }

    #[test]
    fn test_decode_windows_1252() {
        // "Höhe" in Windows-1252
        let bytes = [b'H', 0xF6, b'h', b'e'];
        assert_eq!(decode_text(&bytes), "Höhe");
        assert_eq!(decode_text("Höhe".as_bytes()), "Höhe");
    }

    #[test]
    fn test_read_delimited_file() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(temp_file, "Nr;Bohr_ID;Rechtswert;Hochwert")?;
        writeln!(temp_file, "1;B-1;3450000;5800000")?;
        writeln!(temp_file, "2;B-2;N/A;5801000")?;
        writeln!(temp_file, "3;B-3;3460000")?;

        let table = TableReader::new().read_table(temp_file.path(), "ignored")?;

        assert_eq!(table.headers, vec!["Nr", "Bohr_ID", "Rechtswert", "Hochwert"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0][2], CellValue::Text("3450000".to_string()));
        // short rows are padded
        assert_eq!(table.rows[2][3], CellValue::Empty);

        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let reader = TableReader::new();
        assert!(reader
            .read_table(Path::new("does/not/exist.xlsx"), "Geo_Koordinaten")
            .is_err());
        assert!(reader
            .read_table(Path::new("does/not/exist.csv"), "Geo_Koordinaten")
            .is_err());
    }
}
