use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use super::error::{DataError, DataResult};
use super::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// SourceFormat – the upload allow-list
// ---------------------------------------------------------------------------

/// Input formats accepted at the upload boundary. Resolved once from the
/// file extension; everything past this point dispatches on the enum, so an
/// unsupported extension can never reach a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Match an extension against the `{csv, xlsx}` allow-list,
    /// case-insensitively.
    pub fn from_extension(ext: &str) -> DataResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            other => Err(DataError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Xlsx => "XLSX",
        }
    }
}

/// Extension substring exactly as it appears in a file name
/// (`"data.csv"` → `"csv"`, `"archive.backup.xlsx"` → `"xlsx"`). A name
/// without dots comes back whole, which [`SourceFormat::from_extension`]
/// then rejects. Kept verbatim because output renaming reuses it.
pub fn file_extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse uploaded bytes in the declared format.
pub fn parse_table(bytes: &[u8], format: SourceFormat) -> DataResult<Table> {
    match format {
        SourceFormat::Csv => parse_csv(bytes),
        SourceFormat::Xlsx => parse_xlsx(bytes),
    }
}

fn parse_error(format: SourceFormat, message: impl Into<String>) -> DataError {
    DataError::Parse {
        format: format.name(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: comma-separated, first row is the header, every data row must
/// have the header's field count. Cell types are inferred per cell, see
/// [`infer_cell`].
fn parse_csv(bytes: &[u8]) -> DataResult<Table> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(SourceFormat::Csv, format!("reading header row: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(parse_error(SourceFormat::Csv, "file has no header row"));
    }

    let names = normalize_headers(headers.iter().map(str::to_string).collect());
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column {
            name,
            values: Vec::new(),
        })
        .collect();

    for (row_no, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| parse_error(SourceFormat::Csv, format!("data row {row_no}: {e}")))?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.values.push(infer_cell(field));
        }
    }

    Table::new(columns)
}

// ---------------------------------------------------------------------------
// XLSX parsing
// ---------------------------------------------------------------------------

/// XLSX layout: first worksheet only, first row is the header. Calamine
/// hands back a rectangular range, so every row already has the full width.
fn parse_xlsx(bytes: &[u8]) -> DataResult<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| parse_error(SourceFormat::Xlsx, format!("opening workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_error(SourceFormat::Xlsx, "workbook contains no worksheets"))?
        .map_err(|e| parse_error(SourceFormat::Xlsx, format!("reading first worksheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| parse_error(SourceFormat::Xlsx, "worksheet has no header row"))?;

    let names = normalize_headers(header.iter().map(header_text).collect());
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column {
            name,
            values: Vec::new(),
        })
        .collect();

    for row in rows {
        for (column, cell) in columns.iter_mut().zip(row.iter()) {
            column.values.push(convert_cell(cell));
        }
    }

    Table::new(columns)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a spreadsheet cell into the table model. String cells honor the
/// missing markers but otherwise stay text even when they look numeric,
/// since the sheet itself types numbers as `Float`/`Int`. Dates, durations
/// and booleans are kept as their display text; error cells count as holes.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::Float(f) if f.is_finite() => CellValue::Number(*f),
        Data::Float(_) => CellValue::Missing,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::String(s) if is_missing_marker(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Headers and cell inference
// ---------------------------------------------------------------------------

/// Header hygiene: blank header cells become `unnamed_<index>` and repeated
/// names get `_1`, `_2`, ... suffixes until unique, so columns stay
/// addressable by name.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (index, cell) in raw.into_iter().enumerate() {
        let trimmed = cell.trim();
        let base = if trimmed.is_empty() {
            format!("unnamed_{index}")
        } else {
            trimmed.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1usize;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// Text cells that count as holes, alongside empty and whitespace-only
/// fields.
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None"];

fn is_missing_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

/// Cell-level inference for CSV fields: missing markers first, then finite
/// numbers, otherwise text. Non-finite parses (`inf`, `-inf`) stay text so
/// they can never poison a column mean.
fn infer_cell(raw: &str) -> CellValue {
    if is_missing_marker(raw) {
        return CellValue::Missing;
    }
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(raw.to_string()),
    }
}
