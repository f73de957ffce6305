use rust_xlsxwriter::Workbook;

use super::error::{DataError, DataResult};
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// ExportFormat – the download side of the format pair
// ---------------------------------------------------------------------------

/// Output formats offered by the export control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Label used on the download button and the format radio.
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a table into downloadable bytes.
pub fn encode_table(table: &Table, format: ExportFormat) -> DataResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => encode_csv(table),
        ExportFormat::Xlsx => encode_xlsx(table),
    }
}

fn encode_error(format: ExportFormat, message: impl Into<String>) -> DataError {
    DataError::Encode {
        format: format.name(),
        message: message.into(),
    }
}

/// Comma-separated with a header row and no index column. Numbers print in
/// Rust's shortest round-trip form, holes as empty fields, so encoding a
/// given table is byte-deterministic.
fn encode_csv(table: &Table) -> DataResult<Vec<u8>> {
    if table.is_empty() {
        // degenerate zero-column selection: just the empty header line
        return Ok(b"\n".to_vec());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns.iter().map(|c| c.name.as_str()))
        .map_err(|e| encode_error(ExportFormat::Csv, format!("writing header row: {e}")))?;
    for row in 0..table.row_count() {
        writer
            .write_record(table.columns.iter().map(|c| c.values[row].to_string()))
            .map_err(|e| encode_error(ExportFormat::Csv, format!("writing row {row}: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| encode_error(ExportFormat::Csv, format!("flushing output: {e}")))
}

/// Single worksheet with a header row and no index column. Holes become
/// blank cells. The container embeds writer metadata, so byte equality
/// across runs is not guaranteed; cell values are.
fn encode_xlsx(table: &Table) -> DataResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (index, column) in table.columns.iter().enumerate() {
        let col = u16::try_from(index)
            .map_err(|_| encode_error(ExportFormat::Xlsx, "too many columns for a worksheet"))?;
        worksheet
            .write_string(0, col, column.name.as_str())
            .map_err(|e| {
                encode_error(
                    ExportFormat::Xlsx,
                    format!("writing header {:?}: {e}", column.name),
                )
            })?;
        for (row, value) in column.values.iter().enumerate() {
            let row = row as u32 + 1;
            let result = match value {
                CellValue::Number(n) => worksheet.write_number(row, col, *n),
                CellValue::Text(s) => worksheet.write_string(row, col, s.as_str()),
                CellValue::Missing => continue,
            };
            result.map_err(|e| {
                encode_error(
                    ExportFormat::Xlsx,
                    format!("writing cell {row}:{col}: {e}"),
                )
            })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| encode_error(ExportFormat::Xlsx, format!("assembling workbook: {e}")))
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Suggested name for the converted file: the first occurrence of the source
/// extension substring is swapped for the target extension. The quirk is
/// inherited and kept: a base name containing the extension text is renamed
/// there instead of at the suffix (`csv_data.csv` + `xlsx` →
/// `xlsx_data.csv`). A name without the substring comes back unchanged.
pub fn derive_output_filename(original_name: &str, original_ext: &str, new_ext: &str) -> String {
    if original_ext.is_empty() {
        return original_name.to_string();
    }
    original_name.replacen(original_ext, new_ext, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_table, SourceFormat};
    use crate::data::model::ColumnKind;

    fn sample_table() -> Table {
        parse_table(
            b"station,reading,note\nnorth,21.4,ok\nsouth,,frozen sensor\n,18.2,\n",
            SourceFormat::Csv,
        )
        .unwrap()
    }

    #[test]
    fn csv_encoding_is_deterministic_and_exact() {
        let table = parse_table(b"a,b\n1,x\n,y\n", SourceFormat::Csv).unwrap();
        let bytes = encode_table(&table, ExportFormat::Csv).unwrap();
        assert_eq!(bytes, b"a,b\n1,x\n,y\n".to_vec());
        assert_eq!(bytes, encode_table(&table, ExportFormat::Csv).unwrap());
    }

    #[test]
    fn csv_quotes_fields_with_separators() {
        let table = parse_table(b"note\n\"a, b\"\n", SourceFormat::Csv).unwrap();
        let bytes = encode_table(&table, ExportFormat::Csv).unwrap();
        assert_eq!(bytes, b"note\n\"a, b\"\n".to_vec());
    }

    #[test]
    fn csv_round_trip_preserves_values() {
        let table = sample_table();
        let bytes = encode_table(&table, ExportFormat::Csv).unwrap();
        let reparsed = parse_table(&bytes, SourceFormat::Csv).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn csv_round_trip_reparses_numeric_text() {
        // accepted widening: text that looks numeric comes back as a number
        let mut table = parse_table(b"code\nx1\n", SourceFormat::Csv).unwrap();
        table.columns[0]
            .values
            .push(CellValue::Text("1.50".to_string()));
        let bytes = encode_table(&table, ExportFormat::Csv).unwrap();
        let reparsed = parse_table(&bytes, SourceFormat::Csv).unwrap();
        assert_eq!(reparsed.columns[0].values[1], CellValue::Number(1.5));
    }

    #[test]
    fn csv_zero_column_table_is_a_blank_line() {
        let table = Table::new(Vec::new()).unwrap();
        assert_eq!(encode_table(&table, ExportFormat::Csv).unwrap(), b"\n".to_vec());
    }

    #[test]
    fn xlsx_round_trip_preserves_values_and_kinds() {
        let table = sample_table();
        let bytes = encode_table(&table, ExportFormat::Xlsx).unwrap();
        let reparsed = parse_table(&bytes, SourceFormat::Xlsx).unwrap();

        let names: Vec<&str> = reparsed.column_names().collect();
        assert_eq!(names, vec!["station", "reading", "note"]);
        assert_eq!(reparsed.columns[1].kind(), ColumnKind::Numeric);
        assert_eq!(reparsed, table);
    }

    #[test]
    fn xlsx_holes_stay_holes() {
        let table = parse_table(b"a\n1\n\n3\n", SourceFormat::Csv).unwrap();
        let bytes = encode_table(&table, ExportFormat::Xlsx).unwrap();
        let reparsed = parse_table(&bytes, SourceFormat::Xlsx).unwrap();
        assert_eq!(
            reparsed.columns[0].values,
            vec![
                CellValue::Number(1.0),
                CellValue::Missing,
                CellValue::Number(3.0),
            ]
        );
    }

    #[test]
    fn output_renaming_swaps_the_extension() {
        assert_eq!(derive_output_filename("data.csv", "csv", "xlsx"), "data.xlsx");
        assert_eq!(derive_output_filename("data.xlsx", "xlsx", "csv"), "data.csv");
    }

    #[test]
    fn output_renaming_keeps_the_first_occurrence_quirk() {
        assert_eq!(
            derive_output_filename("csv_data.csv", "csv", "xlsx"),
            "xlsx_data.csv"
        );
    }

    #[test]
    fn output_renaming_handles_degenerate_names() {
        assert_eq!(derive_output_filename("data", "csv", "xlsx"), "data");
        assert_eq!(derive_output_filename("data.", "", "xlsx"), "data.");
    }

    #[test]
    fn export_format_metadata() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert_eq!(
            ExportFormat::Xlsx.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }
}
