use std::collections::BTreeSet;

use super::error::{DataError, DataResult};
use super::model::{CellValue, Column, ColumnKind, Table};
use super::writer::{self, ExportFormat};

/// Rows shown by the before/after previews.
pub const PREVIEW_ROWS: usize = 5;

/// Upper bound on charted series.
pub const CHART_COLUMNS: usize = 2;

// ---------------------------------------------------------------------------
// Cleaning and selection
// ---------------------------------------------------------------------------

/// Replace every hole in a numeric column with that column's mean. Text and
/// mixed columns pass through untouched, as do all-missing columns (there is
/// no mean to fill with). Running it twice changes nothing, since a filled
/// table has no numeric holes left.
pub fn fill_missing(mut table: Table) -> Table {
    for column in &mut table.columns {
        if column.kind() != ColumnKind::Numeric {
            continue;
        }
        let Some(mean) = column.mean() else { continue };
        for value in &mut column.values {
            if matches!(value, CellValue::Missing) {
                *value = CellValue::Number(mean);
            }
        }
    }
    table
}

/// Keep only the named columns, in their original table order. Every name
/// must exist; the set carries no order of its own. An empty set yields a
/// zero-column table.
pub fn select_columns(table: &Table, names: &BTreeSet<String>) -> DataResult<Table> {
    for name in names {
        if table.column(name).is_none() {
            return Err(DataError::UnknownColumn(name.clone()));
        }
    }
    let columns = table
        .columns
        .iter()
        .filter(|c| names.contains(&c.name))
        .cloned()
        .collect();
    Ok(Table { columns })
}

/// First `rows` rows of every column.
pub fn preview(table: &Table, rows: usize) -> Table {
    let columns = table
        .columns
        .iter()
        .map(|c| Column {
            name: c.name.clone(),
            values: c.values.iter().take(rows).cloned().collect(),
        })
        .collect();
    Table { columns }
}

/// The chartable subset: the first `max` numeric columns, in table order.
pub fn numeric_columns(table: &Table, max: usize) -> Table {
    let columns = table
        .columns
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .take(max)
        .cloned()
        .collect();
    Table { columns }
}

// ---------------------------------------------------------------------------
// The full pipeline
// ---------------------------------------------------------------------------

/// One export request: which cleanup to run, which columns to keep
/// (`None` keeps all), and the output format.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub fill_missing: bool,
    pub columns: Option<BTreeSet<String>>,
    pub format: ExportFormat,
}

/// What an export produces: the transformed table (for display and row
/// counts) and the encoded bytes to hand to the user.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: Table,
    pub bytes: Vec<u8>,
}

/// Run fill, then selection, then encoding over an input table. Pure
/// request/response: the caller keeps its own copy of the input, nothing is
/// mutated in place.
pub fn run(table: Table, options: &PipelineOptions) -> DataResult<PipelineOutput> {
    let table = if options.fill_missing {
        fill_missing(table)
    } else {
        table
    };
    let table = match &options.columns {
        Some(names) => select_columns(&table, names)?,
        None => table,
    };
    let bytes = writer::encode_table(&table, options.format)?;
    Ok(PipelineOutput { table, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_table, SourceFormat};

    fn sample_table() -> Table {
        parse_table(b"id,score,label\n1,10,x\n2,,y\n3,20,\n", SourceFormat::Csv).unwrap()
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fill_replaces_holes_with_column_means() {
        let table = parse_table(b"a,b\n1,\n,4\n", SourceFormat::Csv).unwrap();
        let filled = fill_missing(table);
        assert_eq!(
            filled.columns[0].values,
            vec![CellValue::Number(1.0), CellValue::Number(1.0)]
        );
        assert_eq!(
            filled.columns[1].values,
            vec![CellValue::Number(4.0), CellValue::Number(4.0)]
        );
    }

    #[test]
    fn fill_is_idempotent() {
        let once = fill_missing(sample_table());
        let twice = fill_missing(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn fill_leaves_text_and_mixed_columns_alone() {
        let table = parse_table(b"label,mixed\nx,1\n,alpha\ny,\n", SourceFormat::Csv).unwrap();
        assert_eq!(table.columns[1].kind(), ColumnKind::Mixed);
        let filled = fill_missing(table.clone());
        assert_eq!(filled, table);
    }

    #[test]
    fn fill_skips_all_missing_columns() {
        let table = parse_table(b"empty\n\n\n", SourceFormat::Csv).unwrap();
        assert_eq!(table.columns[0].kind(), ColumnKind::Numeric);
        let filled = fill_missing(table.clone());
        assert_eq!(filled, table);
    }

    #[test]
    fn select_all_names_is_identity() {
        let table = sample_table();
        let all = names(&["id", "score", "label"]);
        assert_eq!(select_columns(&table, &all).unwrap(), table);
    }

    #[test]
    fn select_keeps_table_order_not_set_order() {
        let table = parse_table(b"b,a\n1,2\n", SourceFormat::Csv).unwrap();
        let selected = select_columns(&table, &names(&["a", "b"])).unwrap();
        let order: Vec<&str> = selected.column_names().collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn select_subset_preserves_rows() {
        let table = sample_table();
        let selected = select_columns(&table, &names(&["score"])).unwrap();
        assert_eq!(selected.column_count(), 1);
        assert_eq!(selected.row_count(), table.row_count());
    }

    #[test]
    fn select_unknown_name_fails() {
        let err = select_columns(&sample_table(), &names(&["id", "price"])).unwrap_err();
        assert_eq!(err, DataError::UnknownColumn("price".to_string()));
    }

    #[test]
    fn select_empty_set_yields_zero_columns() {
        let selected = select_columns(&sample_table(), &BTreeSet::new()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn preview_truncates_long_tables() {
        let table = parse_table(b"n\n1\n2\n3\n4\n5\n6\n7\n", SourceFormat::Csv).unwrap();
        let head = preview(&table, PREVIEW_ROWS);
        assert_eq!(head.row_count(), 5);
        assert_eq!(head.columns[0].values[0], CellValue::Number(1.0));

        // shorter than the window: unchanged
        let short = sample_table();
        assert_eq!(preview(&short, PREVIEW_ROWS), short);
    }

    #[test]
    fn numeric_subset_caps_at_two_in_table_order() {
        let table =
            parse_table(b"label,a,b,c\nx,1,2,3\ny,4,5,6\n", SourceFormat::Csv).unwrap();
        let subset = numeric_columns(&table, CHART_COLUMNS);
        let order: Vec<&str> = subset.column_names().collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn numeric_subset_empty_without_numbers() {
        let table = parse_table(b"label\nx\ny\n", SourceFormat::Csv).unwrap();
        assert!(numeric_columns(&table, CHART_COLUMNS).is_empty());
    }

    #[test]
    fn pipeline_composes_fill_select_encode() {
        let options = PipelineOptions {
            fill_missing: true,
            columns: Some(names(&["a"])),
            format: ExportFormat::Csv,
        };
        let table = parse_table(b"a,b\n1,x\n,y\n", SourceFormat::Csv).unwrap();
        let output = run(table, &options).unwrap();
        assert_eq!(output.table.column_count(), 1);
        assert_eq!(output.bytes, b"a\n1\n1\n".to_vec());
    }

    #[test]
    fn pipeline_defaults_keep_everything() {
        let table = sample_table();
        let output = run(table.clone(), &PipelineOptions::default()).unwrap();
        assert_eq!(output.table, table);
        let reparsed = parse_table(&output.bytes, SourceFormat::Csv).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn pipeline_rejects_stale_selection() {
        let options = PipelineOptions {
            fill_missing: false,
            columns: Some(names(&["gone"])),
            format: ExportFormat::Csv,
        };
        let err = run(sample_table(), &options).unwrap_err();
        assert_eq!(err, DataError::UnknownColumn("gone".to_string()));
    }
}
