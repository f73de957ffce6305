use std::fmt;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the three states a tabular cell can be
/// in after inference: a number, free text, or a hole.
///
/// Cells never hold non-finite numbers; the loader keeps `inf`/`NaN` text as
/// [`CellValue::Text`], which makes the derived equality sound and keeps
/// column means finite.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell; `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named column and its derived kind
// ---------------------------------------------------------------------------

/// What a column holds, derived from its cells. Only [`ColumnKind::Numeric`]
/// columns take part in mean-filling and charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No text cells; an all-missing column counts as numeric.
    Numeric,
    /// Text cells but no numbers.
    Text,
    /// Both numbers and text.
    Mixed,
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        let mut has_number = false;
        let mut has_text = false;
        for value in &self.values {
            match value {
                CellValue::Number(_) => has_number = true,
                CellValue::Text(_) => has_text = true,
                CellValue::Missing => {}
            }
        }
        match (has_number, has_text) {
            (_, false) => ColumnKind::Numeric,
            (false, true) => ColumnKind::Text,
            (true, true) => ColumnKind::Mixed,
        }
    }

    /// Mean over the numeric cells, skipping holes. `None` when the column
    /// has no numbers at all, in which case filling leaves it untouched.
    pub fn mean(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for value in &self.values {
            if let CellValue::Number(n) = value {
                sum += n;
                count += 1;
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete parsed file
// ---------------------------------------------------------------------------

/// An ordered set of equal-length named columns; the in-memory form of one
/// uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting ragged column lengths.
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns[1..] {
                if column.values.len() != expected {
                    return Err(DataError::LengthMismatch {
                        column: column.name.clone(),
                        expected,
                        found: column.values.len(),
                    });
                }
            }
        }
        Ok(Table { columns })
    }

    /// Number of rows (all columns agree by construction).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
