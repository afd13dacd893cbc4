use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SourceFile – an opened spreadsheet, held in memory for the session
// ---------------------------------------------------------------------------

/// A file picked by the user. The name is only used as a classification key;
/// the bytes are parsed fresh on every pipeline pass.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        SourceFile {
            name: name.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell – a single parsed spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Date(d) => write!(f, "{d}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl Cell {
    /// Interpret the cell as a numeric value, if possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interpret the cell as a calendar date, if possible.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date_text(s.trim()),
            _ => None,
        }
    }
}

/// Date forms accepted in text cells: ISO `YYYY-MM-DD`, then `DD/MM/YYYY`,
/// then `MM/DD/YYYY` (first parse wins).
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// RawTable – one parsed worksheet, untyped columns
// ---------------------------------------------------------------------------

/// Header row plus cell rows, straight out of the loader. Rows may be ragged;
/// missing trailing cells read as [`Cell::Empty`].
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Source file name, kept for error messages.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}

// ---------------------------------------------------------------------------
// Dataset – merged table with a parsed Date axis
// ---------------------------------------------------------------------------

/// One row of a [`Dataset`]: a date plus the numeric cells present on it.
/// A column absent from the map is an empty cell (rows from a file that
/// never had that column, or a blank / non-numeric cell).
#[derive(Debug, Clone)]
pub struct DataRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

/// The merged, date-typed table the rest of the pipeline consumes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Value columns in first-appearance order across the merged files.
    /// `Date` itself is not listed.
    pub columns: Vec<String>,
    /// Rows in upload order, concatenated across files.
    pub rows: Vec<DataRow>,
}

/// The `Date` column every dataset must carry.
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{name}: unsupported file extension \".{ext}\"")]
    Unsupported { name: String, ext: String },

    #[error("{name}: could not be read as tabular data: {cause:#}")]
    Parse { name: String, cause: anyhow::Error },

    #[error("{name}: no \"Date\" column found")]
    MissingDateColumn { name: String },

    #[error("{name}: row {row}: \"{value}\" is not a date")]
    BadDate {
        name: String,
        row: usize,
        value: String,
    },
}

impl Dataset {
    /// Build a dataset from one or more raw tables: rows concatenated in
    /// table order, columns unioned in first-appearance order, `Date` cells
    /// parsed. Rows from a table that lacks a column simply have no value
    /// for it.
    pub fn from_tables(tables: &[RawTable]) -> Result<Dataset, LoadError> {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut any_date_col = false;

        for table in tables {
            for col in &table.columns {
                if col == DATE_COLUMN {
                    any_date_col = true;
                    continue;
                }
                if seen.insert(col.clone()) {
                    columns.push(col.clone());
                }
            }
        }

        if !any_date_col {
            let name = tables
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "merged data".to_string());
            return Err(LoadError::MissingDateColumn { name });
        }

        let mut rows = Vec::new();
        for table in tables {
            let date_idx = match table.columns.iter().position(|c| c == DATE_COLUMN) {
                Some(i) => i,
                None => {
                    return Err(LoadError::MissingDateColumn {
                        name: table.name.clone(),
                    })
                }
            };

            for (row_no, _) in table.rows.iter().enumerate() {
                let date_cell = table.cell(row_no, date_idx);
                let date = date_cell.as_date().ok_or_else(|| LoadError::BadDate {
                    name: table.name.clone(),
                    row: row_no,
                    value: date_cell.to_string(),
                })?;

                let mut values = BTreeMap::new();
                for (col_idx, col) in table.columns.iter().enumerate() {
                    if col_idx == date_idx {
                        continue;
                    }
                    if let Some(v) = table.cell(row_no, col_idx).as_f64() {
                        values.insert(col.clone(), v);
                    }
                }
                rows.push(DataRow { date, values });
            }
        }

        Ok(Dataset { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Observed date range (min, max), None when there are no rows.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// All present (non-empty) values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.values.get(column).copied())
            .collect()
    }

    /// Sum of a column over all rows; 0.0 when no values are present.
    pub fn column_sum(&self, column: &str) -> f64 {
        self.column_values(column).iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table(name: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn merge_concatenates_rows_and_unions_columns() {
        let a = table(
            "a.xlsx",
            &["Date", "FNB Cards"],
            vec![
                vec![Cell::Text("2024-01-01".into()), Cell::Number(10.0)],
                vec![Cell::Text("2024-01-02".into()), Cell::Number(20.0)],
            ],
        );
        let b = table(
            "b.xlsx",
            &["Date", "Group Crime"],
            vec![vec![Cell::Text("2024-01-03".into()), Cell::Number(5.0)]],
        );

        let ds = Dataset::from_tables(&[a, b]).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.columns, vec!["FNB Cards", "Group Crime"]);

        // Rows keep upload order; missing columns have no value.
        assert_eq!(ds.rows[0].date, date("2024-01-01"));
        assert_eq!(ds.rows[0].values.get("FNB Cards"), Some(&10.0));
        assert_eq!(ds.rows[0].values.get("Group Crime"), None);
        assert_eq!(ds.rows[2].values.get("Group Crime"), Some(&5.0));
    }

    #[test]
    fn missing_date_column_is_an_error() {
        let t = table("nodates.csv", &["A", "B"], vec![]);
        match Dataset::from_tables(&[t]) {
            Err(LoadError::MissingDateColumn { name }) => assert_eq!(name, "nodates.csv"),
            other => panic!("expected MissingDateColumn, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_cell_is_an_error() {
        let t = table(
            "bad.csv",
            &["Date", "A"],
            vec![vec![Cell::Text("not-a-date".into()), Cell::Number(1.0)]],
        );
        match Dataset::from_tables(&[t]) {
            Err(LoadError::BadDate { row, value, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected BadDate, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cells_become_empty() {
        let t = table(
            "t.csv",
            &["Date", "A"],
            vec![vec![
                Cell::Text("2024-01-01".into()),
                Cell::Text("n/a".into()),
            ]],
        );
        let ds = Dataset::from_tables(&[t]).unwrap();
        assert!(ds.rows[0].values.is_empty());
        assert_eq!(ds.column_values("A"), Vec::<f64>::new());
        assert_eq!(ds.column_sum("A"), 0.0);
    }

    #[test]
    fn numeric_text_cells_are_values() {
        assert_eq!(Cell::Text(" 12.5 ".into()).as_f64(), Some(12.5));
        assert_eq!(Cell::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(Cell::Date(date("2024-01-01")).as_f64(), None);
    }

    #[test]
    fn date_text_formats() {
        assert_eq!(parse_date_text("2024-03-05"), Some(date("2024-03-05")));
        assert_eq!(parse_date_text("05/03/2024"), Some(date("2024-03-05")));
        // Day-first wins when both readings are valid.
        assert_eq!(parse_date_text("01/02/2024"), Some(date("2024-02-01")));
        assert_eq!(parse_date_text("whenever"), None);
    }

    #[test]
    fn date_bounds_span_all_rows() {
        let t = table(
            "t.csv",
            &["Date", "A"],
            vec![
                vec![Cell::Text("2024-01-05".into()), Cell::Number(1.0)],
                vec![Cell::Text("2024-01-02".into()), Cell::Number(2.0)],
            ],
        );
        let ds = Dataset::from_tables(&[t]).unwrap();
        assert_eq!(
            ds.date_bounds(),
            Some((date("2024-01-02"), date("2024-01-05")))
        );
    }
}
