use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use super::model::{Cell, LoadError, RawTable, SourceFile, parse_date_text};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an opened file into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` – first worksheet, header row = column names
/// * `.csv`  – header row = column names
/// * `.json` – records orient: `[{ "Date": "...", "Col": 1.0, ... }, ...]`
pub fn load_table(file: &SourceFile) -> Result<RawTable, LoadError> {
    let ext = std::path::Path::new(&file.name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" => load_xlsx(file),
        "csv" => load_csv(file),
        "json" => load_json(file),
        other => {
            return Err(LoadError::Unsupported {
                name: file.name.clone(),
                ext: other.to_string(),
            });
        }
    };

    parsed.map_err(|cause| LoadError::Parse {
        name: file.name.clone(),
        cause,
    })
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

fn load_xlsx(file: &SourceFile) -> Result<RawTable> {
    let cursor = Cursor::new(file.data.as_slice());
    let mut workbook = open_workbook_auto_from_rs(cursor).context("opening workbook")?;

    // The dashboard only ever reads the first worksheet.
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows_iter = range.rows();
    let header = match rows_iter.next() {
        Some(h) => h,
        None => {
            return Ok(RawTable {
                name: file.name.clone(),
                columns: Vec::new(),
                rows: Vec::new(),
            });
        }
    };

    let columns: Vec<String> = header.iter().map(cell_to_header).collect();
    let rows: Vec<Vec<Cell>> = rows_iter
        .map(|row| row.iter().map(xlsx_cell).collect())
        .collect();

    Ok(RawTable {
        name: file.name.clone(),
        columns,
        rows,
    })
}

fn cell_to_header(d: &Data) -> String {
    match d {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn xlsx_cell(d: &Data) -> Cell {
    match d {
        Data::Empty => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Date(ndt.date()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) => match s.get(..10).and_then(parse_iso_date) {
            Some(d) => Cell::Date(d),
            None => Cell::Text(s.clone()),
        },
        Data::String(s) => text_cell(s),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(file: &SourceFile) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(file.data.as_slice());
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(RawTable {
        name: file.name.clone(),
        columns,
        rows,
    })
}

/// Type-guess a text field: empty → Empty, numeric → Number, date-shaped →
/// Date, anything else stays Text.
fn text_cell(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Empty;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Cell::Number(v);
    }
    if let Some(d) = parse_date_text(s) {
        return Cell::Date(d);
    }
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-01-01", "FNB Cards": 120.5, "Group Crime": 40.0 },
///   ...
/// ]
/// ```
fn load_json(file: &SourceFile) -> Result<RawTable> {
    let text = std::str::from_utf8(&file.data).context("JSON file is not UTF-8")?;
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    // Union of keys in first-appearance order across records.
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        // Non-objects were rejected in the first pass.
        let Some(obj) = rec.as_object() else { continue };
        let row: Vec<Cell> = columns
            .iter()
            .map(|col| obj.get(col).map(json_cell).unwrap_or(Cell::Empty))
            .collect();
        rows.push(row);
    }

    Ok(RawTable {
        name: file.name.clone(),
        columns,
        rows,
    })
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Number(n) => match n.as_f64() {
            Some(v) => Cell::Number(v),
            None => Cell::Text(n.to_string()),
        },
        JsonValue::String(s) => text_cell(s),
        JsonValue::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
