//! Row model: one data row of the range, normalised to strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::header::HeaderIndex;
use crate::error::{json_kind, SyncError};

/// A single cell value as the spreadsheet API hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A boolean cell.
    Bool(bool),
    /// A numeric cell.
    Number(f64),
    /// A text cell.
    Text(String),
}

impl CellValue {
    /// Converts a raw JSON cell, returning `None` for kinds a cell cannot hold.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Canonical string form: `true`/`false`, six-decimal fixed point, or the text.
    #[must_use]
    pub fn into_canonical(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format!("{n:.6}"),
            Self::Text(s) => s,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One data row, with one string per header column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'h> {
    number: usize,
    values: Vec<String>,
    headers: &'h HeaderIndex,
}

impl<'h> Row<'h> {
    /// Builds a row from raw cells. `number` is the spreadsheet row number.
    ///
    /// Missing trailing cells become empty strings; extra cells are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnsupportedCellType`] for a cell that is not a
    /// boolean, number, or string.
    pub fn from_cells(
        headers: &'h HeaderIndex,
        number: usize,
        cells: &[Value],
    ) -> Result<Self, SyncError> {
        let mut values = Vec::with_capacity(headers.len());
        for column in 0..headers.len() {
            let value = match cells.get(column) {
                None => String::new(),
                Some(cell) => CellValue::from_json(cell)
                    .ok_or(SyncError::UnsupportedCellType {
                        row: number,
                        column,
                        kind: json_kind(cell),
                    })?
                    .into_canonical(),
            };
            values.push(value);
        }
        Ok(Self { number, values, headers })
    }

    /// Spreadsheet row number (the header is row 1).
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Cell values in column order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of column `name`, or `None` if the header has no such column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.position(name).map(|i| self.values[i].as_str())
    }

    /// Value of a column the row cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FieldRequired`] if the header has no such column.
    pub fn must_get(&self, name: &str) -> Result<&str, SyncError> {
        self.get(name).ok_or_else(|| SyncError::FieldRequired {
            row: self.number,
            column: name.to_string(),
        })
    }

    /// All named columns as a map, for template rendering.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.headers
            .names()
            .iter()
            .zip(&self.values)
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Builds rows from the data part of a range (everything after the header row).
///
/// # Errors
///
/// Returns the first [`SyncError::UnsupportedCellType`] encountered.
pub fn rows_from_values<'h>(
    headers: &'h HeaderIndex,
    data: &[Vec<Value>],
) -> Result<Vec<Row<'h>>, SyncError> {
    data.iter()
        .enumerate()
        .map(|(i, cells)| Row::from_cells(headers, i + 2, cells))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers() -> HeaderIndex {
        HeaderIndex::from_row(&[json!("title"), json!("done"), json!("points")]).unwrap()
    }

    #[test]
    fn cells_are_normalised_to_strings() {
        let headers = headers();
        let row = Row::from_cells(&headers, 2, &[json!("Fix it"), json!(true), json!(3)])
            .unwrap();
        assert_eq!(row.values(), ["Fix it", "true", "3.000000"]);
        assert_eq!(row.number(), 2);
    }

    #[test]
    fn short_rows_are_padded() {
        let headers = headers();
        let row = Row::from_cells(&headers, 5, &[json!("only title")]).unwrap();
        assert_eq!(row.values().len(), headers.len());
        assert_eq!(row.get("points"), Some(""));
    }

    #[test]
    fn unsupported_cell_reports_row_and_column() {
        let headers = headers();
        let err = Row::from_cells(&headers, 4, &[json!("t"), json!(null)]).unwrap_err();
        assert!(matches!(
            err,
            SyncError::UnsupportedCellType { row: 4, column: 1, kind: "null" }
        ));
    }

    #[test]
    fn must_get_present_and_absent() {
        let headers = headers();
        let row = Row::from_cells(&headers, 2, &[json!("t"), json!(false), json!(1.5)])
            .unwrap();
        assert_eq!(row.must_get("points").unwrap(), "1.500000");
        assert!(matches!(
            row.must_get("github_issue"),
            Err(SyncError::FieldRequired { row: 2, column }) if column == "github_issue"
        ));
        assert_eq!(row.get("github_issue"), None);
    }

    #[test]
    fn to_map_exposes_every_column() {
        let headers = headers();
        let row = Row::from_cells(&headers, 2, &[json!("t"), json!(false), json!("x")])
            .unwrap();
        let map = row.to_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["done"], "false");
    }

    #[test]
    fn rows_are_numbered_from_two() {
        let headers = headers();
        let data = vec![vec![json!("a")], vec![json!("b")], vec![json!("c")]];
        let rows = rows_from_values(&headers, &data).unwrap();
        let numbers: Vec<usize> = rows.iter().map(Row::number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
    }

    #[test]
    fn write_values_serialise_untagged() {
        let values = vec![CellValue::from("open"), CellValue::Number(3.0), CellValue::Bool(true)];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!(["open", 3.0, true]));
    }
}
