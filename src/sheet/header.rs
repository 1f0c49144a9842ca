//! Header index: column names in sheet order plus a name lookup.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{json_kind, SyncError};

/// Column names from the first row of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index from the header row of a range.
    ///
    /// Blank header cells keep their position but cannot be looked up by name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedHeader`] if a cell is not a string and
    /// [`SyncError::DuplicateHeader`] if a non-empty name appears twice.
    pub fn from_row(row: &[Value]) -> Result<Self, SyncError> {
        let mut names = Vec::with_capacity(row.len());
        let mut index = HashMap::with_capacity(row.len());
        for (column, cell) in row.iter().enumerate() {
            let Value::String(name) = cell else {
                return Err(SyncError::MalformedHeader { column, kind: json_kind(cell) });
            };
            if !name.is_empty() && index.insert(name.clone(), column).is_some() {
                return Err(SyncError::DuplicateHeader { column, name: name.clone() });
            }
            names.push(name.clone());
        }
        Ok(Self { names, index })
    }

    /// Column names in sheet order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the header row was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Zero-based position of `name`, if present.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns `true` if `name` is a column.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Column letter for `name`, if present.
    #[must_use]
    pub fn letter(&self, name: &str) -> Option<String> {
        self.position(name).map(column_letter)
    }

    /// Column letter for a column the caller cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingColumn`] if `name` is not a column.
    pub fn must_letter(&self, name: &str) -> Result<String, SyncError> {
        self.letter(name).ok_or_else(|| SyncError::MissingColumn { column: name.to_string() })
    }
}

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Converts a zero-based column index into spreadsheet letters
/// (`0 → A`, `25 → Z`, `26 → AA`, `701 → ZZ`, `702 → AAA`).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        out.push(char::from(ALPHABET[(n - 1) % 26]));
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
