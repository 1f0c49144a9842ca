//! Error taxonomy for a sync run.
//!
//! Every variant aborts the whole run. Nothing is retried and no write-back
//! happens for a run that produced one of these.

use thiserror::Error;

/// Boxed error returned by every port method.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Conditions that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The range contained no rows at all, so there is no header row.
    #[error("expected at least one row in range")]
    EmptyRange,

    /// A header cell was not a string.
    #[error("expected header at column {column} to be a string, found {kind}")]
    MalformedHeader {
        /// Zero-based column index of the offending cell.
        column: usize,
        /// JSON kind of the value found there.
        kind: &'static str,
    },

    /// Two header cells carry the same non-empty name.
    #[error("duplicate header {name:?} at column {column}")]
    DuplicateHeader {
        /// Zero-based column index of the second occurrence.
        column: usize,
        /// The repeated name.
        name: String,
    },

    /// A data cell was neither a boolean, a number, nor a string.
    #[error("unexpected value at row {row}, column {column}: type {kind} unhandled")]
    UnsupportedCellType {
        /// Spreadsheet row number (header is row 1).
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// JSON kind of the value found there.
        kind: &'static str,
    },

    /// A mandatory column was looked up on a row but is not in the header.
    #[error("row {row}: cannot find header {column:?}")]
    FieldRequired {
        /// Spreadsheet row number.
        row: usize,
        /// The missing column name.
        column: String,
    },

    /// A mandatory write-back column is not in the header.
    #[error("cannot find header {column:?}")]
    MissingColumn {
        /// The missing column name.
        column: String,
    },

    /// An issue reference did not have the form `#<number>`.
    #[error("row {row}: expecting issue to look like #<number>, found {value:?}")]
    MalformedReference {
        /// Spreadsheet row number.
        row: usize,
        /// The raw cell value.
        value: String,
    },

    /// The issue tracker rejected or failed a request.
    #[error("issue tracker {operation} failed: {source}")]
    Tracker {
        /// Which call failed.
        operation: String,
        /// Underlying transport or API error.
        #[source]
        source: PortError,
    },

    /// The tabular source rejected or failed a request.
    #[error("spreadsheet {operation} failed: {source}")]
    Sheets {
        /// Which call failed.
        operation: String,
        /// Underlying transport or API error.
        #[source]
        source: PortError,
    },

    /// Rendering the issue body failed.
    #[error("row {row}: rendering body template failed: {source}")]
    Template {
        /// Spreadsheet row number.
        row: usize,
        /// Underlying renderer error.
        #[source]
        source: PortError,
    },
}

impl SyncError {
    pub(crate) fn tracker(operation: impl Into<String>, source: PortError) -> Self {
        Self::Tracker { operation: operation.into(), source }
    }

    pub(crate) fn sheets(operation: impl Into<String>, source: PortError) -> Self {
        Self::Sheets { operation: operation.into(), source }
    }
}

/// Returns a short name for the JSON kind of `value`.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
