//! Spreadsheet port for reading and writing value ranges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PortError;
use crate::sheet::CellValue;

/// How written values are interpreted by the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Stored exactly as given.
    Raw,
    /// Parsed as if typed by a user, so `=HYPERLINK(...)` becomes a formula.
    UserEntered,
}

impl InputMode {
    /// Name used by the Sheets API `valueInputOption` parameter.
    #[must_use]
    pub fn as_api_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Reads and writes rectangular ranges of a single spreadsheet.
pub trait SheetSource: Send + Sync {
    /// Reads `range` as rows of raw cell values.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be read.
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Value>>, PortError>;

    /// Writes `values` (row-major) into `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be written.
    fn write_range(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        mode: InputMode,
    ) -> Result<(), PortError>;
}
