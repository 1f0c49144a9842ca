//! `sheetsync headers` command.

use crate::context::ServiceContext;
use crate::error::SyncError;
use crate::sheet::{column_letter, HeaderIndex};

/// Execute the `headers` command.
///
/// # Errors
///
/// Returns an error string if the range cannot be read or its header is invalid.
pub fn run(ctx: &ServiceContext, range: &str) -> Result<(), String> {
    let listing = list(ctx, range).map_err(|e| e.to_string())?;
    print!("{listing}");
    Ok(())
}

/// One line per named header (`<letter>\t<name>`) followed by the data row count.
///
/// # Errors
///
/// Returns a [`SyncError`] if the range cannot be read, is empty, or has a
/// malformed header row.
pub fn list(ctx: &ServiceContext, range: &str) -> Result<String, SyncError> {
    let values = ctx.sheets.read_range(range).map_err(|e| SyncError::sheets("read_range", e))?;
    let (header_row, data) = values.split_first().ok_or(SyncError::EmptyRange)?;
    let headers = HeaderIndex::from_row(header_row)?;

    let mut out = String::new();
    for (index, name) in headers.names().iter().enumerate() {
        if !name.is_empty() {
            out.push_str(&format!("{}\t{name}\n", column_letter(index)));
        }
    }
    out.push_str(&format!("{} data rows\n", data.len()));
    Ok(out)
}
