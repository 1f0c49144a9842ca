//! Typed view over a rectangular range read from the spreadsheet.

pub mod header;
pub mod range;
pub mod row;

pub use header::{column_letter, HeaderIndex};
pub use range::{column_range, sheet_name};
pub use row::{rows_from_values, CellValue, Row};
