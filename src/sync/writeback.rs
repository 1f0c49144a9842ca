//! Write-back batches: one single-column range per written column.

use serde::Serialize;

use super::columns;
use crate::error::SyncError;
use crate::sheet::{column_range, CellValue, HeaderIndex};

/// Values computed for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBack {
    /// Issue reference, usually a link formula.
    pub issue: CellValue,
    /// Issue state.
    pub status: CellValue,
    /// Assignee link, or empty.
    pub assigned: CellValue,
    /// Reaction count.
    pub reacts: CellValue,
}

/// Values for one column, addressed to the data rows of that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteBackBatch {
    /// Header name of the column.
    pub column: String,
    /// A1 range, e.g. `Tasks!C2:C11`.
    pub range: String,
    /// One single-cell row per data row, in input order.
    pub values: Vec<Vec<CellValue>>,
}

#[derive(Debug)]
struct ColumnBuffer {
    name: &'static str,
    letter: String,
    values: Vec<Vec<CellValue>>,
}

impl ColumnBuffer {
    fn new(name: &'static str, letter: String, capacity: usize) -> Self {
        Self { name, letter, values: Vec::with_capacity(capacity) }
    }
}

/// Accumulates write-back values row by row.
///
/// Never reorders or deduplicates: entry `i` of every batch belongs to data row `i`.
#[derive(Debug)]
pub struct WriteBackBuilder {
    sheet: Option<String>,
    issue: ColumnBuffer,
    status: ColumnBuffer,
    assigned: ColumnBuffer,
    reacts: Option<ColumnBuffer>,
}

impl WriteBackBuilder {
    /// Resolves the written columns against the header.
    ///
    /// `github_reacts` is written only when the header has it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingColumn`] if `github_issue`, `github_status`,
    /// or `github_assigned` is absent.
    pub fn new(
        headers: &HeaderIndex,
        sheet: Option<&str>,
        rows: usize,
    ) -> Result<Self, SyncError> {
        let required = |name: &'static str| -> Result<ColumnBuffer, SyncError> {
            Ok(ColumnBuffer::new(name, headers.must_letter(name)?, rows))
        };
        Ok(Self {
            sheet: sheet.map(str::to_string),
            issue: required(columns::ISSUE)?,
            status: required(columns::STATUS)?,
            assigned: required(columns::ASSIGNED)?,
            reacts: headers
                .letter(columns::REACTS)
                .map(|letter| ColumnBuffer::new(columns::REACTS, letter, rows)),
        })
    }

    /// Appends the values for the next row.
    pub fn push(&mut self, entry: WriteBack) {
        self.issue.values.push(vec![entry.issue]);
        self.status.values.push(vec![entry.status]);
        self.assigned.values.push(vec![entry.assigned]);
        if let Some(reacts) = &mut self.reacts {
            reacts.values.push(vec![entry.reacts]);
        }
    }

    /// Number of rows pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issue.values.len()
    }

    /// Returns `true` if no row has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issue.values.is_empty()
    }

    /// Produces the batches in column order issue, status, assigned, reacts.
    #[must_use]
    pub fn finish(self) -> Vec<WriteBackBatch> {
        let rows = self.len();
        let sheet = self.sheet;
        [Some(self.issue), Some(self.status), Some(self.assigned), self.reacts]
            .into_iter()
            .flatten()
            .map(|buf| WriteBackBatch {
                column: buf.name.to_string(),
                range: column_range(sheet.as_deref(), &buf.letter, rows),
                values: buf.values,
            })
            .collect()
    }
}
