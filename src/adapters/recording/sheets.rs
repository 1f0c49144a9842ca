//! Recording adapter for the `SheetSource` port.

use serde::Serialize;
use serde_json::Value;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::error::PortError;
use crate::ports::{InputMode, SheetSource};
use crate::sheet::CellValue;

/// Records spreadsheet calls while delegating to an inner source.
pub struct RecordingSheetSource {
    inner: Box<dyn SheetSource>,
    recorder: SharedRecorder,
}

impl RecordingSheetSource {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn SheetSource>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ReadInput<'a> {
    range: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    range: &'a str,
    values: &'a [Vec<CellValue>],
    mode: InputMode,
}

impl SheetSource for RecordingSheetSource {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Value>>, PortError> {
        let result = self.inner.read_range(range);
        record_result(&self.recorder, "sheets", "read_range", &ReadInput { range }, &result);
        result
    }

    fn write_range(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        mode: InputMode,
    ) -> Result<(), PortError> {
        let result = self.inner.write_range(range, values, mode);
        let input = WriteInput { range, values, mode };
        record_result(&self.recorder, "sheets", "write_range", &input, &result);
        result
    }
}
