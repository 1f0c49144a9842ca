//! Replaying adapter for the `SheetSource` port.

use std::sync::Mutex;

use serde_json::Value;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::{InputMode, SheetSource};
use crate::sheet::CellValue;

/// Serves recorded spreadsheet reads and write acknowledgements.
pub struct ReplayingSheetSource {
    replayer: Option<Mutex<CassetteReplayer>>,
}

impl ReplayingSheetSource {
    /// Creates a source backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Some(Mutex::new(replayer)) }
    }

    /// A source with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl SheetSource for ReplayingSheetSource {
    fn read_range(&self, _range: &str) -> Result<Vec<Vec<Value>>, PortError> {
        replay_result(next_output(self.replayer.as_ref(), "sheets", "read_range"))
    }

    fn write_range(
        &self,
        _range: &str,
        _values: &[Vec<CellValue>],
        _mode: InputMode,
    ) -> Result<(), PortError> {
        replay_result(next_output(self.replayer.as_ref(), "sheets", "write_range"))
    }
}
