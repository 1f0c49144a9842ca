//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod issues;
pub mod sheets;

pub use clock::ReplayingClock;
pub use issues::ReplayingIssueTracker;
pub use sheets::ReplayingSheetSource;

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Pull the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the adapter has no cassette or the cassette is exhausted.
pub(crate) fn next_output(
    replayer: Option<&Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Value {
    let Some(replayer) = replayer else {
        panic!("{port}::{method} called during replay, but no {port} cassette is configured");
    };
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Decode an `{"Ok": v}` / `{"Err": message}` output into a port result.
///
/// # Panics
///
/// Panics when the output has neither key or `v` does not deserialize as `T`.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value) -> Result<T, PortError> {
    if let Some(message) = output.get("Err") {
        let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
        return Err(message.into());
    }
    let Some(value) = output.get("Ok") else {
        panic!("recorded output is neither Ok nor Err: {output}");
    };
    Ok(serde_json::from_value(value.clone()).expect("failed to deserialize recorded Ok value"))
}
