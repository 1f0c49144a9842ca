//! Reconciliation of spreadsheet rows against tracked issues.
//!
//! One qualifying row maps to exactly one issue. Rows without an issue get one
//! created; rows with one are compared against the tracker and edited when
//! they have drifted. The engine returns per-column write-back batches that
//! the caller applies to the spreadsheet once every row has succeeded.

pub mod columns;
pub mod drift;
pub mod engine;
pub mod reference;
pub mod writeback;

pub use engine::{Attribution, Reconciler, RowOutcome, SyncConfig, SyncReport};
pub use writeback::{WriteBackBatch, WriteBackBuilder};
