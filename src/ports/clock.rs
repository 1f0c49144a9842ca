//! Clock port.

use chrono::{DateTime, Utc};

/// Source of the timestamp stamped into issue footers and templates.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
