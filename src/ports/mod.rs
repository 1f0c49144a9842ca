//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the sync engine and an external
//! system (time, the issue tracker, the spreadsheet, body templating).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod issues;
pub mod sheets;
pub mod template;

pub use clock::Clock;
pub use issues::{Actor, IssueRequest, IssueTracker, RepoRef, TrackedIssue};
pub use sheets::{InputMode, SheetSource};
pub use template::{TemplateInput, TemplateRenderer};
