//! Column names the sync recognises. Matching is case-sensitive.

/// Issue title (read).
pub const TITLE: &str = "github_title";
/// Issue reference `#<n>` (read, then overwritten).
pub const ISSUE: &str = "github_issue";
/// Comma-separated labels (read).
pub const LABELS: &str = "github_labels";
/// Non-empty means the row is skipped (optional, read).
pub const IGNORE: &str = "github_ignore";
/// Issue state (written).
pub const STATUS: &str = "github_status";
/// Assignee link (written).
pub const ASSIGNED: &str = "github_assigned";
/// Reaction count (optional, written).
pub const REACTS: &str = "github_reacts";
