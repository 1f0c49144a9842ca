//! Issue references in the sheet and the link formulas written back.

use crate::error::SyncError;
use crate::ports::{Actor, TrackedIssue};

/// Parses a `#<n>` reference. `row` is used for the error only.
///
/// # Errors
///
/// Returns [`SyncError::MalformedReference`] unless `raw` is `#` followed by
/// a positive decimal integer.
pub fn parse_issue_reference(row: usize, raw: &str) -> Result<u64, SyncError> {
    let malformed = || SyncError::MalformedReference { row, value: raw.to_string() };
    let digits = raw.strip_prefix('#').ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    match digits.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(malformed()),
    }
}

/// `=HYPERLINK("<url>", "<label>")` with quotes doubled as the formula syntax requires.
#[must_use]
pub fn hyperlink(url: &str, label: &str) -> String {
    format!(r#"=HYPERLINK("{}", "{}")"#, escape(url), escape(label))
}

/// Link to the issue, labelled `#<n>`.
#[must_use]
pub fn issue_link(issue: &TrackedIssue) -> String {
    hyperlink(&issue.html_url, &format!("#{}", issue.number))
}

/// Link to the assignee's profile labelled `@<login>`, or empty when unassigned.
#[must_use]
pub fn assignee_link(assignee: Option<&Actor>) -> String {
    assignee.map_or_else(String::new, |a| hyperlink(&a.html_url, &format!("@{}", a.login)))
}

fn escape(s: &str) -> String {
    s.replace('"', "\"\"")
}
