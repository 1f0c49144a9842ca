//! Drift detection between a row's target content and the tracker's copy.

use crate::ports::{IssueRequest, TrackedIssue};

const PARAGRAPH_BREAK: &str = "\n\n";

/// Compares two bodies, ignoring everything after the last blank line.
///
/// The trailing block is the attribution footer, whose timestamp changes on
/// every run.
#[must_use]
pub fn body_matches(rendered: &str, stored: &str) -> bool {
    without_last_paragraph(rendered) == without_last_paragraph(stored)
}

fn without_last_paragraph(body: &str) -> String {
    let mut blocks: Vec<&str> = body.split(PARAGRAPH_BREAK).collect();
    blocks.pop();
    blocks.join(PARAGRAPH_BREAK)
}

/// Compares label sets without regard to order. `target` must already be sorted.
#[must_use]
pub fn labels_match(target: &[String], stored: &[String]) -> bool {
    let mut stored = stored.to_vec();
    stored.sort();
    target == stored.as_slice()
}

/// Returns `true` if the issue's title, labels, or body differ from `target`.
#[must_use]
pub fn has_drifted(target: &IssueRequest, issue: &TrackedIssue) -> bool {
    target.title != issue.title
        || !labels_match(&target.labels, &issue.labels)
        || !body_matches(&target.body, &issue.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn issue(title: &str, body: &str, labels: &[&str]) -> TrackedIssue {
        TrackedIssue {
            number: 42,
            title: title.into(),
            body: body.into(),
            labels: strings(labels),
            state: "open".into(),
            assignee: None,
            reactions: 0,
            html_url: "https://github.com/o/r/issues/42".into(),
        }
    }

    #[test]
    fn labels_match_ignores_order() {
        assert!(labels_match(&strings(&["a", "b"]), &strings(&["b", "a"])));
        assert!(!labels_match(&strings(&["a", "b"]), &strings(&["a"])));
        assert!(labels_match(&[], &[]));
    }

    #[test]
    fn body_ignores_trailing_attribution() {
        let a = "Do the thing.\n\nMore detail.\n\n<sub>synced on 2024-01-01T00:00:00Z</sub>";
        let b = "Do the thing.\n\nMore detail.\n\n<sub>synced on 2025-06-01T09:00:00Z</sub>";
        assert!(body_matches(a, b));
    }

    #[test]
    fn body_change_before_footer_is_drift() {
        let a = "Do the thing.\n\n<sub>footer</sub>";
        let b = "Do another thing.\n\n<sub>footer</sub>";
        assert!(!body_matches(a, b));
    }

    #[test]
    fn body_without_separator_compares_as_empty() {
        assert!(body_matches("one block", "another block"));
        assert!(!body_matches("content\n\nfooter", "no footer"));
    }

    #[test]
    fn has_drifted_checks_each_field() {
        let target = IssueRequest {
            title: "Bug X".into(),
            body: "body\n\nfooter 1".into(),
            labels: strings(&["a", "b"]),
        };
        assert!(!has_drifted(&target, &issue("Bug X", "body\n\nfooter 2", &["b", "a"])));
        assert!(has_drifted(&target, &issue("Bug Y", "body\n\nfooter 2", &["a", "b"])));
        assert!(has_drifted(&target, &issue("Bug X", "body\n\nfooter 2", &["a"])));
        assert!(has_drifted(&target, &issue("Bug X", "other\n\nfooter", &["a", "b"])));
    }
}
