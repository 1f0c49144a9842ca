//! Issue tracker port.

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// Owner and name of the repository issues live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Account or organisation that owns the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A tracker account: the authenticated actor or an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Handle, without the leading `@`.
    pub login: String,
    /// Profile URL.
    pub html_url: String,
}

/// Snapshot of an issue as the tracker returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
    /// Issue number within the repository.
    pub number: u64,
    /// Current title.
    pub title: String,
    /// Current body; empty when the tracker has none.
    pub body: String,
    /// Label names, in tracker order.
    pub labels: Vec<String>,
    /// State string (e.g. "open", "closed").
    pub state: String,
    /// Assignee, if any.
    pub assignee: Option<Actor>,
    /// Total reaction count.
    pub reactions: u64,
    /// Canonical web URL.
    pub html_url: String,
}

/// Full content written on create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Issue title.
    pub title: String,
    /// Rendered body, attribution footer included.
    pub body: String,
    /// Sorted label names.
    pub labels: Vec<String>,
}

/// Creates, fetches, and edits issues in an external tracker.
///
/// Abstracting the tracker allows deterministic replay and testing
/// without touching a real issue tracker API.
pub trait IssueTracker: Send + Sync {
    /// Returns the authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    fn current_user(&self) -> Result<Actor, PortError>;

    /// Creates a new issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be created.
    fn create_issue(&self, repo: &RepoRef, request: &IssueRequest)
        -> Result<TrackedIssue, PortError>;

    /// Fetches an issue by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue does not exist or cannot be fetched.
    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<TrackedIssue, PortError>;

    /// Replaces an issue's title, body, and labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be found or updated.
    fn edit_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError>;
}
