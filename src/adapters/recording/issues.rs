//! Recording adapter for the `IssueTracker` port.

use serde::Serialize;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::error::PortError;
use crate::ports::{Actor, IssueRequest, IssueTracker, RepoRef, TrackedIssue};

/// Records tracker calls while delegating to an inner tracker.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: SharedRecorder,
}

impl RecordingIssueTracker {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct IssueInput<'a> {
    repo: &'a RepoRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request: Option<&'a IssueRequest>,
}

impl IssueTracker for RecordingIssueTracker {
    fn current_user(&self) -> Result<Actor, PortError> {
        let result = self.inner.current_user();
        record_result(&self.recorder, "issues", "current_user", &(), &result);
        result
    }

    fn create_issue(
        &self,
        repo: &RepoRef,
        request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        let result = self.inner.create_issue(repo, request);
        let input = IssueInput { repo, number: None, request: Some(request) };
        record_result(&self.recorder, "issues", "create_issue", &input, &result);
        result
    }

    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<TrackedIssue, PortError> {
        let result = self.inner.get_issue(repo, number);
        let input = IssueInput { repo, number: Some(number), request: None };
        record_result(&self.recorder, "issues", "get_issue", &input, &result);
        result
    }

    fn edit_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        let result = self.inner.edit_issue(repo, number, request);
        let input = IssueInput { repo, number: Some(number), request: Some(request) };
        record_result(&self.recorder, "issues", "edit_issue", &input, &result);
        result
    }
}
