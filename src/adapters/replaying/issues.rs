//! Replaying adapter for the `IssueTracker` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::{Actor, IssueRequest, IssueTracker, RepoRef, TrackedIssue};

/// Serves recorded tracker results.
pub struct ReplayingIssueTracker {
    replayer: Option<Mutex<CassetteReplayer>>,
}

impl ReplayingIssueTracker {
    /// Creates a tracker backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Some(Mutex::new(replayer)) }
    }

    /// A tracker with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn next<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, PortError> {
        replay_result(next_output(self.replayer.as_ref(), "issues", method))
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn current_user(&self) -> Result<Actor, PortError> {
        self.next("current_user")
    }

    fn create_issue(&self, _repo: &RepoRef, _request: &IssueRequest) -> Result<TrackedIssue, PortError> {
        self.next("create_issue")
    }

    fn get_issue(&self, _repo: &RepoRef, _number: u64) -> Result<TrackedIssue, PortError> {
        self.next("get_issue")
    }

    fn edit_issue(
        &self,
        _repo: &RepoRef,
        _number: u64,
        _request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        self.next("edit_issue")
    }
}
