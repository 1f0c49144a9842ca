//! Service context bundling the port trait objects a run needs.

use std::path::Path;

use crate::adapters::live::{GitHubClient, GoogleAuth, SheetsClient, SystemClock};
use crate::adapters::recording::{RecordingClock, RecordingIssueTracker, RecordingSheetSource};
use crate::adapters::replaying::{ReplayingClock, ReplayingIssueTracker, ReplayingSheetSource};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::error::PortError;
use crate::ports::{Actor, Clock, IssueRequest, IssueTracker, RepoRef, SheetSource, TrackedIssue};

/// Bundles the clock, tracker, and spreadsheet behind trait objects.
///
/// Constructors wire up live, recording, or replaying adapters.
pub struct ServiceContext {
    /// Clock for the attribution timestamp.
    pub clock: Box<dyn Clock>,
    /// Issue tracker holding the synced issues.
    pub issues: Box<dyn IssueTracker>,
    /// Spreadsheet the rows come from and write-back goes to.
    pub sheets: Box<dyn SheetSource>,
}

impl ServiceContext {
    /// Creates a live context for one spreadsheet.
    ///
    /// Without a GitHub token the tracker fails on first use, so commands
    /// that never touch it still work.
    ///
    /// # Errors
    ///
    /// Returns an error if the Google credentials cannot be read or an HTTP
    /// client cannot be built.
    pub fn live(settings: &Settings, spreadsheet_id: &str) -> Result<Self, String> {
        let auth = GoogleAuth::from_files(&settings.google_credentials, &settings.google_token)
            .map_err(|e| format!("Failed to load Google credentials: {e}"))?;
        let sheets = SheetsClient::new(auth, spreadsheet_id)
            .map_err(|e| format!("Failed to set up Sheets client: {e}"))?;
        let issues: Box<dyn IssueTracker> = match settings.require_github_token() {
            Ok(token) => Box::new(
                GitHubClient::new(&settings.github_api_url, token)
                    .map_err(|e| format!("Failed to set up GitHub client: {e}"))?,
            ),
            Err(message) => Box::new(UnauthenticatedTracker { message }),
        };
        Ok(Self { clock: Box::new(SystemClock), issues, sheets: Box::new(sheets) })
    }

    /// Creates a live context whose every port call is captured by `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be built.
    pub fn recording(
        settings: &Settings,
        spreadsheet_id: &str,
        session: &RecordingSession,
    ) -> Result<Self, String> {
        let live = Self::live(settings, spreadsheet_id)?;
        Ok(Self {
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            issues: Box::new(RecordingIssueTracker::new(live.issues, session.issues.clone())),
            sheets: Box::new(RecordingSheetSource::new(live.sheets, session.sheets.clone())),
        })
    }

    /// Starts a recording session under `root` and a context feeding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory or the live context cannot
    /// be created.
    pub fn recording_at(
        root: &Path,
        settings: &Settings,
        spreadsheet_id: &str,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, spreadsheet_id)?;
        let ctx = Self::recording(settings, spreadsheet_id, &session)?;
        Ok((ctx, session))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            clock: Box::new(
                replayers.clock.map_or_else(ReplayingClock::unconfigured, ReplayingClock::new),
            ),
            issues: Box::new(
                replayers
                    .issues
                    .map_or_else(ReplayingIssueTracker::unconfigured, ReplayingIssueTracker::new),
            ),
            sheets: Box::new(
                replayers
                    .sheets
                    .map_or_else(ReplayingSheetSource::unconfigured, ReplayingSheetSource::new),
            ),
        })
    }
}

/// Stands in for GitHub when no token is configured.
struct UnauthenticatedTracker {
    message: String,
}

impl UnauthenticatedTracker {
    fn fail<T>(&self) -> Result<T, PortError> {
        Err(self.message.clone().into())
    }
}

impl IssueTracker for UnauthenticatedTracker {
    fn current_user(&self) -> Result<Actor, PortError> {
        self.fail()
    }

    fn create_issue(&self, _repo: &RepoRef, _request: &IssueRequest) -> Result<TrackedIssue, PortError> {
        self.fail()
    }

    fn get_issue(&self, _repo: &RepoRef, _number: u64) -> Result<TrackedIssue, PortError> {
        self.fail()
    }

    fn edit_issue(
        &self,
        _repo: &RepoRef,
        _number: u64,
        _request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        self.fail()
    }
}
