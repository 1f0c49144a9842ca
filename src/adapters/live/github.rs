//! Live adapter for the `IssueTracker` port using the GitHub REST API.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::http::{read_json, BlockingHttp};
use crate::error::PortError;
use crate::ports::{Actor, IssueRequest, IssueTracker, RepoRef, TrackedIssue};

/// Default REST endpoint for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// GitHub issue tracker authenticated with a personal access token.
pub struct GitHubClient {
    http: BlockingHttp,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Creates a client for `base_url` (e.g. [`DEFAULT_API_URL`] or a GHES `/api/v3` root).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be set up.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, PortError> {
        Ok(Self {
            http: BlockingHttp::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn issues_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, repo.owner, repo.repo)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PortError> {
        let request = request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        self.http.block_on(async move {
            let response = request
                .send()
                .await
                .map_err(|e| -> PortError { format!("GitHub API request failed: {e}").into() })?;
            read_json("GitHub", response).await
        })
    }
}

/// User object in GitHub responses.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
    html_url: String,
}

/// Label object in GitHub responses.
#[derive(Deserialize)]
struct GitHubLabel {
    name: String,
}

/// Reaction rollup attached to an issue.
#[derive(Deserialize)]
struct GitHubReactions {
    total_count: u64,
}

/// Issue object in GitHub responses.
#[derive(Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    state: String,
    assignee: Option<GitHubUser>,
    reactions: Option<GitHubReactions>,
    html_url: String,
}

impl From<GitHubUser> for Actor {
    fn from(user: GitHubUser) -> Self {
        Self { login: user.login, html_url: user.html_url }
    }
}

impl From<GitHubIssue> for TrackedIssue {
    fn from(issue: GitHubIssue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            state: issue.state,
            assignee: issue.assignee.map(Actor::from),
            reactions: issue.reactions.map_or(0, |r| r.total_count),
            html_url: issue.html_url,
        }
    }
}

impl IssueTracker for GitHubClient {
    fn current_user(&self) -> Result<Actor, PortError> {
        let url = format!("{}/user", self.base_url);
        let user: GitHubUser = self.send(self.http.client().get(url))?;
        Ok(user.into())
    }

    fn create_issue(
        &self,
        repo: &RepoRef,
        request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        let builder = self.http.client().post(self.issues_url(repo)).json(request);
        let issue: GitHubIssue = self.send(builder)?;
        Ok(issue.into())
    }

    fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<TrackedIssue, PortError> {
        let url = format!("{}/{number}", self.issues_url(repo));
        let issue: GitHubIssue = self.send(self.http.client().get(url))?;
        Ok(issue.into())
    }

    fn edit_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        request: &IssueRequest,
    ) -> Result<TrackedIssue, PortError> {
        let url = format!("{}/{number}", self.issues_url(repo));
        let issue: GitHubIssue = self.send(self.http.client().patch(url).json(request))?;
        Ok(issue.into())
    }
}
