//! Environment settings and per-run engine configuration.

use std::env;
use std::path::PathBuf;

use crate::adapters::live::github::DEFAULT_API_URL;
use crate::ports::RepoRef;
use crate::sheet::sheet_name;
use crate::sync::SyncConfig;

/// Variable holding the GitHub personal access token.
pub const GITHUB_API_KEY: &str = "GITHUB_API_KEY";
/// Variable overriding the GitHub REST root.
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
/// Variable overriding the Google client credentials path.
pub const GOOGLE_CREDENTIALS_PATH: &str = "GOOGLE_CREDENTIALS_PATH";
/// Variable overriding the cached Google token path.
pub const GOOGLE_TOKEN_PATH: &str = "GOOGLE_TOKEN_PATH";
/// Variable naming a directory to record cassettes into.
pub const SHEETSYNC_RECORD: &str = "SHEETSYNC_RECORD";

/// Credentials and endpoints read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// GitHub token; only needed once the tracker is used.
    pub github_token: Option<String>,
    /// GitHub REST root.
    pub github_api_url: String,
    /// Google OAuth client credentials file.
    pub google_credentials: PathBuf,
    /// Cached Google OAuth token file.
    pub google_token: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            github_token: var(GITHUB_API_KEY),
            github_api_url: var(GITHUB_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            google_credentials: var(GOOGLE_CREDENTIALS_PATH)
                .map_or_else(|| PathBuf::from("google_credentials.json"), PathBuf::from),
            google_token: var(GOOGLE_TOKEN_PATH)
                .map_or_else(|| PathBuf::from("google_token.json"), PathBuf::from),
        }
    }

    /// The GitHub token, or an error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_API_KEY` is unset.
    pub fn require_github_token(&self) -> Result<&str, String> {
        self.github_token
            .as_deref()
            .ok_or_else(|| format!("{GITHUB_API_KEY} must be set to talk to GitHub"))
    }
}

/// Builds the engine configuration for one repository and read range.
#[must_use]
pub fn sync_config(owner: &str, repo: &str, range: &str) -> SyncConfig {
    SyncConfig {
        repo: RepoRef { owner: owner.to_string(), repo: repo.to_string() },
        sheet: sheet_name(range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]);
        assert_eq!(s.github_api_url, "https://api.github.com");
        assert_eq!(s.google_credentials, PathBuf::from("google_credentials.json"));
        assert_eq!(s.google_token, PathBuf::from("google_token.json"));
        assert!(s.require_github_token().unwrap_err().contains("GITHUB_API_KEY"));
    }

    #[test]
    fn overrides_are_read() {
        let s = settings(&[
            (GITHUB_API_KEY, "ghp_x"),
            (GITHUB_API_URL, "https://ghe.example.com/api/v3"),
            (GOOGLE_TOKEN_PATH, "/tmp/tok.json"),
            (GOOGLE_CREDENTIALS_PATH, ""),
        ]);
        assert_eq!(s.require_github_token().unwrap(), "ghp_x");
        assert_eq!(s.github_api_url, "https://ghe.example.com/api/v3");
        assert_eq!(s.google_token, PathBuf::from("/tmp/tok.json"));
        assert_eq!(s.google_credentials, PathBuf::from("google_credentials.json"));
    }

    #[test]
    fn sync_config_takes_sheet_from_range() {
        let config = sync_config("acme", "roadmap", "Backlog!A1:Z");
        assert_eq!(config.repo.to_string(), "acme/roadmap");
        assert_eq!(config.sheet.as_deref(), Some("Backlog"));
        assert_eq!(sync_config("a", "b", "A1:Z").sheet, None);
    }
}
