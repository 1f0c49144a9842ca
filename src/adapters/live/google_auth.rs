//! OAuth2 installed-app flow for the Google Sheets API.
//!
//! The token cache file uses the same JSON shape as Google's quickstart
//! samples (`access_token`, `token_type`, `refresh_token`, `expiry`).

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http::{read_json, BlockingHttp};
use crate::error::PortError;

/// OAuth scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Client secret as downloaded from the Google Cloud console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Consent page endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Registered redirect URIs; the first is used.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// The credentials file wraps the secret in an `installed` or `web` key.
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Parses a credentials JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or has neither key.
    pub fn from_json(json: &str) -> Result<Self, PortError> {
        let file: CredentialsFile = serde_json::from_str(json)
            .map_err(|e| -> PortError { format!("invalid Google credentials: {e}").into() })?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "Google credentials have neither an \"installed\" nor a \"web\" client".into())
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uris.first().map_or(OOB_REDIRECT, String::as_str)
    }

    /// URL the user visits to grant access.
    ///
    /// # Errors
    ///
    /// Returns an error if `auth_uri` is not a valid URL.
    pub fn consent_url(&self) -> Result<Url, PortError> {
        let url = Url::parse_with_params(
            &self.auth_uri,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri()),
                ("response_type", "code"),
                ("scope", SHEETS_SCOPE),
                ("access_type", "offline"),
                ("state", "state-token"),
            ],
        )?;
        Ok(url)
    }
}

/// A cached access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer token sent with each request.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Long-lived token used to mint new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When `access_token` stops working.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Returns `true` if the token is expired or expires within a minute of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry - Duration::seconds(60) <= now)
    }

    fn renewal(&self, now: DateTime<Utc>) -> Renewal {
        if !self.is_expired(now) {
            return Renewal::Keep;
        }
        match &self.refresh_token {
            Some(refresh) => Renewal::Refresh(refresh.clone()),
            None => Renewal::Reauthorize,
        }
    }
}

/// What to do with a cached token before using it.
#[derive(Debug, PartialEq, Eq)]
enum Renewal {
    Keep,
    Refresh(String),
    Reauthorize,
}

/// Token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<String>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// Supplies access tokens, loading, refreshing, or requesting them as needed.
pub struct GoogleAuth {
    secret: ClientSecret,
    token_path: PathBuf,
    token: Mutex<Option<Token>>,
}

impl GoogleAuth {
    /// Reads the client secret. The token cache is read lazily.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials file cannot be read or parsed.
    pub fn from_files(credentials_path: &Path, token_path: &Path) -> Result<Self, PortError> {
        let json = std::fs::read_to_string(credentials_path).map_err(|e| -> PortError {
            format!("failed to read {}: {e}", credentials_path.display()).into()
        })?;
        Ok(Self {
            secret: ClientSecret::from_json(&json)?,
            token_path: token_path.to_path_buf(),
            token: Mutex::new(None),
        })
    }

    /// Returns a usable access token.
    ///
    /// # Errors
    ///
    /// Returns an error if no token can be loaded, refreshed, or obtained.
    pub fn access_token(&self, http: &BlockingHttp) -> Result<String, PortError> {
        let mut guard = self.token.lock().map_err(|_| "token cache lock poisoned")?;
        let now = Utc::now();
        let current = match guard.take() {
            Some(token) => token,
            None => match load_token(&self.token_path) {
                Some(token) => token,
                None => {
                    let token = self.authorize_interactively(http)?;
                    save_token(&self.token_path, &token)?;
                    token
                }
            },
        };
        let token = match current.renewal(now) {
            Renewal::Keep => current,
            Renewal::Refresh(refresh) => {
                debug!("refreshing expired Google access token");
                let token = self.refresh(http, &refresh)?;
                save_token(&self.token_path, &token)?;
                token
            }
            Renewal::Reauthorize => {
                debug!("cached Google token expired without a refresh token");
                let token = self.authorize_interactively(http)?;
                save_token(&self.token_path, &token)?;
                token
            }
        };
        let access = token.access_token.clone();
        *guard = Some(token);
        Ok(access)
    }

    fn authorize_interactively(&self, http: &BlockingHttp) -> Result<Token, PortError> {
        let url = self.secret.consent_url()?;
        eprintln!(
            "Go to the following link in your browser then type the authorization code:\n{url}"
        );
        std::io::stderr().flush()?;
        let mut code = String::new();
        std::io::stdin().lock().read_line(&mut code)?;
        let code = code.trim();
        if code.is_empty() {
            return Err("no authorization code entered".into());
        }
        self.request_token(
            http,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.secret.redirect_uri()),
            ],
            None,
        )
    }

    fn refresh(&self, http: &BlockingHttp, refresh_token: &str) -> Result<Token, PortError> {
        self.request_token(
            http,
            &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
            Some(refresh_token.to_string()),
        )
    }

    fn request_token(
        &self,
        http: &BlockingHttp,
        grant: &[(&str, &str)],
        previous_refresh: Option<String>,
    ) -> Result<Token, PortError> {
        let mut form = vec![
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
        ];
        form.extend_from_slice(grant);
        let request = http.client().post(&self.secret.token_uri).form(&form);
        let response: TokenResponse = http.block_on(async move {
            let response = request.send().await.map_err(|e| -> PortError {
                format!("Google token request failed: {e}").into()
            })?;
            read_json("Google OAuth", response).await
        })?;
        Ok(response.into_token(Utc::now(), previous_refresh))
    }
}

fn load_token(path: &Path) -> Option<Token> {
    let json = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&json).ok()
}

fn save_token(path: &Path, token: &Token) -> Result<(), PortError> {
    info!(path = %path.display(), "saving Google credential file");
    let json = serde_json::to_string(token)?;
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .map_err(|e| -> PortError { format!("unable to cache oauth token: {e}").into() })?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "shh",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
        }
    }"#;

    #[test]
    fn parses_installed_and_web_credentials() {
        let secret = ClientSecret::from_json(INSTALLED).unwrap();
        assert_eq!(secret.client_id, "id.apps.googleusercontent.com");

        let web = r#"{"web": {"client_id": "w", "client_secret": "s"}}"#;
        let secret = ClientSecret::from_json(web).unwrap();
        assert_eq!(secret.token_uri, DEFAULT_TOKEN_URI);
        assert_eq!(secret.redirect_uri(), OOB_REDIRECT);

        assert!(ClientSecret::from_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn consent_url_requests_offline_sheets_access() {
        let url = ClientSecret::from_json(INSTALLED).unwrap().consent_url().unwrap();
        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert!(pairs.contains(&("scope".into(), SHEETS_SCOPE.into())));
        assert!(pairs.contains(&("access_type".into(), "offline".into())));
        assert!(pairs.contains(&("redirect_uri".into(), OOB_REDIRECT.into())));
    }

    #[test]
    fn reads_quickstart_token_cache_format() {
        let json = r#"{"access_token":"ya29","token_type":"Bearer","refresh_token":"1//r","expiry":"2024-06-15T11:30:00.123456+01:00"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.refresh_token.as_deref(), Some("1//r"));
        assert_eq!(token.expiry.unwrap().to_rfc3339(), "2024-06-15T10:30:00.123456+00:00");
    }

    #[test]
    fn expiry_has_a_minute_of_slack() {
        let expiry = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z").unwrap().with_timezone(&Utc);
        let token = Token {
            access_token: "a".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expiry: Some(expiry),
        };
        assert!(!token.is_expired(expiry - Duration::minutes(5)));
        assert!(token.is_expired(expiry - Duration::seconds(30)));
        assert!(!Token { expiry: None, ..token }.is_expired(expiry));
    }

    #[test]
    fn expired_token_without_refresh_token_needs_new_consent() {
        let expiry = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z").unwrap().with_timezone(&Utc);
        let token = Token {
            access_token: "a".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expiry: Some(expiry),
        };
        let later = expiry + Duration::hours(1);
        assert_eq!(token.renewal(expiry - Duration::hours(1)), Renewal::Keep);
        assert_eq!(token.renewal(later), Renewal::Reauthorize);
        let refreshable = Token { refresh_token: Some("1//r".into()), ..token };
        assert_eq!(refreshable.renewal(later), Renewal::Refresh("1//r".into()));
    }

    #[test]
    fn refresh_response_keeps_previous_refresh_token() {
        let now = Utc::now();
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"new","expires_in":3599}"#).unwrap();
        let token = response.into_token(now, Some("keep".into()));
        assert_eq!(token.refresh_token.as_deref(), Some("keep"));
        assert_eq!(token.expiry, Some(now + Duration::seconds(3599)));
    }

    #[test]
    fn saved_token_loads_back() {
        let dir = std::env::temp_dir().join("sheetsync_google_token_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token.json");
        let token = Token {
            access_token: "a".into(),
            token_type: "Bearer".into(),
            refresh_token: Some("r".into()),
            expiry: None,
        };
        save_token(&path, &token).unwrap();
        assert_eq!(load_token(&path), Some(token));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
