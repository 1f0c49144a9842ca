//! Blocking wrapper around the async `reqwest` client.
//!
//! The sync engine is strictly sequential, so every request is driven to
//! completion on a private current-thread runtime before the call returns.

use std::future::Future;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};

use crate::error::PortError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client whose calls block until the response arrives.
pub struct BlockingHttp {
    runtime: Runtime,
    client: Client,
}

impl BlockingHttp {
    /// Creates the client and its runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the TLS backend cannot be set up.
    pub fn new() -> Result<Self, PortError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { runtime, client })
    }

    /// The underlying async client, for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs `future` to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Common shape of JSON error bodies (`{"message": ...}` or `{"error": {"message": ...}}`).
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Reads a response body, turning non-success statuses into errors.
///
/// # Errors
///
/// Returns an error for non-2xx statuses, transport failures, or a body that
/// does not deserialize into `T`.
pub async fn read_json<T: DeserializeOwned>(service: &str, response: Response) -> Result<T, PortError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| -> PortError { format!("failed to read {service} response: {e}").into() })?;

    if !status.is_success() {
        let msg = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message.or_else(|| b.error.and_then(|d| d.message)))
            .unwrap_or(text);
        return Err(format!("{service} API error ({}): {msg}", status.as_u16()).into());
    }

    serde_json::from_str(&text)
        .map_err(|e| -> PortError { format!("failed to parse {service} response: {e}").into() })
}
