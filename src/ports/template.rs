//! Body template port.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PortError;

/// Everything a body template can refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInput {
    /// Login of the acting user.
    pub github_user: String,
    /// Profile URL of the acting user.
    pub github_user_url: String,
    /// Render timestamp, RFC 3339.
    pub time: String,
    /// The row's columns by header name.
    pub args: BTreeMap<String, String>,
}

/// Renders an issue body for one row.
pub trait TemplateRenderer: Send + Sync {
    /// Renders the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the template refers to something `input` lacks.
    fn render(&self, input: &TemplateInput) -> Result<String, PortError>;
}
