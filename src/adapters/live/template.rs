//! Issue body templates with `{{ ... }}` placeholders.
//!
//! Supported actions:
//!
//! - `{{.GithubUser}}`, `{{.GithubUserURL}}`, `{{.Time}}`
//! - `{{.Args.<column>}}` for column names made of word characters
//! - `{{index .Args "<column>"}}` for any column name
//!
//! Values are inserted verbatim.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::PortError;
use crate::ports::{TemplateInput, TemplateRenderer};

/// Problems found while parsing or rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// An action the renderer does not understand.
    #[error("unsupported template action {0:?}")]
    UnsupportedAction(String),
    /// `{{` without a matching `}}`.
    #[error("unclosed action at byte {0}")]
    Unclosed(usize),
    /// The row has no column with this name.
    #[error("template refers to column {0:?}, which the row does not have")]
    UnknownColumn(String),
}

static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("valid action regex"));
static INDEX_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^index\s+\.Args\s+"((?:[^"\\]|\\.)*)"$"#).expect("valid index regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    User,
    UserUrl,
    Time,
    Arg(String),
}

/// A parsed body template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    /// Parses template text.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for unknown actions or unclosed braces.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in ACTION.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else { continue };
            push_literal(&mut segments, &text[last..whole.start()], last)?;
            segments.push(parse_action(inner.as_str())?);
            last = whole.end();
        }
        push_literal(&mut segments, &text[last..], last)?;
        Ok(Self { segments })
    }

    /// Reads and parses a template file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, PortError> {
        let text = std::fs::read_to_string(path).map_err(|e| -> PortError {
            format!("failed to read template {}: {e}", path.display()).into()
        })?;
        Ok(Self::parse(&text)?)
    }

    /// Column names the template reads, in order of first use.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        let mut seen = Vec::new();
        self.segments.iter().filter_map(move |s| match s {
            Segment::Arg(name) if !seen.contains(&name) => {
                seen.push(name);
                Some(name.as_str())
            }
            _ => None,
        })
    }
}

fn push_literal(segments: &mut Vec<Segment>, literal: &str, offset: usize) -> Result<(), TemplateError> {
    if let Some(pos) = literal.find("{{") {
        return Err(TemplateError::Unclosed(offset + pos));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.to_string()));
    }
    Ok(())
}

fn parse_action(action: &str) -> Result<Segment, TemplateError> {
    match action {
        ".GithubUser" => return Ok(Segment::User),
        ".GithubUserURL" => return Ok(Segment::UserUrl),
        ".Time" => return Ok(Segment::Time),
        _ => {}
    }
    if let Some(name) = action.strip_prefix(".Args.") {
        if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Ok(Segment::Arg(name.to_string()));
        }
    }
    if let Some(name) = INDEX_ARGS.captures(action).and_then(|c| c.get(1)) {
        return Ok(Segment::Arg(name.as_str().replace("\\\"", "\"").replace("\\\\", "\\")));
    }
    Err(TemplateError::UnsupportedAction(action.to_string()))
}

impl TemplateRenderer for PlaceholderTemplate {
    fn render(&self, input: &TemplateInput) -> Result<String, PortError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::User => out.push_str(&input.github_user),
                Segment::UserUrl => out.push_str(&input.github_user_url),
                Segment::Time => out.push_str(&input.time),
                Segment::Arg(name) => {
                    let value = input
                        .args
                        .get(name)
                        .ok_or_else(|| TemplateError::UnknownColumn(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn input(args: &[(&str, &str)]) -> TemplateInput {
        TemplateInput {
            github_user: "sync-bot".into(),
            github_user_url: "https://github.com/sync-bot".into(),
            time: "2024-06-15T10:30:00Z".into(),
            args: args.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn renders_metadata_and_columns() {
        let template = PlaceholderTemplate::parse(
            "## {{ .Args.github_title }}\n\n{{index .Args \"Owner team\"}} / {{.GithubUser}} ({{.GithubUserURL}}) at {{.Time}}",
        )
        .unwrap();
        let body = template
            .render(&input(&[("github_title", "Bug X"), ("Owner team", "infra")]))
            .unwrap();
        assert_eq!(
            body,
            "## Bug X\n\ninfra / sync-bot (https://github.com/sync-bot) at 2024-06-15T10:30:00Z"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        let template = PlaceholderTemplate::parse("no actions here } {").unwrap();
        assert_eq!(template.render(&input(&[])).unwrap(), "no actions here } {");
    }

    #[test]
    fn rejects_unknown_action() {
        let err = PlaceholderTemplate::parse("{{ .Nope }}").unwrap_err();
        assert_eq!(err, TemplateError::UnsupportedAction(".Nope".into()));
    }

    #[test]
    fn rejects_unclosed_action() {
        let err = PlaceholderTemplate::parse("ok {{.Time}} then {{ .Args.x").unwrap_err();
        assert_eq!(err, TemplateError::Unclosed(18));
    }

    #[test]
    fn missing_column_fails_render() {
        let template = PlaceholderTemplate::parse("{{.Args.notes}}").unwrap();
        let err = template.render(&input(&[])).unwrap_err();
        assert!(err.to_string().contains("\"notes\""));
    }

    #[test]
    fn lists_columns_once() {
        let template =
            PlaceholderTemplate::parse("{{.Args.a}} {{index .Args \"b c\"}} {{.Args.a}}").unwrap();
        assert_eq!(template.columns().collect::<Vec<_>>(), ["a", "b c"]);
    }
}
