//! Per-row reconciliation: ignore, create, or fetch-compare-edit.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::columns;
use super::drift::has_drifted;
use super::reference::{assignee_link, issue_link, parse_issue_reference};
use super::writeback::{WriteBack, WriteBackBatch, WriteBackBuilder};
use crate::error::SyncError;
use crate::ports::{
    Actor, IssueRequest, IssueTracker, RepoRef, TemplateInput, TemplateRenderer, TrackedIssue,
};
use crate::sheet::{CellValue, HeaderIndex, Row};

/// Where issues live and where write-back goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Repository holding the issues.
    pub repo: RepoRef,
    /// Sheet name prefixed to write-back ranges, if the read range had one.
    pub sheet: Option<String>,
}

/// The acting user and render time, fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// The authenticated tracker account.
    pub actor: Actor,
    /// RFC 3339 timestamp, second precision.
    pub timestamp: String,
}

impl Attribution {
    /// Captures the actor and the time the run started.
    #[must_use]
    pub fn new(actor: Actor, at: DateTime<Utc>) -> Self {
        Self { actor, timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true) }
    }

    /// Trailing block appended to every rendered body.
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "<sub>:robot: This issue was synced with a spreadsheet by {} by [{}]({}) on {}. \
             Changes to titles, body and labels may be overwritten.</sub>",
            env!("CARGO_PKG_NAME"),
            self.actor.login,
            self.actor.html_url,
            self.timestamp,
        )
    }
}

/// What happened to a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The row asked to be skipped.
    Ignored {
        /// Spreadsheet row number.
        row: usize,
    },
    /// A new issue was created.
    Created {
        /// Spreadsheet row number.
        row: usize,
        /// Number of the new issue.
        issue: u64,
    },
    /// The issue matched the row.
    Unchanged {
        /// Spreadsheet row number.
        row: usize,
        /// Issue number.
        issue: u64,
    },
    /// The issue had drifted and was replaced.
    Edited {
        /// Spreadsheet row number.
        row: usize,
        /// Issue number.
        issue: u64,
    },
    /// Dry run: a new issue would be created.
    WouldCreate {
        /// Spreadsheet row number.
        row: usize,
    },
    /// Dry run: the issue has drifted and would be replaced.
    WouldEdit {
        /// Spreadsheet row number.
        row: usize,
        /// Issue number.
        issue: u64,
    },
}

/// Result of reconciling every row.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// One outcome per row, in input order.
    pub outcomes: Vec<RowOutcome>,
    /// Values to write back, one batch per column.
    pub batches: Vec<WriteBackBatch>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} edited, {} unchanged, {} ignored",
            self.count(|o| matches!(o, RowOutcome::Created { .. })),
            self.count(|o| matches!(o, RowOutcome::Edited { .. })),
            self.count(|o| matches!(o, RowOutcome::Unchanged { .. })),
            self.count(|o| matches!(o, RowOutcome::Ignored { .. })),
        )?;
        let planned = (
            self.count(|o| matches!(o, RowOutcome::WouldCreate { .. })),
            self.count(|o| matches!(o, RowOutcome::WouldEdit { .. })),
        );
        if planned != (0, 0) {
            write!(f, ", {} to create, {} to edit", planned.0, planned.1)?;
        }
        Ok(())
    }
}

/// Reconciles rows against the tracker.
///
/// Rows are processed strictly in order and the first error aborts the run:
/// no report is returned, so nothing gets written back.
pub struct Reconciler<'a> {
    tracker: &'a dyn IssueTracker,
    renderer: &'a dyn TemplateRenderer,
    config: &'a SyncConfig,
    attribution: &'a Attribution,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler for one run.
    #[must_use]
    pub fn new(
        tracker: &'a dyn IssueTracker,
        renderer: &'a dyn TemplateRenderer,
        config: &'a SyncConfig,
        attribution: &'a Attribution,
    ) -> Self {
        Self { tracker, renderer, config, attribution, dry_run: false }
    }

    /// Reads issues but never creates or edits them.
    ///
    /// Rows that would change the tracker report `WouldCreate`/`WouldEdit`,
    /// and their write-back keeps the row's current issue cell.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconciles every row and builds the write-back batches.
    ///
    /// # Errors
    ///
    /// Returns the first error hit by any row, or [`SyncError::MissingColumn`]
    /// if a written column is absent from the header.
    pub fn reconcile(&self, headers: &HeaderIndex, rows: &[Row<'_>]) -> Result<SyncReport, SyncError> {
        let mut builder = WriteBackBuilder::new(headers, self.config.sheet.as_deref(), rows.len())?;
        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let (outcome, entry) = self.reconcile_row(row)?;
            outcomes.push(outcome);
            builder.push(entry);
        }
        Ok(SyncReport { outcomes, batches: builder.finish() })
    }

    fn reconcile_row(&self, row: &Row<'_>) -> Result<(RowOutcome, WriteBack), SyncError> {
        let title = row.must_get(columns::TITLE)?;
        let issue_ref = row.must_get(columns::ISSUE)?;
        let labels = split_labels(row.must_get(columns::LABELS)?);

        if row.get(columns::IGNORE).is_some_and(|v| !v.is_empty()) {
            info!(row = row.number(), title, "ignoring row");
            return Ok((RowOutcome::Ignored { row: row.number() }, pass_through(row)?));
        }

        let target = IssueRequest { title: title.to_string(), body: self.render(row)?, labels };

        if issue_ref.is_empty() {
            if self.dry_run {
                info!(row = row.number(), title, "would create issue");
                return Ok((RowOutcome::WouldCreate { row: row.number() }, pass_through(row)?));
            }
            let issue = self
                .tracker
                .create_issue(&self.config.repo, &target)
                .map_err(|e| SyncError::tracker("create_issue", e))?;
            info!(row = row.number(), title, url = %issue.html_url, "created issue");
            let outcome = RowOutcome::Created { row: row.number(), issue: issue.number };
            return Ok((outcome, from_issue(&issue)));
        }

        let number = parse_issue_reference(row.number(), issue_ref)?;
        let issue = self
            .tracker
            .get_issue(&self.config.repo, number)
            .map_err(|e| SyncError::tracker(format!("get_issue #{number}"), e))?;
        debug!(row = row.number(), title, url = %issue.html_url, "checking existing issue");

        if !has_drifted(&target, &issue) {
            let outcome = RowOutcome::Unchanged { row: row.number(), issue: number };
            return Ok((outcome, from_issue(&issue)));
        }

        if self.dry_run {
            info!(row = row.number(), title, url = %issue.html_url, "issue has drifted, would edit");
            let outcome = RowOutcome::WouldEdit { row: row.number(), issue: number };
            return Ok((outcome, from_issue(&issue)));
        }

        info!(row = row.number(), title, url = %issue.html_url, "issue has drifted, editing");
        let issue = self
            .tracker
            .edit_issue(&self.config.repo, number, &target)
            .map_err(|e| SyncError::tracker(format!("edit_issue #{number}"), e))?;
        Ok((RowOutcome::Edited { row: row.number(), issue: number }, from_issue(&issue)))
    }

    fn render(&self, row: &Row<'_>) -> Result<String, SyncError> {
        let input = TemplateInput {
            github_user: self.attribution.actor.login.clone(),
            github_user_url: self.attribution.actor.html_url.clone(),
            time: self.attribution.timestamp.clone(),
            args: row.to_map(),
        };
        let body = self
            .renderer
            .render(&input)
            .map_err(|source| SyncError::Template { row: row.number(), source })?;
        Ok(format!("{body}\n\n{}", self.attribution.footer()))
    }
}

/// Splits a comma-separated label cell, dropping blanks and repeats, and sorts it.
#[must_use]
pub fn split_labels(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    labels.sort();
    labels.dedup();
    labels
}

fn pass_through(row: &Row<'_>) -> Result<WriteBack, SyncError> {
    Ok(WriteBack {
        issue: row.must_get(columns::ISSUE)?.into(),
        status: row.must_get(columns::STATUS)?.into(),
        assigned: row.must_get(columns::ASSIGNED)?.into(),
        reacts: row.get(columns::REACTS).unwrap_or_default().into(),
    })
}

fn from_issue(issue: &TrackedIssue) -> WriteBack {
    // Reaction counts stay far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let reacts = CellValue::Number(issue.reactions as f64);
    WriteBack {
        issue: issue_link(issue).into(),
        status: issue.state.as_str().into(),
        assigned: assignee_link(issue.assignee.as_ref()).into(),
        reacts,
    }
}
