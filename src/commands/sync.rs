//! `sheetsync sync` command.

use tracing::info;

use crate::adapters::live::PlaceholderTemplate;
use crate::cli::SyncArgs;
use crate::config::sync_config;
use crate::context::ServiceContext;
use crate::error::SyncError;
use crate::ports::InputMode;
use crate::sheet::{rows_from_values, HeaderIndex};
use crate::sync::{Attribution, Reconciler, SyncReport};

/// Execute the `sync` command and print its summary.
///
/// # Errors
///
/// Returns an error string if the template cannot be loaded or the run fails.
pub fn run(ctx: &ServiceContext, args: &SyncArgs) -> Result<(), String> {
    let template = PlaceholderTemplate::from_file(&args.template).map_err(|e| e.to_string())?;
    let report = execute(ctx, args, &template).map_err(|e| e.to_string())?;

    if args.dry_run {
        println!("Dry run, would write:");
        let yaml = serde_yaml::to_string(&report.batches)
            .map_err(|e| format!("Failed to format write-back: {e}"))?;
        print!("{yaml}");
    }
    println!("Sync complete: {report}");
    Ok(())
}

/// Reads the range, reconciles every row, and writes the results back.
///
/// With `args.dry_run` set, issues are only read and nothing is written.
///
/// Nothing is written when any row fails.
///
/// # Errors
///
/// Returns the first [`SyncError`] hit while reading, reconciling, or writing.
pub fn execute(
    ctx: &ServiceContext,
    args: &SyncArgs,
    template: &PlaceholderTemplate,
) -> Result<SyncReport, SyncError> {
    let range = &args.sheet.spreadsheet_range;
    let values = ctx.sheets.read_range(range).map_err(|e| SyncError::sheets("read_range", e))?;
    let (header_row, data) = values.split_first().ok_or(SyncError::EmptyRange)?;
    let headers = HeaderIndex::from_row(header_row)?;
    for column in template.columns() {
        if !headers.contains(column) {
            return Err(SyncError::MissingColumn { column: column.to_string() });
        }
    }
    let rows = rows_from_values(&headers, data)?;
    info!(range = %range, rows = rows.len(), "read spreadsheet");

    let actor = ctx.issues.current_user().map_err(|e| SyncError::tracker("current_user", e))?;
    let attribution = Attribution::new(actor, ctx.clock.now());
    let config = sync_config(&args.github_owner, &args.github_repo, range);

    let report = Reconciler::new(ctx.issues.as_ref(), template, &config, &attribution)
        .dry_run(args.dry_run)
        .reconcile(&headers, &rows)?;

    if args.dry_run || rows.is_empty() {
        info!(%report, "nothing written");
        return Ok(report);
    }
    for batch in &report.batches {
        ctx.sheets
            .write_range(&batch.range, &batch.values, InputMode::UserEntered)
            .map_err(|e| SyncError::sheets(format!("write_range {}", batch.range), e))?;
    }
    info!(%report, batches = report.batches.len(), "sync complete");
    Ok(report)
}
