//! Command dispatch and handlers.

pub mod headers;
pub mod sync;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::{Settings, SHEETSYNC_RECORD};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `SHEETSYNC_RECORD` is set to a directory path, every port interaction
/// is recorded to per-port cassette files under that directory.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env();
    let spreadsheet_id = &command.sheet().spreadsheet_id;
    let (ctx, session) = match env::var(SHEETSYNC_RECORD) {
        Ok(path) if !path.is_empty() => {
            let (ctx, session) =
                ServiceContext::recording_at(&PathBuf::from(path), &settings, spreadsheet_id)?;
            (ctx, Some(session))
        }
        _ => (ServiceContext::live(&settings, spreadsheet_id)?, None),
    };

    let result = dispatch_with_context(command, &ctx);

    if let Some(session) = session {
        // Release the adapters' recorder handles before writing.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Sync(args) => sync::run(ctx, args),
        Command::Headers(sheet) => headers::run(ctx, &sheet.spreadsheet_range),
    }
}

fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
