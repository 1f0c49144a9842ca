//! End-to-end sync runs against replayed cassettes.
//!
//! 1. Write per-port cassettes for a small sheet and a tracker.
//! 2. Run `sync` against them and check outcomes and write-back.
//! 3. Re-record that run through the recording adapters, replay the new
//!    cassettes, and assert the same report comes out.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use sheetsync::adapters::live::PlaceholderTemplate;
use sheetsync::adapters::recording::{RecordingClock, RecordingIssueTracker, RecordingSheetSource};
use sheetsync::cassette::config::{cassette_file, CassetteConfig};
use sheetsync::cassette::format::Cassette;
use sheetsync::cassette::recorder::CassetteRecorder;
use sheetsync::cassette::session::RecordingSession;
use sheetsync::cli::{SheetArgs, SyncArgs};
use sheetsync::commands::sync::execute;
use sheetsync::context::ServiceContext;
use sheetsync::error::SyncError;
use sheetsync::sheet::CellValue;
use sheetsync::sync::{RowOutcome, SyncReport};

const RANGE: &str = "Tasks!A1:H";

fn issue(number: u64, title: &str, body: &str, labels: &[&str], assignee: Value, reactions: u64) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": body,
        "labels": labels,
        "state": "open",
        "assignee": assignee,
        "reactions": reactions,
        "html_url": format!("https://github.com/acme/roadmap/issues/{number}"),
    })
}

fn sheet_values() -> Value {
    json!([
        ["github_title", "github_issue", "github_labels", "github_ignore",
         "github_status", "github_assigned", "github_reacts", "notes"],
        ["New task", "", "b, a", "", "", "", "", "first"],
        ["Old task", "#5", "bug", "", "open", "", "0", "second"],
        ["Parked", "#7", "", "yes", "closed", "@someone", "3", "third"],
        ["Drifted", "#6", "", "", "open", "", "0", "fourth"]
    ])
}

fn write_cassettes(dir: &Path, write_result: &Value) {
    write_cassettes_for(dir, RANGE, write_result);
}

fn write_cassettes_for(dir: &Path, range: &str, write_result: &Value) {
    std::fs::create_dir_all(dir).unwrap();

    let mut clock = CassetteRecorder::new(dir.join(cassette_file("clock")), "clock", "sheet-1");
    clock.record("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"));
    clock.finish().unwrap();

    let mut issues = CassetteRecorder::new(dir.join(cassette_file("issues")), "issues", "sheet-1");
    issues.record(
        "issues",
        "current_user",
        json!(null),
        json!({"Ok": {"login": "sync-bot", "html_url": "https://github.com/sync-bot"}}),
    );
    issues.record(
        "issues",
        "create_issue",
        json!({}),
        json!({"Ok": issue(10, "New task", "first\n\nfooter", &["a", "b"], json!(null), 0)}),
    );
    issues.record(
        "issues",
        "get_issue",
        json!({"number": 5}),
        json!({"Ok": issue(5, "Old task", "second\n\nan older footer", &["bug"], json!(null), 1)}),
    );
    issues.record(
        "issues",
        "get_issue",
        json!({"number": 6}),
        json!({"Ok": issue(6, "Drifted (old title)", "fourth\n\nfooter", &[], json!(null), 0)}),
    );
    let octocat = json!({"login": "octocat", "html_url": "https://github.com/octocat"});
    issues.record(
        "issues",
        "edit_issue",
        json!({"number": 6}),
        json!({"Ok": issue(6, "Drifted", "fourth\n\nfooter", &[], octocat, 2)}),
    );
    issues.finish().unwrap();

    let mut sheets = CassetteRecorder::new(dir.join(cassette_file("sheets")), "sheets", "sheet-1");
    sheets.record("sheets", "read_range", json!({"range": range}), json!({"Ok": sheet_values()}));
    for _ in 0..4 {
        sheets.record("sheets", "write_range", json!({}), write_result.clone());
    }
    sheets.finish().unwrap();
}

fn args() -> SyncArgs {
    args_for(RANGE, false)
}

fn args_for(range: &str, dry_run: bool) -> SyncArgs {
    SyncArgs {
        sheet: SheetArgs { spreadsheet_id: "sheet-1".into(), spreadsheet_range: range.into() },
        github_owner: "acme".into(),
        github_repo: "roadmap".into(),
        template: PathBuf::from("unused.tmpl"),
        dry_run,
    }
}

fn template() -> PlaceholderTemplate {
    PlaceholderTemplate::parse("{{.Args.notes}}").unwrap()
}

fn link(n: u64) -> CellValue {
    CellValue::from(format!(
        "=HYPERLINK(\"https://github.com/acme/roadmap/issues/{n}\", \"#{n}\")"
    ))
}

fn column(report: &SyncReport, name: &str) -> Vec<CellValue> {
    let batch = report.batches.iter().find(|b| b.column == name).unwrap();
    batch.values.iter().map(|row| row[0].clone()).collect()
}

#[test]
fn sync_from_replayed_cassettes() {
    let dir = std::env::temp_dir().join("sheetsync_replay_full_sync");
    write_cassettes(&dir, &json!({"Ok": null}));

    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
    let report = execute(&ctx, &args(), &template()).unwrap();

    assert_eq!(
        report.outcomes,
        vec![
            RowOutcome::Created { row: 2, issue: 10 },
            RowOutcome::Unchanged { row: 3, issue: 5 },
            RowOutcome::Ignored { row: 4 },
            RowOutcome::Edited { row: 5, issue: 6 },
        ]
    );
    assert_eq!(report.to_string(), "1 created, 1 edited, 1 unchanged, 1 ignored");

    let ranges: Vec<&str> = report.batches.iter().map(|b| b.range.as_str()).collect();
    assert_eq!(ranges, ["Tasks!B2:B5", "Tasks!E2:E5", "Tasks!F2:F5", "Tasks!G2:G5"]);

    assert_eq!(column(&report, "github_issue"), vec![link(10), link(5), "#7".into(), link(6)]);
    assert_eq!(
        column(&report, "github_status"),
        vec!["open".into(), "open".into(), "closed".into(), "open".into()]
    );
    assert_eq!(
        column(&report, "github_assigned"),
        vec![
            "".into(),
            "".into(),
            "@someone".into(),
            "=HYPERLINK(\"https://github.com/octocat\", \"@octocat\")".into(),
        ]
    );
    assert_eq!(
        column(&report, "github_reacts"),
        vec![CellValue::Number(0.0), CellValue::Number(1.0), "3".into(), CellValue::Number(2.0)]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_write_surfaces_as_sheets_error() {
    let dir = std::env::temp_dir().join("sheetsync_replay_failed_write");
    write_cassettes(&dir, &json!({"Err": "quota exceeded"}));

    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
    let err = execute(&ctx, &args(), &template()).unwrap_err();
    assert!(matches!(err, SyncError::Sheets { .. }));
    assert!(err.to_string().contains("quota exceeded"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn template_column_missing_from_header_fails_before_tracker_calls() {
    let dir = std::env::temp_dir().join("sheetsync_replay_missing_column");
    write_cassettes(&dir, &json!({"Ok": null}));
    // No issues cassette: any tracker call would panic.
    std::fs::remove_file(dir.join(cassette_file("issues"))).unwrap();

    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
    let template = PlaceholderTemplate::parse("{{index .Args \"Owner team\"}}").unwrap();
    let err = execute(&ctx, &args(), &template).unwrap_err();
    assert!(matches!(err, SyncError::MissingColumn { ref column } if column == "Owner team"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rerecorded_run_replays_identically() {
    let source = std::env::temp_dir().join("sheetsync_rerecord_source");
    let root = std::env::temp_dir().join("sheetsync_rerecord_output");
    let _ = std::fs::remove_dir_all(&root);
    write_cassettes(&source, &json!({"Ok": null}));

    // Record a run served by the hand-written cassettes.
    let session = RecordingSession::new(&root, "sheet-1").unwrap();
    let replayed = ServiceContext::replaying_from(&CassetteConfig::from_dir(&source)).unwrap();
    let recording = ServiceContext {
        clock: Box::new(RecordingClock::new(replayed.clock, session.clock.clone())),
        issues: Box::new(RecordingIssueTracker::new(replayed.issues, session.issues.clone())),
        sheets: Box::new(RecordingSheetSource::new(replayed.sheets, session.sheets.clone())),
    };
    let first = execute(&recording, &args(), &template()).unwrap();
    drop(recording);
    let recorded_dir = session.finish().unwrap();

    // Replay what was just recorded.
    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&recorded_dir)).unwrap();
    let second = execute(&ctx, &args(), &template()).unwrap();
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(&source);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn dry_run_only_reads() {
    let dir = std::env::temp_dir().join("sheetsync_replay_dry_run");
    std::fs::create_dir_all(&dir).unwrap();

    // Only reads are recorded: any create, edit, or sheet write would exhaust
    // the cassettes and panic.
    let mut clock = CassetteRecorder::new(dir.join(cassette_file("clock")), "clock", "sheet-1");
    clock.record("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"));
    clock.finish().unwrap();
    let mut issues = CassetteRecorder::new(dir.join(cassette_file("issues")), "issues", "sheet-1");
    issues.record(
        "issues",
        "current_user",
        json!(null),
        json!({"Ok": {"login": "sync-bot", "html_url": "https://github.com/sync-bot"}}),
    );
    issues.record(
        "issues",
        "get_issue",
        json!({"number": 5}),
        json!({"Ok": issue(5, "Old task", "second\n\nfooter", &["bug"], json!(null), 1)}),
    );
    issues.record(
        "issues",
        "get_issue",
        json!({"number": 6}),
        json!({"Ok": issue(6, "Drifted (old title)", "fourth\n\nfooter", &[], json!(null), 0)}),
    );
    issues.finish().unwrap();
    let mut sheets = CassetteRecorder::new(dir.join(cassette_file("sheets")), "sheets", "sheet-1");
    sheets.record("sheets", "read_range", json!({"range": RANGE}), json!({"Ok": sheet_values()}));
    sheets.finish().unwrap();

    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&dir)).unwrap();
    let report = execute(&ctx, &args_for(RANGE, true), &template()).unwrap();

    assert_eq!(
        report.outcomes,
        vec![
            RowOutcome::WouldCreate { row: 2 },
            RowOutcome::Unchanged { row: 3, issue: 5 },
            RowOutcome::Ignored { row: 4 },
            RowOutcome::WouldEdit { row: 5, issue: 6 },
        ]
    );
    assert_eq!(column(&report, "github_issue")[0], CellValue::from(""));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn quoted_sheet_name_reaches_write_ranges() {
    let range = "'Q3 plan'!A1:H";
    let source = std::env::temp_dir().join("sheetsync_quoted_sheet_source");
    let root = std::env::temp_dir().join("sheetsync_quoted_sheet_output");
    let _ = std::fs::remove_dir_all(&root);
    write_cassettes_for(&source, range, &json!({"Ok": null}));

    let session = RecordingSession::new(&root, "sheet-1").unwrap();
    let replayed = ServiceContext::replaying_from(&CassetteConfig::from_dir(&source)).unwrap();
    let recording = ServiceContext {
        clock: replayed.clock,
        issues: replayed.issues,
        sheets: Box::new(RecordingSheetSource::new(replayed.sheets, session.sheets.clone())),
    };
    let report = execute(&recording, &args_for(range, false), &template()).unwrap();
    drop(recording);
    let recorded_dir = session.finish().unwrap();

    let expected = ["'Q3 plan'!B2:B5", "'Q3 plan'!E2:E5", "'Q3 plan'!F2:F5", "'Q3 plan'!G2:G5"];
    let ranges: Vec<&str> = report.batches.iter().map(|b| b.range.as_str()).collect();
    assert_eq!(ranges, expected);

    let yaml = std::fs::read_to_string(recorded_dir.join(cassette_file("sheets"))).unwrap();
    let cassette: Cassette = serde_yaml::from_str(&yaml).unwrap();
    let written: Vec<&str> = cassette
        .interactions
        .iter()
        .filter(|i| i.method == "write_range")
        .map(|i| i.input["range"].as_str().unwrap())
        .collect();
    assert_eq!(written, expected);
    assert!(cassette.interactions.iter().all(|i| i.method != "write_range" || i.input["mode"] == "UserEntered"));

    let _ = std::fs::remove_dir_all(&source);
    let _ = std::fs::remove_dir_all(&root);
}
