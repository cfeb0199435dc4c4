//! End-to-end checks of the `termbase` binary.

use std::process::{Command, Output};
use tempfile::TempDir;

fn termbase(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termbase"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("share"))
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run termbase")
}

#[test]
fn test_logs_go_to_stderr() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("termbase.db");
    let data_dir = home.path().join("data");

    let output = termbase(
        &home,
        &[
            "--db",
            db.to_str().unwrap(),
            "migrate",
            "--data-dir",
            data_dir.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.starts_with("Migrating glossaries completed [0/0]\n"));
    assert!(!stdout.contains("INFO"));
    assert!(stderr.contains("Applying migration"));
    assert!(stderr.contains("Created 0 components"));
}

#[test]
fn test_status_json_is_not_mixed_with_logs() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("termbase.db");
    let db_arg = db.to_str().unwrap();
    assert!(termbase(&home, &["--db", db_arg, "migrate"]).status.success());

    let output = termbase(&home, &["--db", db_arg, "status", "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["migrated"], true);
    assert_eq!(report["projects"], 0);
}
