//! Integration tests for the `aide` CLI.
//!
//! Each test writes a temp config pointing at a temp database, runs `aide`
//! as a subprocess with `-C`, and verifies stdout and exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Path to the built `aide` binary.
fn aide_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("aide");
    path
}

/// A temp config file wired to a database inside the same temp dir.
fn setup(tmp: &Path) -> PathBuf {
    let db = tmp.join("aide.sqlite3");
    let config = tmp.join("aide.conf");
    fs::write(
        &config,
        format!("{{\"db_path\": {:?}}}", db.to_str().unwrap()),
    )
    .unwrap();
    config
}

/// Run `aide -C <config> <args>`, returning (stdout, stderr, success).
fn run_aide(config: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(aide_bin())
        .arg("-C")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run aide");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `aide` expecting success, return stdout.
fn run_aide_ok(config: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_aide(config, args);
    if !success {
        panic!(
            "aide {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Task round trips
// ---------------------------------------------------------------------------

#[test]
fn test_add_list_close_cycle() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    let out = run_aide_ok(&config, &["add", "Write report"]);
    assert!(out.contains("created task 1"));

    let out = run_aide_ok(&config, &["list", "--top"]);
    assert!(out.contains("Write report"));

    let out = run_aide_ok(&config, &["close", "1"]);
    assert!(out.contains("closed 'Write report'"));

    // The top slot drains once the only due task is closed.
    let out = run_aide_ok(&config, &["list", "--top"]);
    assert!(out.contains("no tasks"));
}

#[test]
fn test_list_filters_by_date() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    run_aide_ok(&config, &["add", "today task"]);
    run_aide_ok(&config, &["add", "later task", "-d", "+3 days"]);
    run_aide_ok(&config, &["add", "undated task", "-d", "no"]);

    let out = run_aide_ok(&config, &["list"]);
    assert!(out.contains("today task"));
    assert!(!out.contains("later task"));
    assert!(!out.contains("undated task"));

    let out = run_aide_ok(&config, &["list", "-d", "+3 days"]);
    assert!(out.contains("later task"));
    assert!(!out.contains("today task"));
}

#[test]
fn test_mod_postpones_a_task() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    run_aide_ok(&config, &["add", "slippery"]);
    run_aide_ok(&config, &["mod", "1", "-d", "tomorrow"]);

    let out = run_aide_ok(&config, &["list"]);
    assert!(!out.contains("slippery"));
    let out = run_aide_ok(&config, &["list", "-d", "tomorrow"]);
    assert!(out.contains("slippery"));
}

#[test]
fn test_time_bound_task_gets_priority_boost() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    run_aide_ok(&config, &["add", "standup", "-p", "3", "-t", "09:15"]);

    let out = run_aide_ok(&config, &["list"]);
    assert!(out.contains("103"));
    assert!(out.contains("09:15"));
}

#[test]
fn test_delete_removes_the_task() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    run_aide_ok(&config, &["add", "mistake"]);
    run_aide_ok(&config, &["delete", "1"]);

    let out = run_aide_ok(&config, &["list"]);
    assert!(!out.contains("mistake"));

    let (_stdout, stderr, success) = run_aide(&config, &["delete", "1"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_report_sums_weights() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    run_aide_ok(&config, &["add", "a", "-w", "1.5"]);
    run_aide_ok(&config, &["add", "b", "-w", "2.0"]);
    run_aide_ok(&config, &["close", "1"]);

    let out = run_aide_ok(&config, &["report"]);
    assert!(out.contains("3.5"));
    let out = run_aide_ok(&config, &["report", "--closed"]);
    assert!(out.contains("1.5"));
}

// ---------------------------------------------------------------------------
// Validation happens before the store is touched
// ---------------------------------------------------------------------------

#[test]
fn test_bad_date_is_rejected_without_creating_anything() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    let (_stdout, _stderr, success) = run_aide(&config, &["add", "phantom", "-d", "someday"]);
    assert!(!success);

    let out = run_aide_ok(&config, &["list", "--all"]);
    assert!(!out.contains("phantom"));
}

#[test]
fn test_bad_time_and_period_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    let (_out, _err, success) = run_aide(&config, &["add", "x", "-t", "25:00"]);
    assert!(!success);
    let (_out, _err, success) = run_aide(&config, &["add", "x", "-r", "2 weeks"]);
    assert!(!success);
}

#[test]
fn test_missing_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("nonexistent.conf");

    let (_stdout, stderr, success) = run_aide(&config, &["list"]);
    assert!(!success);
    assert!(stderr.contains("configuration"));
}

// ---------------------------------------------------------------------------
// RPG layer
// ---------------------------------------------------------------------------

#[test]
fn test_rpg_summary_shows_seeded_character() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    let out = run_aide_ok(&config, &["rpg"]);
    assert!(out.contains("level 0"));
    assert!(out.contains("xp 0/50"));
    assert!(out.contains("no open quests"));
}

#[test]
fn test_finish_quest_is_consumed_once() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    // No CLI for adding quests; go through the library like the dashboard
    // wizard would.
    let db = tmp.path().join("aide.sqlite3");
    let store = aide::store::Store::open(&db).unwrap();
    store.add_quest("slay the inbox", 60, 4, 3, None).unwrap();
    drop(store);

    let out = run_aide_ok(&config, &["rpg", "--list-quests"]);
    assert!(out.contains("slay the inbox"));

    let out = run_aide_ok(&config, &["rpg", "--finish-quest", "1"]);
    assert!(out.contains("quest complete"));

    let (_stdout, stderr, success) = run_aide(&config, &["rpg", "--finish-quest", "1"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_claim_award_debits_gold() {
    let tmp = TempDir::new().unwrap();
    let config = setup(tmp.path());

    let db = tmp.path().join("aide.sqlite3");
    let store = aide::store::Store::open(&db).unwrap();
    store.add_award("ice cream", 30).unwrap();
    drop(store);

    let out = run_aide_ok(&config, &["rpg", "--claim-award", "1"]);
    assert!(out.contains("ice cream"));
    assert!(out.contains("-30 left"));
}
