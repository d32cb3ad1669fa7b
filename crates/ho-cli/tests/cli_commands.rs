//! End-to-end tests for the `holdout` binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn holdout() -> Command {
    Command::cargo_bin("holdout").unwrap()
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_layout_summary() {
    holdout()
        .args(["generate", "--seed", "7"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Layout")
                .and(predicate::str::contains("Walls"))
                .and(predicate::str::contains("Containers"))
                .and(predicate::str::contains("seed=7")),
        );
}

#[test]
fn generate_json_is_deterministic() {
    let run = || {
        holdout()
            .args(["generate", "--seed", "11", "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let first = run();
    assert_eq!(first, run());

    let json: serde_json::Value = serde_json::from_slice(&first).expect("valid JSON output");
    assert_eq!(json["width"], 2400);
    assert_eq!(json["containers"].as_array().unwrap().len(), 3);
    assert!(json["door"].is_object());
}

#[test]
fn generate_to_file() {
    let dir = TempDir::new().unwrap();
    let out_file = dir.path().join("world.json");
    holdout()
        .args(["generate", "-o", out_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote world to"));

    let content = fs::read_to_string(&out_file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).expect("valid JSON in file");
    assert!(!json["walls"].as_array().unwrap().is_empty());
}

#[test]
fn generate_rejects_tiny_world() {
    holdout()
        .args(["generate", "--width", "10", "--height", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:").and(predicate::str::contains("smaller than one grid cell")));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_player_table() {
    holdout()
        .args(["simulate", "--ticks", "30", "--players", "2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Player Status")
                .and(predicate::str::contains("30 ticks"))
                .and(predicate::str::contains("2 players")),
        );
}

#[test]
fn simulate_logs_run_summary_when_enabled() {
    holdout()
        .env("RUST_LOG", "info")
        .args(["simulate", "--ticks", "3", "--players", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("running simulation"));
}

#[test]
fn simulate_is_quiet_by_default() {
    holdout()
        .env_remove("RUST_LOG")
        .args(["simulate", "--ticks", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("running simulation").not());
}

#[test]
fn simulate_json_snapshot() {
    let output = holdout()
        .args(["simulate", "--ticks", "5", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON output");
    assert_eq!(json["tick"], 5);
    assert_eq!(json["players"].as_object().unwrap().len(), 1);
}

#[test]
fn simulate_runs_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("script.jsonl");
    fs::write(
        &script,
        r#"# turn to face up, then try a craft the player cannot afford
{"tick": 0, "player": 0, "action": "move", "direction": "left", "facingX": 0, "facingY": -1}
{"tick": 1, "player": 0, "action": "craft_item", "item": "bow"}
{"tick": 2, "player": 0, "action": "dance"}
"#,
    )
    .unwrap();

    let output = holdout()
        .args([
            "simulate",
            "--ticks",
            "3",
            "--json",
            "--script",
            script.to_str().unwrap(),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON output");
    let players = json["players"].as_object().unwrap();
    let player = players.values().next().unwrap();
    assert_eq!(player["facing_y"], -1.0);
    assert!(player["inventory"].as_object().unwrap().is_empty());
}

#[test]
fn simulate_rejects_bad_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("bad.jsonl");
    fs::write(&script, "{\"player\": 0, \"action\": \"move\"}\n").unwrap();

    holdout()
        .args(["simulate", "--script", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing \"tick\""));
}

#[test]
fn simulate_rejects_unknown_player_in_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("ghost.jsonl");
    fs::write(
        &script,
        "{\"tick\": 0, \"player\": 3, \"action\": \"cancel_looting\"}\n",
    )
    .unwrap();

    holdout()
        .args(["simulate", "--script", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only 1 joined"));
}
