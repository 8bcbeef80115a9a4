//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Every test
//! gets its own data directory through MENTORAI_HOME.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against a data directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "mentorai-cli", "--"])
        .args(args)
        .env("MENTORAI_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_intent_prints_parsed_fields() {
    let home = tempfile::tempdir().unwrap();
    let out = json(&run_ok(home.path(), &["intent", "tengo 20 min, solo cardio"]));
    assert_eq!(out["timeBudget"], 20);
    assert_eq!(out["focusTag"], "cardio");
    assert!(out.get("muteMins").is_none());
}

#[test]
fn test_intent_english_locale() {
    let home = tempfile::tempdir().unwrap();
    let out = json(&run_ok(home.path(), &["intent", "--locale", "en", "mute 45"]));
    assert_eq!(out["muteMins"], 45);
}

#[test]
fn test_task_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["task", "add", "Escribir informe", "--duration", "40"]);
    assert!(out.contains("Task added: Escribir informe"));

    let tasks = json(&run_ok(home.path(), &["task", "list", "--json"]));
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["duration"], 40);
    assert_eq!(tasks[0]["status"], "todo");
}

#[test]
fn test_task_done_and_undo() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["task", "add", "Leer", "--duration", "15"]);
    let tasks = json(&run_ok(home.path(), &["task", "list", "--json"]));
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    assert!(run_ok(home.path(), &["task", "done", &id]).contains("Done: Leer"));
    let (code, _, stderr) = run_cli(home.path(), &["task", "done", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    assert!(run_ok(home.path(), &["task", "undo"]).contains("Restored: Leer"));
    let tasks = json(&run_ok(home.path(), &["task", "list", "--json"]));
    assert_eq!(tasks[0]["status"], "todo");
}

#[test]
fn test_task_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["task", "skip", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Task not found"));
}

#[test]
fn test_plan_orders_and_slots() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["task", "add", "Largo", "--duration", "30", "--energy", "high"]);
    run_ok(home.path(), &["task", "add", "Corto", "--duration", "10", "--priority", "5", "--energy", "low"]);

    let plan = json(&run_ok(home.path(), &["plan", "--now", "08:00", "--json"]));
    let order = plan["order"].as_array().unwrap();
    assert_eq!(order.len(), 2);

    let tasks = json(&run_ok(home.path(), &["task", "list", "--json"]));
    assert_eq!(tasks[0]["title"], "Corto");
    assert_eq!(plan["slots"][tasks[0]["id"].as_str().unwrap()][0], "09:00");
}

#[test]
fn test_plan_with_budget_limits_slots() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["task", "add", "A", "--duration", "15"]);
    run_ok(home.path(), &["task", "add", "B", "--duration", "15"]);

    let plan = json(&run_ok(
        home.path(),
        &["plan", "--now", "08:00", "--budget", "15", "--json", "--dry-run"],
    ));
    assert_eq!(plan["order"].as_array().unwrap().len(), 2);
    assert_eq!(plan["slots"].as_object().unwrap().len(), 1);
}

#[test]
fn test_chat_replans() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["task", "add", "Correr", "--tags", "cardio", "--duration", "30"]);
    run_ok(home.path(), &["task", "add", "Correo", "--duration", "5"]);

    let reply = json(&run_ok(
        home.path(),
        &["chat", "solo cardio", "--now", "08:00", "--json"],
    ));
    assert_eq!(reply["intent"]["focusTag"], "cardio");
    assert!(reply["plan"]["order"].is_array());

    let tasks = json(&run_ok(home.path(), &["task", "list", "--json"]));
    assert_eq!(tasks[0]["title"], "Correr");
}

#[test]
fn test_profile_set_persona() {
    let home = tempfile::tempdir().unwrap();
    assert!(run_ok(home.path(), &["profile", "show"]).contains("No profile yet"));

    run_ok(home.path(), &["profile", "set-persona", "estudio"]);
    let profile = json(&run_ok(home.path(), &["profile", "show", "--json"]));
    assert_eq!(profile["persona"], "estudio");
    assert_eq!(profile["wake"], "07:30");
    assert_eq!(profile["energyByHour"].as_array().unwrap().len(), 24);

    let (code, _, stderr) = run_cli(home.path(), &["profile", "set-persona", "pirata"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown persona"));
}

#[test]
fn test_config_get_set_reset() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "intent.locale"]).trim(), "es");

    run_ok(home.path(), &["config", "set", "planner.day_start", "08:00"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "planner.day_start"]).trim(), "08:00");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "planner.day_start", "late"]);
    assert_eq!(code, 1);

    run_ok(home.path(), &["config", "reset"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "planner.day_start"]).trim(), "09:00");
}
