// End-to-end tests for the tagcalc binary.
//
// Every test runs against its own --data-dir so the user's config is never
// touched. Run with: cargo test -p tagcalc-cli --test cli_tests

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn tagcalc(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tagcalc"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd.env_remove("TAGCALC_LOG");
    cmd.env_remove("TAGCALC_DATA_DIR");
    cmd
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    tagcalc(data_dir).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn run_repl(data_dir: &Path, script: &str) -> Output {
    let mut child = tagcalc(data_dir)
        .arg("repl")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn eval_substitutes_variables() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["eval", "Base salary", "*", "(", "1", "+", "0.05", ")"]);
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(stdout(&out).trim(), "$183,750.00");
}

#[test]
fn eval_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["eval", "Nonexistent", "*", "2"]);
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(stdout(&out).trim(), "Error");

    let out = run(dir.path(), &["eval", "1", "/", "0"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn examples_list_and_run() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["examples"]);
    assert_eq!(stdout(&out).lines().count(), 3);

    let out = run(dir.path(), &["examples", "3"]);
    assert!(stdout(&out).contains("$237,500.00"));

    let out = run(dir.path(), &["examples", "9"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn suggest_uses_catalog_order() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["suggest"]);
    let ids: Vec<String> = stdout(&out)
        .lines()
        .map(|l| l.split_whitespace().next().unwrap_or("").to_string())
        .collect();
    assert_eq!(ids, ["v1", "v2", "v3", "v4", "v5", "v6", "v7", "f1", "f2", "f3"]);

    let out = run(dir.path(), &["suggest", "SUM"]);
    assert!(stdout(&out).starts_with("f1"));
}

#[test]
fn set_var_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["set-var", "future-dilution", "25%"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("25%"));

    let out = run(dir.path(), &["vars", "--model", "equity-analyzer"]);
    let text = stdout(&out);
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("25%"));
    assert!(dir.path().join("formula-storage.json").exists());

    let out = run(dir.path(), &["set-var", "future-dilution", "lots"]);
    assert_eq!(out.status.code(), Some(2));
    let out = run(dir.path(), &["set-var", "nope", "1"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn models_cannot_drop_below_one() {
    let dir = TempDir::new().unwrap();
    assert!(run(dir.path(), &["models", "remove", "equity-analyzer"]).status.success());
    assert!(run(dir.path(), &["models", "remove", "comp-calc"]).status.success());

    let out = run(dir.path(), &["models", "remove", "performance-metrics"]);
    assert_eq!(out.status.code(), Some(5));

    let out = run(dir.path(), &["models"]);
    let text = stdout(&out);
    assert_eq!(text.lines().count(), 1);
    // Removing the active model handed activation to the first remaining one
    assert!(text.starts_with("* performance-metrics"), "{}", text);
}

#[test]
fn repl_saves_are_persisted() {
    let dir = TempDir::new().unwrap();
    let out = run_repl(dir.path(), "tag Base salary\ntype +1\nsave Raise\ntype 000\nquit\n");
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("saved Raise"));

    let out = run(dir.path(), &["saved"]);
    let text = stdout(&out);
    assert!(text.contains("Raise"), "{}", text);
    assert!(text.contains("$175,001.00"), "{}", text);

    let id = text.split_whitespace().next().unwrap().to_string();
    let out = run(dir.path(), &["saved", "show", &id]);
    assert!(stdout(&out).contains("[Base salary]+1|"));

    assert!(run(dir.path(), &["saved", "delete", &id]).status.success());
    assert!(stdout(&run(dir.path(), &["saved"])).trim().is_empty());
}

#[test]
fn custom_namespace_from_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{ "storage.namespace": "team-a", "suggestions.limit": 2 }"#,
    )
    .unwrap();

    let out = run(dir.path(), &["suggest"]);
    assert_eq!(stdout(&out).lines().count(), 2);

    run(dir.path(), &["models", "activate", "equity-analyzer"]);
    assert!(dir.path().join("team-a.json").exists());
    assert!(!dir.path().join("formula-storage.json").exists());
}
