use std::io::Write;
use std::process::{Command, Output, Stdio};

use compass_harness::session::Answer;
use tempfile::tempdir;

fn compass() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_compass"));
    for key in [
        "OPENROUTER_API_KEY",
        "COMPASS_MODEL",
        "COMPASS_SAMPLE_SIZE",
        "COMPASS_ANALYSIS_TIMEOUT_SECONDS",
        "COMPASS_BANK_PATH",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn run_with_stdin(cmd: &mut Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn questions_lists_builtin_bank_as_json() {
    let output = compass().args(["questions", "--json"]).output().unwrap();
    assert!(output.status.success());

    let questions: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(questions.len(), 24);
    assert!(questions.iter().all(|q| q["options"].as_array().unwrap().len() == 4));
}

#[test]
fn sample_is_reproducible_with_seed() {
    let run = || {
        compass()
            .args(["sample", "--seed", "17", "--size", "6"])
            .output()
            .unwrap()
    };
    let a = run();
    let b = run();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);

    let questions: Vec<serde_json::Value> = serde_json::from_slice(&a.stdout).unwrap();
    assert_eq!(questions.len(), 6);
}

#[test]
fn oversized_sample_is_rejected() {
    let output = compass()
        .args(["sample", "--size", "500"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("500"), "{stderr}");
}

#[test]
fn take_offline_then_score_answers_file() {
    let dir = tempdir().unwrap();
    let answers_path = dir.path().join("answers.json");

    // One invalid entry first; the prompt repeats.
    let input = format!("x\n{}", "1\n".repeat(15));
    let output = run_with_stdin(
        compass()
            .args(["take", "--offline", "--seed", "3", "--out"])
            .arg(&answers_path),
        &input,
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[15/15]"));
    assert!(stdout.contains("Scores"));

    let answers: Vec<Answer> =
        serde_json::from_str(&std::fs::read_to_string(&answers_path).unwrap()).unwrap();
    assert_eq!(answers.len(), 15);

    let output = compass()
        .args(["score", "--answers"])
        .arg(&answers_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let breakdown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected = compass_harness::scoring::score(&answers);
    assert_eq!(
        breakdown["normalized"]["economy"].as_u64(),
        Some(u64::from(expected.economy))
    );
}

#[test]
fn take_fails_when_input_ends_early() {
    let output = run_with_stdin(compass().args(["take", "--offline"]), "1\n2\n");
    assert!(!output.status.success());
}

#[test]
fn analyze_without_credentials_fails_cleanly() {
    let dir = tempdir().unwrap();
    let answers_path = dir.path().join("answers.json");
    std::fs::write(&answers_path, "[]").unwrap();

    let output = compass()
        .args(["analyze", "--answers"])
        .arg(&answers_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENROUTER_API_KEY"), "{stderr}");
}

#[test]
fn config_file_sets_sample_size() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("compass.toml");
    std::fs::write(&config, "sample_size = 4\n").unwrap();

    let output = compass()
        .args(["sample", "--seed", "1", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let questions: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(questions.len(), 4);
}
