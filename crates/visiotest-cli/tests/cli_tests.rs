//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use chrono::Utc;
use predicates::prelude::*;
use tempfile::TempDir;

use visiotest_core::model::{TestDetails, TestResult, TestType, UserProfile};
use visiotest_core::snapshot::SessionReport;

fn visiotest(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("visiotest").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("VISIOTEST_STORE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_session(dir: &Path) -> std::path::PathBuf {
    let profile = UserProfile {
        name: "Carla Dias".into(),
        age: 62,
        ..Default::default()
    };
    let result = TestResult {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "temp".into(),
        test_type: TestType::Acuity,
        score: 8,
        level: 9,
        duration: 14_600,
        date: Utc::now(),
        details: TestDetails {
            max_level: 9,
            correct_answers: 8,
            extra: Default::default(),
        },
    };
    let path = dir.join("session.json");
    SessionReport::new(profile, vec![result])
        .save_json(&path)
        .unwrap();
    path
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created visiotest.toml"));

    assert!(dir.path().join("visiotest.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path()).arg("init").assert().success();

    visiotest(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn report_text() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path());

    visiotest(dir.path())
        .arg("report")
        .arg("--session")
        .arg(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resultados de Carla Dias (62 anos)"))
        .stdout(predicate::str::contains("Acuidade Visual"))
        .stdout(predicate::str::contains("8/10"))
        .stdout(predicate::str::contains("15s"))
        .stdout(predicate::str::contains("Excelente"))
        .stdout(predicate::str::contains("Considerando sua idade (62 anos)"));
}

#[test]
fn report_html_and_export() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path());
    let html = dir.path().join("out").join("page.html");

    visiotest(dir.path())
        .arg("report")
        .arg("--session")
        .arg(&session)
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg(&html)
        .assert()
        .success();
    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("Carla Dias"));
    assert!(page.contains("Aviso Importante"));

    visiotest(dir.path())
        .arg("report")
        .arg("--session")
        .arg(&session)
        .arg("--format")
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"usuario\": \"Carla Dias\""))
        .stdout(predicate::str::contains("\"pontuacao\": \"8/10\""))
        .stdout(predicate::str::contains("\"duracao\": \"15s\""));
}

#[test]
fn report_missing_session() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path())
        .arg("report")
        .arg("--session")
        .arg("no_such_session.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn run_rejects_invalid_registration_then_quits() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path())
        .arg("run")
        .arg("--seed")
        .arg("3")
        .arg("--delay-ms")
        .arg("0")
        .write_stdin("\n\n0\n\nn\n\nDora\n33\nf\nn\n1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("name must not be empty"))
        .stdout(predicate::str::contains("age must be greater than zero"))
        .stdout(predicate::str::contains("Olá, Dora!"))
        .stdout(predicate::str::contains("3. Percepção de Cores"))
        .stdout(predicate::str::contains("Até logo!"));
}

#[test]
fn run_quits_at_end_of_input() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path())
        .arg("run")
        .arg("--delay-ms")
        .arg("0")
        .write_stdin("\nEva\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Até logo!"));
}

#[test]
fn run_with_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    visiotest(dir.path())
        .arg("run")
        .arg("--config")
        .arg("missing.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
