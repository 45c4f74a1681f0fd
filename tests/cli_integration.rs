//! Integration tests for commands that need no model files.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated from the user's configuration file.
fn animalai(config_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("animalai"));
    cmd.env_remove("RUST_LOG")
        .env_remove("ANIMALAI_MODE")
        .env_remove("ANIMALAI_OUTPUT_DIR")
        .env("ANIMALAI_CONFIG", config_dir.join("config.toml"));
    cmd
}

#[test]
fn test_no_input_shows_upload_prompt() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Please provide an image first."));
}

#[test]
fn test_no_input_json_is_warning_envelope() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["--output-mode", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"error\""))
        .stdout(predicate::str::contains("\"code\":\"no_input\""));
}

#[test]
fn test_about_project_page() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["about", "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("About AnimalAI"))
        .stdout(predicate::str::contains("Harimau (Tiger)"))
        .stdout(predicate::str::contains("Macan Tutul (Leopard)"));
}

#[test]
fn test_about_author_page() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["about", "author"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Universitas Syiah Kuala"));
}

#[test]
fn test_species_single_entry() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["species", "cheetah"])
        .assert()
        .success()
        .stdout(predicate::str::contains("112 km/h"))
        .stdout(predicate::str::contains("Singa").not());
}

#[test]
fn test_species_json() {
    let dir = TempDir::new().expect("temp dir");

    let output = animalai(dir.path())
        .args(["species", "--output-mode", "json"])
        .output()
        .expect("run animalai");
    assert!(output.status.success());

    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON envelope");
    assert_eq!(envelope["event"], "result");
    assert_eq!(envelope["payload"]["result_type"], "species");
    assert_eq!(
        envelope["payload"]["species"]
            .as_array()
            .map(Vec::len),
        Some(4)
    );
}

#[test]
fn test_species_unknown_label_fails() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["species", "jaguar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in knowledge base"));
}

#[test]
fn test_unsupported_type_rejected_before_models_load() {
    let dir = TempDir::new().expect("temp dir");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not an image").expect("write notes");

    // Default model paths do not exist here, so reaching the loader would
    // report a missing model instead.
    animalai(dir.path())
        .current_dir(dir.path())
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported image type"))
        .stderr(predicate::str::contains("model file does not exist").not());
}

#[test]
fn test_disguised_file_rejected_in_json() {
    let dir = TempDir::new().expect("temp dir");
    let fake = dir.path().join("tiger.jpg");
    std::fs::write(&fake, "plain text").expect("write fake image");

    animalai(dir.path())
        .current_dir(dir.path())
        .args(["--output-mode", "json"])
        .arg(&fake)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\":\"unsupported_image_type\""))
        .stdout(predicate::str::contains("\"status\":\"failed\""));
}

#[test]
fn test_missing_models_is_fatal() {
    let dir = TempDir::new().expect("temp dir");
    let image_path = dir.path().join("lion.png");
    image::RgbImage::new(4, 4)
        .save_with_format(&image_path, image::ImageFormat::Png)
        .expect("write png");

    animalai(dir.path())
        .current_dir(dir.path())
        .arg(&image_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_missing_models_is_fatal_event_in_json() {
    let dir = TempDir::new().expect("temp dir");
    let image_path = dir.path().join("lion.png");
    image::RgbImage::new(4, 4)
        .save_with_format(&image_path, image::ImageFormat::Png)
        .expect("write png");

    let output = animalai(dir.path())
        .current_dir(dir.path())
        .args(["--output-mode", "json"])
        .arg(&image_path)
        .output()
        .expect("run animalai");
    assert!(!output.status.success());

    let events: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect();
    let kinds: Vec<&str> = events
        .iter()
        .filter_map(|e| e["event"].as_str())
        .collect();
    assert_eq!(kinds, vec!["pipeline_started", "error", "pipeline_completed"]);
    assert_eq!(events[1]["payload"]["severity"], "fatal");
    assert_eq!(events[1]["payload"]["code"], "model_not_found");
    assert_eq!(events[2]["payload"]["status"], "failed");
}

#[test]
fn test_fail_fast_stops_at_leading_unsupported_file() {
    let dir = TempDir::new().expect("temp dir");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not an image").expect("write notes");
    let image_path = dir.path().join("lion.png");
    image::RgbImage::new(4, 4)
        .save_with_format(&image_path, image::ImageFormat::Png)
        .expect("write png");

    // The run ends at notes.txt, so the missing models are never looked at.
    animalai(dir.path())
        .current_dir(dir.path())
        .arg("--fail-fast")
        .arg(&notes)
        .arg(&image_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported image type"))
        .stderr(predicate::str::contains("model file does not exist").not());
}

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().expect("temp dir");
    let expected = dir.path().join("config.toml");

    animalai(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", expected.display())));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(dir.path().join("config.toml").exists());

    animalai(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[detection]"))
        .stdout(predicate::str::contains("klasifikasi.onnx"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[detection]\nconfidence = 1.5\n",
    )
    .expect("write config");

    animalai(dir.path())
        .args(["about"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("detection.confidence"));
}

#[test]
fn test_models_check_reports_missing() {
    let dir = TempDir::new().expect("temp dir");

    animalai(dir.path())
        .current_dir(dir.path())
        .args(["models", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing"))
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_models_check_json_reports_fatal() {
    let dir = TempDir::new().expect("temp dir");

    let output = animalai(dir.path())
        .current_dir(dir.path())
        .args(["models", "check", "--output-mode", "json"])
        .output()
        .expect("run animalai");
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["payload"]["result_type"], "model_check");
    assert_eq!(events[0]["payload"]["loaded"], false);
    assert_eq!(events[0]["payload"]["models"][0]["exists"], false);
    assert_eq!(events[1]["payload"]["severity"], "fatal");
    assert_eq!(events[1]["payload"]["code"], "model_not_found");
}
