//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, exit codes and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use avatar_qa_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    SyntheticImageBuilder::portrait(width, height)
        .image()
        .save(&path)
        .unwrap();
    path
}

fn avatar_qa() -> Command {
    Command::cargo_bin("avatar-qa").unwrap()
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    avatar_qa().assert().code(2).stderr(
        predicate::str::contains("No paths specified")
            .or(predicate::str::contains("required"))
            .or(predicate::str::contains("PATHS")),
    );
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    avatar_qa()
        .arg("/nonexistent/path/to/avatar.jpg")
        .arg("--no-faces")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    avatar_qa()
        .arg(temp_dir.path())
        .arg("--no-faces")
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Exit Codes ===

#[test]
fn test_rejected_photo_exits_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write_png(temp_dir.path(), "avatar.png", 640, 640);

    // Without a detector there is never a face
    avatar_qa()
        .arg("--no-faces")
        .arg(path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no_face"))
        .stderr(predicate::str::contains(
            "avatar.png: rejected: No face was detected in the photo",
        ));
}

#[test]
fn test_check_subcommand_matches_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write_png(temp_dir.path(), "avatar.png", 320, 320);

    avatar_qa()
        .arg("check")
        .arg("--no-faces")
        .arg(path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"is_acceptable\":false"));
}

#[test]
fn test_missing_model_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let path = write_png(temp_dir.path(), "avatar.png", 320, 320);

    avatar_qa()
        .current_dir(temp_dir.path())
        .arg("--models-dir")
        .arg(models.path())
        .arg(path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("avatar-qa models fetch"));
}

#[test]
fn test_models_help_explains_supplying_weights() {
    avatar_qa()
        .args(["models", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--face-model")
                .and(predicate::str::contains("models fetch --url")),
        );
}

#[test]
fn test_models_fetch_without_source_points_to_alternatives() {
    let models = tempfile::tempdir().unwrap();

    avatar_qa()
        .args(["models", "fetch", "--models-dir"])
        .arg(models.path())
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("No download source")
                .and(predicate::str::contains("--face-model")),
        );
}

#[test]
fn test_models_fetch_checksum_requires_url() {
    avatar_qa()
        .args(["models", "fetch", "--sha256", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--url"));
}

#[test]
fn test_undecodable_file_skipped() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("broken.png"), b"not really a png").unwrap();

    avatar_qa()
        .arg("--no-faces")
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Skipping")
                .and(predicate::str::contains("unrecognized image format")),
        );
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    avatar_qa()
        .arg("--format")
        .arg("xml")
        .arg("avatar.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

// === Threshold Validation Tests ===

#[test]
fn test_unknown_preset_rejected() {
    avatar_qa()
        .arg("--preset")
        .arg("loose")
        .arg("avatar.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown preset"));
}

#[test]
fn test_brightness_out_of_range_rejected() {
    avatar_qa()
        .arg("--brightness-high")
        .arg("150")
        .arg("avatar.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("150 is not in 0..=100"));
}

#[test]
fn test_even_kernel_size_rejected() {
    avatar_qa()
        .arg("--kernel-size")
        .arg("4")
        .arg("avatar.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("odd number"));
}

#[test]
fn test_inverted_brightness_window_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write_png(temp_dir.path(), "avatar.png", 320, 320);

    avatar_qa()
        .arg("--no-faces")
        .arg("--brightness-low")
        .arg("80")
        .arg("--brightness-high")
        .arg("20")
        .arg(path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid thresholds"));
}

#[test]
fn test_non_numeric_threshold_rejected() {
    avatar_qa()
        .arg("--blur-min")
        .arg("sharp")
        .arg("avatar.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a valid number"));
}

// === Subcommands ===

#[test]
fn test_models_path_uses_override() {
    let models = tempfile::tempdir().unwrap();
    avatar_qa()
        .arg("models")
        .arg("--models-dir")
        .arg(models.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(models.path().to_str().unwrap()));
}

#[test]
fn test_models_list_shows_blazeface_missing() {
    let models = tempfile::tempdir().unwrap();
    avatar_qa()
        .arg("models")
        .arg("list")
        .arg("--models-dir")
        .arg(models.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("✗ blazeface")
                .and(predicate::str::contains("0/1 models installed")),
        );
}

#[test]
fn test_help_lists_flags() {
    avatar_qa().arg("--help").assert().success().stdout(
        predicate::str::contains("--preset")
            .and(predicate::str::contains("--no-faces"))
            .and(predicate::str::contains("--face-angle-max")),
    );
}

#[test]
fn test_version() {
    avatar_qa()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("avatar-qa"));
}
