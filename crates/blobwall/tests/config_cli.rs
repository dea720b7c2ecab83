use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn blobwall() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_blobwall"));
    command.env_remove("BLOBWALL_SETTINGS");
    command
}

#[test]
fn print_config_reports_settings_file_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blobwall.toml");
    fs::write(
        &path,
        r##"
fps = 30.0
front_color = "#336699"
reduced_motion = true

[window]
width = 640
height = 360
"##,
    )
    .unwrap();

    let output = blobwall()
        .arg("--settings")
        .arg(&path)
        .arg("--print-config")
        .output()
        .expect("failed to run blobwall --print-config");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 640"), "stdout: {stdout}");
    assert!(stdout.contains("height = 360"), "stdout: {stdout}");
    assert!(stdout.contains("fps = 30.0"), "stdout: {stdout}");
    assert!(stdout.contains("front_color = \"#336699\""), "stdout: {stdout}");
    assert!(stdout.contains("reduced_motion = true"), "stdout: {stdout}");
}

#[test]
fn cli_flags_override_the_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blobwall.toml");
    fs::write(
        &path,
        r##"
front_color = "#336699"

[window]
width = 640
height = 360
"##,
    )
    .unwrap();

    let output = blobwall()
        .arg("--settings")
        .arg(&path)
        .args(["--size", "800x600", "--front-color", "#ffffff", "--print-config"])
        .output()
        .expect("failed to run blobwall --print-config");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 800"), "stdout: {stdout}");
    assert!(stdout.contains("height = 600"), "stdout: {stdout}");
    assert!(stdout.contains("front_color = \"#ffffff\""), "stdout: {stdout}");
}

#[test]
fn defaults_apply_without_a_settings_file() {
    let output = blobwall()
        .arg("--print-config")
        .output()
        .expect("failed to run blobwall --print-config");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("width = 1280"), "stdout: {stdout}");
    assert!(stdout.contains("height = 720"), "stdout: {stdout}");
    assert!(stdout.contains("antialias = \"auto\""), "stdout: {stdout}");
    assert!(stdout.contains("background_color = \"#fafafa\""), "stdout: {stdout}");
    assert!(stdout.contains("reduced_motion = false"), "stdout: {stdout}");
    assert!(!stdout.contains("fps ="), "stdout: {stdout}");
}

#[test]
fn malformed_settings_files_fail_loudly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blobwall.toml");
    fs::write(&path, "front_color = \"#12\"").unwrap();

    let output = blobwall()
        .arg("--settings")
        .arg(&path)
        .arg("--print-config")
        .output()
        .expect("failed to run blobwall --print-config");
    assert!(!output.status.success());
}
