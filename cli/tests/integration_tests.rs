use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

const PROJECT_YAML: &str = r#"
default_target: web
targets:
  web:
    kind: browser
    transform:
      browser_versions: 1
      mobile_support: false
  api:
    kind: node
    flow: true
    transform:
      node_version: "18"
      features: [decorators]
external_commands: [definitely-not-installed]
"#;

fn write_project(dir: &Path) -> PathBuf {
    let path = dir.join(".buildline.yml");
    fs::write(&path, PROJECT_YAML).expect("failed to write project config");
    path
}

fn buildline(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_buildline"))
        .arg("--quiet")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run buildline")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "buildline failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_build_default_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let plan = stdout_json(&buildline(&config, &["build"]));
    assert_eq!(plan["target"], json!("web"));
    assert_eq!(plan["type"], json!("development"));
    assert_eq!(plan["options"]["watch"], json!(false));
    assert_eq!(plan["unknown"], json!({}));
    assert_eq!(plan["instruction"], json!("buildline build web --type development"));
    assert_eq!(
        plan["transform"]["presets"][0][1]["targets"]["browsers"][0],
        json!("last 1 chrome versions")
    );
}

#[test]
fn test_build_with_options_and_unknown_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let plan = stdout_json(&buildline(
        &config,
        &["build", "api", "-t", "production", "--inspect", "--env=staging", "--fast"],
    ));
    assert_eq!(plan["target"], json!("api"));
    assert_eq!(plan["type"], json!("production"));
    assert_eq!(plan["options"]["inspect"], json!(true));
    assert_eq!(plan["unknown"], json!({"env": "staging", "fast": true}));
    assert_eq!(
        plan["instruction"],
        json!("buildline build api --inspect --type production --env staging --fast")
    );
    assert_eq!(
        plan["transform"]["plugins"],
        json!(["transform-decorators-legacy", "transform-class-properties"])
    );
}

#[test]
fn test_build_unknown_flag_before_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let plan = stdout_json(&buildline(&config, &["build", "--something", "else"]));
    assert_eq!(plan["target"], json!("web"));
    assert_eq!(plan["unknown"], json!({"something": "else"}));
}

#[test]
fn test_build_unknown_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["build", "mars"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("unknown target: mars"), "stderr: {stderr}");
}

#[test]
fn test_transform_config_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["transform-config", "api", "--pretty"]);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(stdout.contains('\n'), "expected pretty JSON: {stdout}");

    let value = stdout_json(&output);
    assert_eq!(
        value["presets"],
        json!([["env", {"targets": {"node": "18"}}], ["flow"]])
    );
}

#[test]
fn test_transform_config_rejects_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["transform-config", "--fast"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown option '--fast'"), "stderr: {stderr}");
}

#[test]
fn test_unknown_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["deploy-everything"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command: deploy-everything"), "stderr: {stderr}");
}

#[test]
fn test_command_help_uses_full_description() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["build", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: buildline build [options] [target]"), "stdout: {stdout}");
    assert!(stdout.contains("\n  Without a target"), "stdout: {stdout}");
    assert!(stdout.contains("--type"), "stdout: {stdout}");
    assert!(stdout.contains("Which build type"), "stdout: {stdout}");
}

#[test]
fn test_program_help_without_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: buildline [options] [command]"), "stdout: {stdout}");
    assert!(stdout.contains("Build a target that can be executed or bundled"), "stdout: {stdout}");
    assert!(stdout.contains("transform-config"), "stdout: {stdout}");
}

#[test]
fn test_build_ignores_options_after_end_of_options() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let plan = stdout_json(&buildline(&config, &["build", "api", "--", "--weird", "x"]));
    assert_eq!(plan["target"], json!("api"));
    assert_eq!(plan["unknown"], json!({}));
}

#[test]
fn test_missing_external_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let output = buildline(&config, &["definitely-not-installed", "--flag"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to run buildline-definitely-not-installed"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = buildline(&dir.path().join("missing.yml"), &["build"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"), "stderr: {stderr}");
}
