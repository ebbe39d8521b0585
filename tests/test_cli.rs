use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn starter_plugin() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/starter-plugin")
}

/// Binary isolated from the developer's own config and environment.
fn slash_registry(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("slash-registry"));
    cmd.env("HOME", home.path())
        .env_remove("SLASH_REGISTRY_ROOT")
        .env_remove("SLASH_REGISTRY_MANIFEST")
        .env_remove("SLASH_REGISTRY_LOG");
    cmd
}

#[test]
fn test_help_output() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Load, validate and render slash-command and agent definitions",
        ))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_output() {
    let home = TempDir::new().unwrap();
    let output = slash_registry(&home).arg("--version").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);

    assert!(stdout.starts_with("slash-registry "));
    let version = stdout.strip_prefix("slash-registry ").unwrap().trim();
    assert!(
        version.chars().next().unwrap().is_numeric(),
        "Version should start with a number: {}",
        version
    );
}

#[test]
fn test_slash_invocation_defaults_to_run() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .args(["/api-new", "create", "a", "user", "endpoint"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Create a new API endpoint: create a user endpoint\n",
        ));
}

#[test]
fn test_run_ignores_arguments_without_placeholder() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .args(["run", "/lint", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Run every linter"))
        .stdout(predicate::str::contains("--fix").not());
}

#[test]
fn test_run_agent_json() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .args(["--json", "run", "--agent", "security-auditor", "src/auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"agent\""))
        .stdout(predicate::str::contains("\"model_hint\": \"opus\""));
}

#[test]
fn test_unknown_command_exits_with_usage_code() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .arg("/unknown-cmd")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown command: 'unknown-cmd'"));
}

#[test]
fn test_plugin_root_detected_from_working_directory() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .current_dir(starter_plugin().join("commands/api"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands (3):"))
        .stdout(predicate::str::contains("  [api]"))
        .stdout(predicate::str::contains("/api-new"))
        .stdout(predicate::str::contains("security-auditor"));
}

#[test]
fn test_list_json() {
    let home = TempDir::new().unwrap();
    let output = slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .args(["list", "--kind", "command", "--json"])
        .assert()
        .success();

    let entries: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    let identifiers: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["identifier"].as_str().unwrap())
        .collect();
    assert_eq!(identifiers, vec!["api-new", "component-new", "lint"]);
}

#[test]
fn test_show_command() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .args(["show", "component-new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command component-new"))
        .stdout(predicate::str::contains("Category: ui"))
        .stdout(predicate::str::contains("Takes arguments: yes"));
}

#[test]
fn test_info() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: starter-plugin"))
        .stdout(predicate::str::contains("Version: 1.2.0"))
        .stdout(predicate::str::contains("commands: 3 (categories: api, ui)"));
}

#[test]
fn test_validate_starter_plugin() {
    let home = TempDir::new().unwrap();
    slash_registry(&home)
        .arg("--root")
        .arg(starter_plugin())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Plugin 'starter-plugin' is valid!"));
}

#[test]
fn test_validate_reports_unlisted_file() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    fs::write(
        plugin.path().join("plugin.json"),
        r#"{"name": "broken"}"#,
    )
    .unwrap();
    fs::create_dir_all(plugin.path().join("commands")).unwrap();
    fs::write(
        plugin.path().join("commands/orphan.md"),
        "---\ndescription: Not listed\n---\nOrphan.",
    )
    .unwrap();

    slash_registry(&home)
        .arg("--root")
        .arg(plugin.path())
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ Plugin is invalid!"))
        .stdout(predicate::str::contains("not listed in the manifest"));
}

#[test]
fn test_plugin_config_changes_marker() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    fs::write(
        plugin.path().join("plugin.json"),
        r#"{"name": "bang", "commands": [{"name": "hello", "source": "commands/hello.md"}]}"#,
    )
    .unwrap();
    fs::create_dir_all(plugin.path().join("commands")).unwrap();
    fs::write(
        plugin.path().join("commands/hello.md"),
        "---\ndescription: Say hello\n---\nHello, $ARGUMENTS!",
    )
    .unwrap();
    fs::write(
        plugin.path().join(".slash-registry.toml"),
        "[invocation]\nmarker = \"!\"\n",
    )
    .unwrap();

    slash_registry(&home)
        .arg("--root")
        .arg(plugin.path())
        .args(["run", "!hello", "world"])
        .assert()
        .success()
        .stdout("Hello, world!\n");
}

#[test]
fn test_config_validate_specific_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("broken.toml");
    fs::write(&file, "[logging]\nformat = \"xml\"\n").unwrap();

    slash_registry(&home)
        .args(["config", "validate"])
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ Configuration is invalid!"));
}
