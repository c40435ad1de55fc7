//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use cz_runner::cli::{parse_args_from, Args, Mode};
use cz_runner::config::{Config, ConfigError};
use cz_runner::ShellConfig;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("cz-runner")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-C",
        "/work",
        "-s",
        "bash",
        "-l",
        "debug",
        "spawn",
        "cz",
        "feature",
        "--dry-run",
    ]))
    .unwrap();

    assert_eq!(result.cwd, Some(PathBuf::from("/work")));
    assert_eq!(result.shell.as_deref(), Some("bash"));
    assert_eq!(result.log_level.as_deref(), Some("debug"));
    assert_eq!(result.mode, Some(Mode::Spawn));
    assert_eq!(result.command.as_deref(), Some("cz"));
    assert_eq!(result.args_line(), "feature --dry-run");
}

#[test]
fn test_cli_long_options() {
    let result = parse_args_from(args(&[
        "--cwd",
        "/work",
        "--shell",
        "zsh",
        "--config",
        "/etc/cz-runner.json",
        "exec",
        "true",
    ]))
    .unwrap();

    assert_eq!(result.cwd, Some(PathBuf::from("/work")));
    assert_eq!(result.shell.as_deref(), Some("zsh"));
    assert_eq!(result.config, Some(PathBuf::from("/etc/cz-runner.json")));
    assert!(result.args.is_empty());
}

#[test]
fn test_cli_unknown_option() {
    let result = parse_args_from(args(&["--port", "3000", "sync", "ls"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_priority_cli_over_file() {
    let file_dir = tempfile::tempdir().unwrap();
    let cli_dir = tempfile::tempdir().unwrap();

    let json = format!(
        r#"{{
            "runner": {{
                "working_dir": {:?},
                "shell": {{ "program": "sh", "flag": "-c" }}
            }}
        }}"#,
        file_dir.path().display().to_string()
    );

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        cwd: Some(cli_dir.path().to_path_buf()),
        shell: Some("bash".to_string()),
        log_level: Some("trace".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // CLI values should win
    assert_eq!(config.runner.working_dir.as_deref(), Some(cli_dir.path()));
    assert_eq!(config.runner.shell, ShellConfig::new("bash", "-c"));
    assert_eq!(config.log_filter(), "trace");
}

#[test]
fn test_config_missing_file() {
    let args = Args {
        config: Some(PathBuf::from("/definitely/not/a/config.json")),
        ..Args::default()
    };

    let err = Config::load(&args).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_invalid_working_dir() {
    let args = Args {
        cwd: Some(PathBuf::from("/definitely/not/a/dir")),
        ..Args::default()
    };

    let err = Config::load(&args).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidWorkingDir(_)));
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.runner, loaded.runner);
    assert_eq!(original.logging.level, loaded.logging.level);
}

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"runner": {"shell": {"program": "bash"}}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.runner.shell.program, "bash");
    assert!(config.runner.working_dir.is_none()); // Default
}
