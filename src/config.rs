//! Configuration management for cz-runner.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::execution::{ProcessRunner, RunnerConfig, ShellConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process runner configuration.
    pub runner: RunnerConfig,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log filter (error, warn, info, debug, trace, or an `EnvFilter`
    /// directive).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "cz_runner=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("CZ_RUNNER_CWD") {
            if !dir.is_empty() {
                self.runner.working_dir = Some(dir.into());
            }
        }

        if let Ok(shell) = std::env::var("CZ_RUNNER_SHELL") {
            if !shell.is_empty() {
                self.runner.shell = ShellConfig::for_program(shell);
            }
        }

        if let Ok(level) = std::env::var("CZ_RUNNER_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref dir) = args.cwd {
            self.runner.working_dir = Some(dir.clone());
        }

        if let Some(ref shell) = args.shell {
            self.runner.shell = ShellConfig::for_program(shell.clone());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();

        // CLI wins
        config.apply_args(args);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner.shell.program.trim().is_empty() {
            return Err(ConfigError::EmptyShell);
        }

        if let Some(ref dir) = self.runner.working_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidWorkingDir(dir.display().to_string()));
            }
        }

        Ok(())
    }

    /// Build a process runner from this configuration.
    pub fn to_runner(&self) -> ProcessRunner {
        ProcessRunner::new(self.runner.clone())
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Shell program is empty.
    EmptyShell,
    /// Working directory does not exist or is not a directory.
    InvalidWorkingDir(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::EmptyShell => write!(f, "shell program must not be empty"),
            Self::InvalidWorkingDir(dir) => write!(f, "invalid working directory: {}", dir),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::RunnerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
