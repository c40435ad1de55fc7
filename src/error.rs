//! Error types for cz-runner.

use thiserror::Error;

/// Main error type for process runner operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The shell or program could not be launched.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but returned a failing status.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("command `{command}` failed with {}", exit_label(.code))]
    NonZeroExit { command: String, code: Option<i32> },

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// A panel message could not be decoded.
    #[error("invalid panel message: {0}")]
    Message(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl RunnerError {
    /// Exit code carried by a [`RunnerError::NonZeroExit`], if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RunnerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Message(e.to_string())
    }
}

/// Convenience Result type for cz-runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
