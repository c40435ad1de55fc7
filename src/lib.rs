//! # cz-runner
//!
//! Process runner behind the Commitizen Code commit panel.
//!
//! This crate runs external commands on behalf of a UI host and hands their
//! output back as plain text or as a stream of observer callbacks. The host
//! binding itself is kept thin: [`panel::CommitPanel`] takes its workspace
//! folders and runner as explicit configuration.
//!
//! ## Features
//!
//! - **Async exec**: run a command line through the shell, get stdout or an error
//! - **Streamed spawn**: fire-and-forget, output delivered to a [`StreamObserver`]
//! - **Blocking exec**: run and return whatever text was produced, never fails
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cz_runner::{CapturingObserver, ProcessRunner, RunnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> cz_runner::Result<()> {
//!     cz_runner::logging::try_init().ok();
//!
//!     let runner = ProcessRunner::new(RunnerConfig::default().working_dir("."));
//!
//!     let head = runner.exec("git rev-parse --short HEAD").await?;
//!     println!("HEAD {}", head.trim());
//!
//!     let observer = CapturingObserver::new();
//!     let code = runner
//!         .spawn_stream("git", "status", Arc::new(observer.clone()))
//!         .wait()
//!         .await;
//!     println!("exit {:?}: {}", code, observer.stdout());
//!
//!     println!("{}", runner.execute("cz", "--version"));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod panel;

// Re-export commonly used types
pub use error::{Result, RunnerError};
pub use execution::{
    CapturingObserver, ExecutionResult, Invocation, LoggingObserver, ProcessRunner, RunnerConfig,
    ShellConfig, StreamHandle, StreamObserver,
};
pub use panel::{CommitKind, CommitPanel, Notification, PanelConfig, PanelMessage};
