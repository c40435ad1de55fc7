//! External process execution.
//!
//! This module provides three ways to run a command:
//! - [`ProcessRunner::exec`]: async, through the shell, resolves with stdout
//!   or fails on a non-zero exit
//! - [`ProcessRunner::spawn_stream`]: fire-and-forget, output delivered to a
//!   [`StreamObserver`] chunk by chunk
//! - [`ProcessRunner::execute`]: blocking, through the shell, returns stderr
//!   if any was written and stdout otherwise, never fails
//!
//! # Example
//!
//! ```no_run
//! use cz_runner::execution::{execute, ProcessRunner};
//!
//! // Blocking one-shot execution
//! let text = execute("git", "status --short");
//! println!("{}", text);
//!
//! # async fn run() -> cz_runner::Result<()> {
//! let runner = ProcessRunner::default();
//! let out = runner.exec("git rev-parse HEAD").await?;
//! println!("HEAD is {}", out.trim());
//! # Ok(())
//! # }
//! ```

mod command;
mod observer;
mod result;
mod runner;

pub use command::{Invocation, ShellConfig};
pub use observer::{CapturingObserver, LoggingObserver, StreamEvent, StreamObserver};
pub use result::{ExecutionResult, OutputChunk, OutputSource};
pub use runner::{exec, execute, spawn, ProcessRunner, RunnerConfig, StreamHandle};
