//! Process runner: async exec, streamed spawn and blocking exec.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::command::{Invocation, ShellConfig};
use super::observer::{LoggingObserver, StreamObserver};
use super::result::{ExecutionResult, OutputChunk, OutputSource};
use crate::error::RunnerError;
use crate::Result;

/// Default buffer size for reading streamed output.
const READ_BUFFER_SIZE: usize = 4096;

/// Settings shared by every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Working directory for child processes.
    ///
    /// `None` inherits the caller's directory for `exec`/`execute` and uses
    /// `.` for `spawn_stream`.
    pub working_dir: Option<PathBuf>,
    /// Shell used for command lines.
    pub shell: ShellConfig,
}

impl RunnerConfig {
    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the shell.
    pub fn shell(mut self, shell: ShellConfig) -> Self {
        self.shell = shell;
        self
    }
}

/// Runs external commands.
///
/// The runner holds only immutable configuration; every call owns its own
/// child process, so a single runner can be shared freely between tasks.
/// None of the operations offer a timeout or cancellation.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    /// Create a runner with the given config.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a command line through the shell and return its stdout.
    ///
    /// The calling task is suspended until the child exits. Fails with
    /// [`RunnerError::Spawn`] if the shell cannot be started and with
    /// [`RunnerError::NonZeroExit`] if the command exits unsuccessfully; no
    /// output is attached to either error.
    pub async fn exec(&self, command_line: &str) -> Result<String> {
        debug!(cmd = %command_line, "exec");

        let mut cmd = self.config.shell.tokio_command(command_line);
        cmd.stdin(Stdio::null());
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| RunnerError::Spawn {
            command: command_line.to_string(),
            source,
        })?;

        if !output.status.success() {
            debug!(
                cmd = %command_line,
                exit_code = ?output.status.code(),
                "exec failed"
            );
            return Err(RunnerError::NonZeroExit {
                command: command_line.to_string(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Start `command` with `args_line` as its single argument and stream its
    /// output to `observer`.
    ///
    /// The program is started directly, without a shell. `args_line` is
    /// always passed, so an empty line reaches the program as `""`; use
    /// [`Self::spawn_invocation`] to start a program with no arguments.
    /// Returns immediately; the process is driven by background tasks. Spawn
    /// failures are logged and reported as `on_exit(None)`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn_stream(
        &self,
        command: &str,
        args_line: &str,
        observer: Arc<dyn StreamObserver>,
    ) -> StreamHandle {
        let invocation = Invocation::new(command).arg(args_line);
        self.spawn_invocation(&invocation, observer)
    }

    /// Start an invocation with discrete arguments and stream its output to
    /// `observer`. See [`Self::spawn_stream`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn_invocation(
        &self,
        invocation: &Invocation,
        observer: Arc<dyn StreamObserver>,
    ) -> StreamHandle {
        let dir = self.stream_dir().to_path_buf();

        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(
                    program = %invocation.program,
                    dir = %dir.display(),
                    error = %e,
                    "failed to spawn process"
                );
                let task = tokio::spawn(async move {
                    observer.on_exit(None);
                    None
                });
                return StreamHandle { pid: None, task };
            }
        };

        let pid = child.id();
        debug!(program = %invocation.program, pid = ?pid, "process spawned");

        let stdout = child
            .stdout
            .take()
            .map(|out| tokio::spawn(pump(out, OutputSource::Stdout, observer.clone())));
        let stderr = child
            .stderr
            .take()
            .map(|err| tokio::spawn(pump(err, OutputSource::Stderr, observer.clone())));

        let program = invocation.program.clone();
        let task = tokio::spawn(async move {
            let status = child.wait().await;

            // Readers end at EOF, which the exit of the child guarantees unless
            // it left descendants holding the pipes open.
            for reader in [stdout, stderr].into_iter().flatten() {
                if let Err(e) = reader.await {
                    error!(program = %program, "output reader task panicked: {}", e);
                }
            }

            let code = match status {
                Ok(status) => status.code(),
                Err(e) => {
                    error!(program = %program, error = %e, "failed to wait for process");
                    None
                }
            };

            debug!(program = %program, exit_code = ?code, "process closed");
            observer.on_exit(code);
            code
        });

        StreamHandle { pid, task }
    }

    /// Run `command` and `args` through the shell, blocking until it exits.
    ///
    /// The command line is `"{command} {args}"` with no escaping. Returns
    /// stderr text if any was written, otherwise stdout text. Never fails:
    /// exit status is discarded and a spawn failure yields empty text. Use
    /// [`Self::capture`] when the exit status matters.
    pub fn execute(&self, command: &str, args: &str) -> String {
        let command_line = format!("{} {}", command, args);

        match self.capture(&command_line) {
            Ok(result) => {
                if result.failed() {
                    debug!(
                        cmd = %command_line,
                        exit_code = ?result.exit_code,
                        "command failed; returning captured text"
                    );
                }
                result.into_preferred_text()
            }
            Err(e) => {
                warn!(cmd = %command_line, error = %e, "command could not be run");
                String::new()
            }
        }
    }

    /// Run a command line through the shell, blocking until it exits, and
    /// return everything it produced along with its exit status.
    ///
    /// A non-zero exit is not an error here; only a spawn failure is.
    pub fn capture(&self, command_line: &str) -> Result<ExecutionResult> {
        let start = Instant::now();

        let mut cmd = self.config.shell.std_command(command_line);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| RunnerError::Spawn {
            command: command_line.to_string(),
            source,
        })?;

        let result = ExecutionResult::from_output(&output, start.elapsed());
        trace!(
            cmd = %command_line,
            exit_code = ?result.exit_code,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "capture finished"
        );
        Ok(result)
    }

    /// Working directory a streamed process would use.
    pub fn stream_dir(&self) -> &Path {
        self.config
            .working_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
    }
}

/// Handle to a streamed process.
///
/// Dropping the handle does not stop the process; observers keep receiving
/// events until it exits.
#[derive(Debug)]
pub struct StreamHandle {
    pid: Option<u32>,
    task: JoinHandle<Option<i32>>,
}

impl StreamHandle {
    /// OS process id, if the process was started.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the observer has already received `on_exit`.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the process to close and return its exit code.
    pub async fn wait(self) -> Option<i32> {
        match self.task.await {
            Ok(code) => code,
            Err(e) => {
                error!("stream supervisor task failed: {}", e);
                None
            }
        }
    }
}

/// Forward everything read from `reader` to `observer` as chunks.
async fn pump<R>(mut reader: R, source: OutputSource, observer: Arc<dyn StreamObserver>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                trace!("{} reader: EOF", source);
                break;
            }
            Ok(n) => {
                trace!("{} reader: read {} bytes", source, n);
                observer.on_chunk(&OutputChunk::new(buf[..n].to_vec(), source));
            }
            Err(e) => {
                error!("{} reader error: {}", source, e);
                break;
            }
        }
    }
}

/// Run a command line with a default runner. See [`ProcessRunner::exec`].
pub async fn exec(command_line: &str) -> Result<String> {
    ProcessRunner::default().exec(command_line).await
}

/// Start `command` with a default runner, logging its output.
/// See [`ProcessRunner::spawn_stream`].
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn spawn(command: &str, args_line: &str) -> StreamHandle {
    let observer = Arc::new(LoggingObserver::new().with_label(command));
    ProcessRunner::default().spawn_stream(command, args_line, observer)
}

/// Run `command` and `args` with a default runner, blocking.
/// See [`ProcessRunner::execute`].
pub fn execute(command: &str, args: &str) -> String {
    ProcessRunner::default().execute(command, args)
}
