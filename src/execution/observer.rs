//! Observers for streamed process output.

use std::sync::{Arc, Mutex};

use tracing::info;

use super::result::{OutputChunk, OutputSource};

/// Receives output and termination events from a streamed process.
///
/// Callbacks run on Tokio worker tasks. Chunks from one stream arrive in
/// order; stdout and stderr chunks are not ordered relative to each other.
/// `on_exit` is called exactly once, after every chunk has been delivered.
pub trait StreamObserver: Send + Sync {
    /// Called for each chunk read from standard output.
    fn on_stdout_chunk(&self, text: &str);

    /// Called for each chunk read from standard error.
    fn on_stderr_chunk(&self, text: &str);

    /// Called once when the process has terminated.
    ///
    /// `code` is `None` if the process was killed by a signal or could not be
    /// started at all.
    fn on_exit(&self, code: Option<i32>);

    /// Dispatch a chunk to the matching stream callback.
    fn on_chunk(&self, chunk: &OutputChunk) {
        match chunk.source {
            OutputSource::Stdout => self.on_stdout_chunk(&chunk.text),
            OutputSource::Stderr => self.on_stderr_chunk(&chunk.text),
        }
    }
}

/// Observer that writes every event to the log.
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    label: Option<String>,
}

impl LoggingObserver {
    /// Create a logging observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every log line with a label (usually the program name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("-")
    }
}

impl StreamObserver for LoggingObserver {
    fn on_stdout_chunk(&self, text: &str) {
        info!(process = %self.label(), "stdout: {}", text);
    }

    fn on_stderr_chunk(&self, text: &str) {
        info!(process = %self.label(), "stderr: {}", text);
    }

    fn on_exit(&self, code: Option<i32>) {
        match code {
            Some(code) => info!(process = %self.label(), "closed: {}", code),
            None => info!(process = %self.label(), "closed: null"),
        }
    }
}

/// Events recorded by a [`CapturingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Stdout(String),
    Stderr(String),
    Exit(Option<i32>),
}

/// Observer that records every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CapturingObserver {
    events: Arc<Mutex<Vec<StreamEvent>>>,
}

impl CapturingObserver {
    /// Create an empty capturing observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far, in arrival order.
    pub fn events(&self) -> Vec<StreamEvent> {
        self.lock().clone()
    }

    /// Concatenated stdout text.
    pub fn stdout(&self) -> String {
        self.collect(|e| match e {
            StreamEvent::Stdout(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Concatenated stderr text.
    pub fn stderr(&self) -> String {
        self.collect(|e| match e {
            StreamEvent::Stderr(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Exit code, once the process has terminated.
    ///
    /// Outer `None` means `on_exit` has not fired yet.
    pub fn exit_code(&self) -> Option<Option<i32>> {
        self.lock().iter().find_map(|e| match e {
            StreamEvent::Exit(code) => Some(*code),
            _ => None,
        })
    }

    fn collect<F>(&self, pick: F) -> String
    where
        F: Fn(&StreamEvent) -> Option<&str>,
    {
        self.lock().iter().filter_map(pick).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StreamEvent>> {
        // A poisoned lock only means an observer callback panicked; the
        // recorded events are still valid.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: StreamEvent) {
        self.lock().push(event);
    }
}

impl StreamObserver for CapturingObserver {
    fn on_stdout_chunk(&self, text: &str) {
        self.push(StreamEvent::Stdout(text.to_string()));
    }

    fn on_stderr_chunk(&self, text: &str) {
        self.push(StreamEvent::Stderr(text.to_string()));
    }

    fn on_exit(&self, code: Option<i32>) {
        self.push(StreamEvent::Exit(code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capturing_records_in_order() {
        let obs = CapturingObserver::new();
        obs.on_stdout_chunk("a");
        obs.on_stderr_chunk("b");
        obs.on_stdout_chunk("c");
        obs.on_exit(Some(0));

        assert_eq!(
            obs.events(),
            vec![
                StreamEvent::Stdout("a".into()),
                StreamEvent::Stderr("b".into()),
                StreamEvent::Stdout("c".into()),
                StreamEvent::Exit(Some(0)),
            ]
        );
        assert_eq!(obs.stdout(), "ac");
        assert_eq!(obs.stderr(), "b");
        assert_eq!(obs.exit_code(), Some(Some(0)));
    }

    #[test]
    fn test_capturing_clone_shares_events() {
        let obs = CapturingObserver::new();
        let shared = obs.clone();
        shared.on_exit(None);
        assert_eq!(obs.exit_code(), Some(None));
    }

    #[test]
    fn test_exit_code_before_exit() {
        let obs = CapturingObserver::new();
        obs.on_stdout_chunk("partial");
        assert_eq!(obs.exit_code(), None);
    }

    #[test]
    fn test_on_chunk_dispatch() {
        let obs = CapturingObserver::new();
        obs.on_chunk(&OutputChunk::stderr(b"err".to_vec()));
        obs.on_chunk(&OutputChunk::stdout(b"out".to_vec()));
        assert_eq!(obs.stderr(), "err");
        assert_eq!(obs.stdout(), "out");
    }

    #[test]
    fn test_logging_observer_does_not_panic() {
        let _ = crate::logging::try_init();
        let obs = LoggingObserver::new().with_label("cz");
        obs.on_stdout_chunk("hello");
        obs.on_stderr_chunk("warn");
        obs.on_exit(Some(1));
        obs.on_exit(None);
    }
}
