//! Host-agnostic adapter for the commit side panel.
//!
//! The panel renders a form (commit kind + message) and posts messages back.
//! This module turns those messages into notifications for the host to show
//! and forwards CLI subcommands to the [`ProcessRunner`]. Rendering is left to
//! the host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::execution::ProcessRunner;
use crate::Result;

/// Default name of the terminal the host opens for the panel.
pub const DEFAULT_TERMINAL_NAME: &str = "commitizen-code: terminal";

/// Kind of commit offered in the panel's select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    Feature,
    Bugfix,
    Hotfix,
    Chore,
    Epic,
    Design,
    Experiment,
    Documentation,
}

impl CommitKind {
    /// All kinds, in the order the form lists them.
    pub const ALL: [CommitKind; 8] = [
        CommitKind::Feature,
        CommitKind::Bugfix,
        CommitKind::Hotfix,
        CommitKind::Chore,
        CommitKind::Epic,
        CommitKind::Design,
        CommitKind::Experiment,
        CommitKind::Documentation,
    ];

    /// Form value.
    pub fn value(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Bugfix => "bugfix",
            Self::Hotfix => "hotfix",
            Self::Chore => "chore",
            Self::Epic => "epic",
            Self::Design => "design",
            Self::Experiment => "experiment",
            Self::Documentation => "documentation",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::Bugfix => "Bugfix",
            Self::Hotfix => "Hotfix",
            Self::Chore => "Chore",
            Self::Epic => "Epic",
            Self::Design => "Design",
            Self::Experiment => "Experiment",
            Self::Documentation => "Documentation",
        }
    }
}

impl std::str::FromStr for CommitKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.value() == s)
            .ok_or_else(|| format!("unknown commit kind: {}", s))
    }
}

impl std::fmt::Display for CommitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Message posted by the panel form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PanelMessage {
    /// The form hit an error it wants surfaced.
    Error { message: String },
    /// The user submitted a commit message.
    Commit { commit: String },
}

/// Notification for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Info(String),
}

/// Explicit panel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Workspace folders open in the host.
    pub workspace_folders: Vec<PathBuf>,
    /// Name of the terminal the host creates for the panel.
    pub terminal_name: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            workspace_folders: Vec::new(),
            terminal_name: DEFAULT_TERMINAL_NAME.to_string(),
        }
    }
}

impl PanelConfig {
    /// Add a workspace folder.
    pub fn workspace_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_folders.push(dir.into());
        self
    }

    /// Set the terminal name.
    pub fn terminal_name(mut self, name: impl Into<String>) -> Self {
        self.terminal_name = name.into();
        self
    }
}

/// Controller behind the commit panel.
#[derive(Debug, Clone)]
pub struct CommitPanel {
    config: PanelConfig,
    runner: ProcessRunner,
}

impl CommitPanel {
    /// Create a panel controller.
    pub fn new(config: PanelConfig, runner: ProcessRunner) -> Self {
        Self { config, runner }
    }

    /// Panel configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Kinds to list in the form.
    pub fn commit_kinds(&self) -> &'static [CommitKind] {
        &CommitKind::ALL
    }

    /// Whether any workspace folder has a `.git` entry.
    pub fn workspace_has_git(&self) -> bool {
        self.config
            .workspace_folders
            .iter()
            .any(|dir| dir.join(".git").exists())
    }

    /// Closing line shown under the form.
    pub fn outro_text(&self) -> &'static str {
        if self.workspace_has_git() {
            "Start your commit journey from now."
        } else {
            "Please open a folder how have git initialized."
        }
    }

    /// Turn a form message into a notification.
    pub fn handle_message(&self, message: PanelMessage) -> Notification {
        match message {
            PanelMessage::Error { message } => {
                debug!(%message, "panel reported error");
                Notification::Error(message)
            }
            PanelMessage::Commit { commit } => {
                info!(%commit, "commit submitted");
                Notification::Info(format!("Commitizen Code: Commit message is: {}", commit))
            }
        }
    }

    /// Decode a JSON form message and handle it.
    pub fn handle_json(&self, json: &str) -> Result<Notification> {
        let message: PanelMessage = serde_json::from_str(json)?;
        Ok(self.handle_message(message))
    }

    /// Forward a CLI subcommand to the runner, blocking.
    ///
    /// Returns the runner's text as-is; see [`ProcessRunner::execute`].
    pub fn run(&self, command: &str, args: &str) -> String {
        self.runner.execute(command, args)
    }
}
