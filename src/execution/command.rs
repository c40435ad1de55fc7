//! Command invocations and shell selection.

use serde::{Deserialize, Serialize};

/// A program plus its ordered argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    /// Argument tokens, passed to the program as-is.
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Join program and arguments into one shell command line.
    ///
    /// Tokens are separated by a single space and are not quoted, so shell
    /// metacharacters in any token reach the shell untouched.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Shell used to interpret command lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell executable.
    pub program: String,
    /// Flag that makes the shell read the command from its next argument.
    pub flag: String,
}

impl ShellConfig {
    /// Create a shell config from a program and its command flag.
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// Pick the command flag for a known shell program.
    ///
    /// `cmd` takes `/C`; PowerShell variants take `-Command`; anything else is
    /// treated as a POSIX shell.
    pub fn for_program(program: impl Into<String>) -> Self {
        let program = program.into();
        let stem = std::path::Path::new(&program)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let flag = match stem.as_str() {
            "cmd" => "/C",
            "powershell" | "pwsh" => "-Command",
            _ => "-c",
        };

        Self::new(program, flag)
    }

    /// Whether the shell is `cmd.exe`.
    ///
    /// `cmd` does not follow the usual Windows argument unquoting rules, so
    /// the command line has to reach it verbatim.
    pub fn is_cmd(&self) -> bool {
        std::path::Path::new(&self.program)
            .file_stem()
            .map(|s| s.eq_ignore_ascii_case("cmd"))
            .unwrap_or(false)
    }

    /// Build a blocking `std::process::Command` for the given line.
    pub fn std_command(&self, command_line: &str) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);

        #[cfg(windows)]
        if self.is_cmd() {
            use std::os::windows::process::CommandExt;
            cmd.args(["/d", "/s", self.flag.as_str()])
                .raw_arg(cmd_quoted(command_line));
            return cmd;
        }

        cmd.arg(&self.flag).arg(command_line);
        cmd
    }

    /// Build an async `tokio::process::Command` for the given line.
    pub fn tokio_command(&self, command_line: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);

        #[cfg(windows)]
        if self.is_cmd() {
            cmd.args(["/d", "/s", self.flag.as_str()])
                .raw_arg(cmd_quoted(command_line));
            return cmd;
        }

        cmd.arg(&self.flag).arg(command_line);
        cmd
    }
}

/// Wrap a line for `cmd /s /c`, which strips exactly the outer pair of quotes
/// and runs the rest untouched.
#[cfg_attr(not(windows), allow(dead_code))]
fn cmd_quoted(command_line: &str) -> String {
    format!("\"{}\"", command_line)
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_new() {
        let inv = Invocation::new("cz");
        assert_eq!(inv.program, "cz");
        assert!(inv.args.is_empty());
        assert_eq!(inv.command_line(), "cz");
    }

    #[test]
    fn test_invocation_chain() {
        let inv = Invocation::new("cz").arg("feature").args(["-m", "add login"]);
        assert_eq!(inv.args, vec!["feature", "-m", "add login"]);
        assert_eq!(inv.command_line(), "cz feature -m add login");
    }

    #[test]
    fn test_command_line_keeps_metacharacters() {
        let inv = Invocation::new("echo").arg("a && echo b | tr a-z A-Z");
        assert_eq!(inv.command_line(), "echo a && echo b | tr a-z A-Z");
    }

    #[test]
    fn test_default_shell() {
        let shell = ShellConfig::default();
        if cfg!(windows) {
            assert_eq!(shell, ShellConfig::new("cmd", "/C"));
        } else {
            assert_eq!(shell, ShellConfig::new("sh", "-c"));
        }
    }

    #[test]
    fn test_for_program_flags() {
        assert_eq!(ShellConfig::for_program("bash").flag, "-c");
        assert_eq!(ShellConfig::for_program("/usr/bin/zsh").flag, "-c");
        assert_eq!(ShellConfig::for_program("cmd.exe").flag, "/C");
        assert_eq!(ShellConfig::for_program("pwsh").flag, "-Command");
    }

    #[test]
    fn test_is_cmd() {
        assert!(ShellConfig::new("cmd", "/C").is_cmd());
        assert!(ShellConfig::new(r"C:\Windows\System32\CMD.EXE", "/C").is_cmd());
        assert!(!ShellConfig::new("sh", "-c").is_cmd());
        assert!(!ShellConfig::new("pwsh", "-Command").is_cmd());
    }

    #[test]
    fn test_cmd_quoted_keeps_inner_quotes() {
        assert_eq!(
            cmd_quoted(r#"git commit -m "feat: x""#),
            r#""git commit -m "feat: x"""#
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_cmd_receives_quotes_verbatim() {
        let output = ShellConfig::default()
            .std_command(r#"echo "feat: x""#)
            .output()
            .unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.trim_end(), r#""feat: x""#);
    }

    #[cfg(windows)]
    #[tokio::test]
    async fn test_cmd_receives_quotes_verbatim_async() {
        let output = ShellConfig::default()
            .tokio_command(r#"echo "feat: x" & echo done"#)
            .output()
            .await
            .unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<_> = stdout.lines().map(str::trim_end).collect();
        assert_eq!(lines, vec![r#""feat: x""#, "done"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_std_command_args() {
        let cmd = ShellConfig::new("sh", "-c").std_command("echo hi");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "sh");
        assert_eq!(args, vec!["-c", "echo hi"]);
    }
}
