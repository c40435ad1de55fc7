//! Command-line interface for cz-runner.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

/// How the command should be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Async exec through the shell; prints stdout, fails on non-zero exit.
    Exec,
    /// Streamed spawn; output is logged as it arrives.
    Spawn,
    /// Blocking exec through the shell; prints stderr or stdout.
    Sync,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exec" => Ok(Self::Exec),
            "spawn" => Ok(Self::Spawn),
            "sync" => Ok(Self::Sync),
            other => Err(other.to_string()),
        }
    }
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Run mode (first positional argument).
    pub mode: Option<Mode>,
    /// Program or command to run.
    pub command: Option<String>,
    /// Remaining arguments, passed through verbatim.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub cwd: Option<PathBuf>,
    /// Shell program used for command lines.
    pub shell: Option<String>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Args {
    /// Arguments joined with single spaces.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('C') | Long("cwd") => {
                result.cwd = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("shell") => {
                result.shell = Some(parser.value()?.parse()?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) if result.mode.is_none() => {
                let value = val.to_string_lossy().into_owned();
                let mode = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("mode", value))?;
                result.mode = Some(mode);
            }
            Value(val) => {
                // Everything after the command belongs to the child.
                result.command = Some(val.string()?);
                for raw in parser.raw_args()? {
                    result.args.push(raw.string()?);
                }
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    if !result.help && !result.version {
        if result.mode.is_none() {
            return Err(ArgsError::Missing("mode"));
        }
        if result.command.is_none() {
            return Err(ArgsError::Missing("command"));
        }
    }

    Ok(result)
}

/// Process exit status for a child's exit code.
///
/// `0` stays `0`; codes that fit in a byte are kept; anything else,
/// including termination without a code, becomes `1`.
pub fn exit_status(code: Option<i32>) -> u8 {
    match code {
        Some(code) => u8::try_from(code).unwrap_or(1),
        None => 1,
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"cz-runner {version}
Run external commands the way the Commitizen Code panel does

USAGE:
    cz-runner [OPTIONS] <MODE> <COMMAND> [ARGS...]

MODES:
    exec     Run through the shell, print stdout, fail on non-zero exit
    spawn    Start COMMAND with ARGS as one argument, log output as it arrives
    sync     Run through the shell, print stderr if any, otherwise stdout

OPTIONS:
    -C, --cwd <DIR>         Working directory for the child process
    -s, --shell <PROGRAM>   Shell used for command lines [default: sh / cmd]
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    CZ_RUNNER_CWD           Working directory (overrides config)
    CZ_RUNNER_SHELL         Shell program (overrides config)
    CZ_RUNNER_LOG_LEVEL     Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Print the commitizen CLI version
    cz-runner sync cz --version

    # Fail unless the command succeeds
    cz-runner exec git diff --cached --quiet

    # Stream a long-running command
    cz-runner -l info spawn ping localhost
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("cz-runner {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Required positional argument missing.
    Missing(&'static str),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for {}: '{}'", name, value)
            }
            Self::Missing(name) => write!(f, "missing required argument: <{}>", name.to_uppercase()),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("cz-runner")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_sync_mode() {
        let result = parse_args_from(args(&["sync", "cz", "--version"])).unwrap();
        assert_eq!(result.mode, Some(Mode::Sync));
        assert_eq!(result.command.as_deref(), Some("cz"));
        assert_eq!(result.args, vec!["--version"]);
        assert_eq!(result.args_line(), "--version");
    }

    #[test]
    fn test_options_before_mode() {
        let result =
            parse_args_from(args(&["-C", "/repo", "-s", "bash", "exec", "git", "status"])).unwrap();
        assert_eq!(result.cwd, Some(PathBuf::from("/repo")));
        assert_eq!(result.shell.as_deref(), Some("bash"));
        assert_eq!(result.mode, Some(Mode::Exec));
        assert_eq!(result.args_line(), "status");
    }

    #[test]
    fn test_child_flags_are_not_parsed() {
        let result = parse_args_from(args(&["spawn", "ls", "-l", "-h"])).unwrap();
        assert!(!result.help);
        assert_eq!(result.args, vec!["-l", "-h"]);
    }

    #[test]
    fn test_metacharacters_pass_through() {
        let result = parse_args_from(args(&["sync", "echo", "a", "&&", "echo", "b"])).unwrap();
        assert_eq!(result.args_line(), "a && echo b");
    }

    #[test]
    fn test_config_and_log_level() {
        let result =
            parse_args_from(args(&["-c", "/etc/cz.json", "-l", "debug", "sync", "true"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/cz.json")));
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(exit_status(Some(0)), 0);
        assert_eq!(exit_status(Some(3)), 3);
        assert_eq!(exit_status(Some(255)), 255);
        assert_eq!(exit_status(Some(256)), 1);
        assert_eq!(exit_status(Some(-1)), 1);
        assert_eq!(exit_status(None), 1);
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_invalid_mode() {
        let err = parse_args_from(args(&["run", "ls"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidValue("mode", _)));
    }

    #[test]
    fn test_missing_mode() {
        let err = parse_args_from(args(&[])).unwrap_err();
        assert!(matches!(err, ArgsError::Missing("mode")));
    }

    #[test]
    fn test_missing_command() {
        let err = parse_args_from(args(&["exec"])).unwrap_err();
        assert!(matches!(err, ArgsError::Missing("command")));
        assert!(err.to_string().contains("<COMMAND>"));
    }
}
