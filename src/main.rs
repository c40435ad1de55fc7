//! cz-runner binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use cz_runner::cli::{self, Args, Mode};
use cz_runner::config::Config;
use cz_runner::{logging, Invocation, LoggingObserver, ProcessRunner};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run 'cz-runner --help' for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Ignore failure: a subscriber may already be installed
    let _ = logging::init_with_level(config.log_filter());
    debug!(?config, "configuration loaded");

    run(&args, config.to_runner()).await
}

async fn run(args: &Args, runner: ProcessRunner) -> ExitCode {
    let (Some(mode), Some(command)) = (args.mode, args.command.as_deref()) else {
        return ExitCode::from(2);
    };
    let args_line = args.args_line();

    match mode {
        Mode::Exec => {
            let line = if args_line.is_empty() {
                command.to_string()
            } else {
                format!("{} {}", command, args_line)
            };
            match runner.exec(&line).await {
                Ok(out) => {
                    print!("{}", out);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Spawn => {
            let observer = Arc::new(LoggingObserver::new().with_label(command));
            // Without ARGS the program is started with no argument at all
            let handle = if args.args.is_empty() {
                runner.spawn_invocation(&Invocation::new(command), observer)
            } else {
                runner.spawn_stream(command, &args_line, observer)
            };
            let code = handle.wait().await;
            ExitCode::from(cli::exit_status(code))
        }
        Mode::Sync => {
            let text = tokio::task::block_in_place(|| runner.execute(command, &args_line));
            print!("{}", text);
            ExitCode::SUCCESS
        }
    }
}
