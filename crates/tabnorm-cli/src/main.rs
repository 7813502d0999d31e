//! tabnorm CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use serde_json::json;
use tabnorm_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use tabnorm_cli::commands::{run_check, run_normalize, run_profile, run_validate};
use tabnorm_cli::logging::{LogConfig, LogFormat, init_logging};
use tabnorm_cli::summary::{print_run, render_findings};
use tracing::level_filters::LevelFilter;

/// Exit code when the command ran but its subject did not pass.
const EXIT_NOT_CONFORMANT: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Command::Normalize(args) => {
            let run = run_normalize(args, config_path)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                print_run(&run);
            }
            Ok(if run.outcome.is_success() {
                0
            } else {
                EXIT_NOT_CONFORMANT
            })
        }
        Command::Profile(args) => {
            let profile = run_profile(args, config_path)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("{}", profile.render());
            }
            Ok(0)
        }
        Command::Check(args) => {
            let violations = run_check(args, config_path)?;
            if args.json {
                let value = json!({
                    "ok": violations.is_empty(),
                    "violations": violations,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
                print!("{}", render_findings(&args.program, "Violations", &messages));
            }
            Ok(if violations.is_empty() {
                0
            } else {
                EXIT_NOT_CONFORMANT
            })
        }
        Command::Validate(args) => {
            let report = run_validate(args, config_path)?;
            if args.json {
                let value = json!({
                    "ok": report.is_ok(),
                    "issues": report,
                    "messages": report.messages(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!(
                    "{}",
                    render_findings(&args.output, "Issues", &report.messages())
                );
            }
            Ok(if report.is_ok() {
                0
            } else {
                EXIT_NOT_CONFORMANT
            })
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence:
/// `--log-level` over `-v`/`-q` over `RUST_LOG` over the default.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default().with_level_filter(cli.verbosity.tracing_level_filter());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
