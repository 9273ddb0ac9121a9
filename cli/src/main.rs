mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Streamline Python project development: scaffold, run, test, format and lint.
#[derive(Debug, Parser)]
#[command(name = "pycargo", version, about)]
struct Cli {
    /// Path to a pycargo config file.
    #[arg(long, global = true, env = "PYCARGO_CONFIG")]
    config: Option<PathBuf>,
    /// More log output (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new Python project.
    New {
        /// Name of the project directory to create.
        project_name: String,
    },
    /// Run src/main.py with the project environment.
    Run,
    /// Run the test suite with pytest.
    Test,
    /// Install requirements.txt into the environment.
    Install,
    /// Format src/ and tests/ with black and isort.
    Fmt,
    /// Lint src/ and tests/ with ruff.
    Check,
    /// List available commands.
    Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match commands::dispatch(cli.command, cli.config.as_deref()) {
        Ok(code) => code,
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                // Status lines cover the normal case; -v shows pipeline steps.
                0 => EnvFilter::new("warn"),
                1 => EnvFilter::new("info"),
                2 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
