//! Subcommand handlers.

use anyhow::{Context, Result};
use pycargo_core::{
    CheckOutcome, Config, ProcessRunner, ProjectName, Scaffolder, TaskRunner, COMMANDS,
};
use std::env;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use crate::output;
use crate::Command;

pub(crate) fn dispatch(command: Command, config_path: Option<&Path>) -> Result<ExitCode> {
    let config = Config::load_or_default(config_path).context("could not load configuration")?;
    debug!("Using {config:?}");
    let cwd = env::current_dir().context("could not read the current directory")?;
    let runner = ProcessRunner::new();
    let tasks = TaskRunner::new(&cwd, &config, &runner);

    let result = match command {
        Command::Commands => {
            list_commands();
            Ok(())
        }
        Command::New { project_name } => new_project(&project_name, &cwd, &config, &runner),
        Command::Run => tasks.run(),
        Command::Test => tasks.test(),
        Command::Install => tasks
            .install()
            .map(|()| output::success("Dependencies installed.")),
        Command::Fmt => tasks
            .fmt()
            .map(|()| output::success("Formatted src/ and tests/.")),
        Command::Check => match tasks.check() {
            Ok(outcome) => return Ok(report_check(outcome)),
            Err(err) => Err(err),
        },
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_warning() => {
            output::warning(&err.to_string());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err.into()),
    }
}

fn new_project(
    name: &str,
    parent: &Path,
    config: &Config,
    runner: &ProcessRunner,
) -> pycargo_core::Result<()> {
    output::header(&format!("🚀 Creating new Python project: {name}"));
    let name = ProjectName::parse(name)?;

    let layout = Scaffolder::new(config, runner)
        .scaffold_with(parent, &name, |step| output::step(step.description()))?;

    output::success("Project created successfully.");
    output::info(&format!(
        "Next: cd {} && pycargo run",
        layout.root().strip_prefix(parent).unwrap_or(layout.root()).display()
    ));
    Ok(())
}

fn report_check(outcome: CheckOutcome) -> ExitCode {
    match outcome {
        CheckOutcome::Clean => {
            output::success("No lint issues found.");
            ExitCode::SUCCESS
        }
        CheckOutcome::Findings(report) => {
            output::error("Lint check failed.");
            print!("{report}");
            ExitCode::FAILURE
        }
    }
}

fn list_commands() {
    for command in COMMANDS {
        println!("  {:<8} {}", command.name, command.summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_commands_succeeds_outside_a_project() {
        assert!(dispatch(Command::Commands, None).is_ok());
    }
}
