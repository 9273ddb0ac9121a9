//! Core crate for pycargo: project scaffolding and task running for Python projects.

pub mod config;
pub mod platform;
pub mod project;
pub mod registry;
pub mod runner;
pub mod scaffold;
pub mod tasks;
pub mod templates;

pub use config::Config;
pub use platform::PlatformFamily;
pub use project::{ProjectLayout, ProjectName};
pub use registry::{CommandInfo, Precheck, COMMANDS};
pub use runner::{CommandRunner, Invocation, OutputMode, ProcessRunner, RecordingRunner, ToolOutput};
pub use scaffold::{Scaffolder, Step};
pub use tasks::{CheckOutcome, TaskRunner};

use std::path::PathBuf;
use thiserror::Error;

/// Common error type for pycargo.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid project name `{name}`: {reason}")]
    InvalidProjectName { name: String, reason: &'static str },

    /// The target project directory is already present.
    #[error("project already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// A task's required file or directory is absent.
    #[error("{kind} ({})", path.display())]
    PreconditionMissing { kind: Precheck, path: PathBuf },

    #[error("`{program}` was not found. Is it installed and on PATH?")]
    ToolNotFound { program: String },

    /// The project's virtual environment interpreter is missing.
    #[error(
        "no virtual environment at {}; create it with `python3 -m venv` and run `pycargo install`",
        path.display()
    )]
    EnvironmentMissing { path: PathBuf },

    #[error("`{program}` exited with {}{}", exit_label(*code), stderr_suffix(stderr))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A scaffolding step failed; later steps were not run.
    #[error("{step} failed: {source}")]
    StepFailed {
        step: Step,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a recoverable warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::PreconditionMissing { .. })
    }

    pub(crate) fn step(step: Step, source: Error) -> Self {
        Self::StepFailed {
            step,
            source: Box::new(source),
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Convenient alias for results returned by the core crate.
pub type Result<T> = std::result::Result<T, Error>;
