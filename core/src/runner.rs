//! Command runner abstractions.

use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Where a subprocess's output goes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Share the terminal with the child.
    Inherit,
    /// Capture stdout and stderr; nothing reaches the terminal.
    Capture,
}

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub output: OutputMode,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            output: OutputMode::Capture,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn inherit_output(mut self) -> Self {
        self.output = OutputMode::Inherit;
        self
    }

    /// The program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::ToolFailed`].
    pub fn ensure_success(self, invocation: &Invocation) -> Result<Self> {
        if self.succeeded() {
            Ok(self)
        } else {
            Err(Error::ToolFailed {
                program: invocation.program_name(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Trait describing how external tools get executed.
pub trait CommandRunner {
    /// Run to completion. A non-zero exit is not an error at this level.
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;

    /// Run and fail with [`Error::ToolFailed`] on a non-zero exit.
    fn run_checked(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.run(invocation)?.ensure_success(invocation)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes, blocking until each exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        debug!("Running: {invocation}");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).stdin(Stdio::null());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let not_found = |err: io::Error| match err.kind() {
            io::ErrorKind::NotFound => Error::ToolNotFound {
                program: invocation.program_name(),
            },
            _ => Error::Io(err),
        };

        let output = match invocation.output {
            OutputMode::Inherit => {
                let status = cmd.stdin(Stdio::inherit()).status().map_err(not_found)?;
                ToolOutput {
                    code: status.code(),
                    ..ToolOutput::default()
                }
            }
            OutputMode::Capture => {
                let output = cmd.output().map_err(not_found)?;
                ToolOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
        };

        debug!("`{}` exited with {:?}", invocation.program_name(), output.code);
        Ok(output)
    }
}

/// Records invocations and replays scripted outputs instead of spawning.
///
/// Outputs are consumed in order; once the script runs out every invocation
/// succeeds with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    script: RefCell<VecDeque<Result<ToolOutput>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next unscripted invocation.
    pub fn push(&self, result: Result<ToolOutput>) -> &Self {
        self.script.borrow_mut().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Each recorded invocation rendered as a command line.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ToolOutput::success()))
    }
}
