//! Task commands that operate on an existing project.

use crate::config::Config;
use crate::platform::PlatformFamily;
use crate::project::ProjectLayout;
use crate::registry::Precheck;
use crate::runner::{CommandRunner, Invocation, ToolOutput};
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Ruff's exit status when it reports violations.
const LINT_FINDINGS_STATUS: i32 = 1;

/// Result of linting: findings are a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Clean,
    /// The linter's captured standard output.
    Findings(String),
}

/// Runs project tasks through the environment's interpreter.
pub struct TaskRunner<'a, R: ?Sized> {
    layout: ProjectLayout,
    runner: &'a R,
    platform: PlatformFamily,
}

impl<'a, R: CommandRunner + ?Sized> TaskRunner<'a, R> {
    pub fn new(root: impl Into<PathBuf>, config: &Config, runner: &'a R) -> Self {
        Self {
            layout: ProjectLayout::new(root, config.env_dir.as_str()),
            runner,
            platform: PlatformFamily::current(),
        }
    }

    pub fn with_platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Execute `src/main.py`.
    pub fn run(&self) -> Result<()> {
        self.precheck(Precheck::EntryPoint)?;
        let invocation = self.python().arg(self.layout.entry_point()).inherit_output();
        self.invoke_checked(&invocation)?;
        Ok(())
    }

    /// Run pytest against `tests/`.
    pub fn test(&self) -> Result<()> {
        self.precheck(Precheck::TestsDir)?;
        let invocation = self
            .python()
            .args(["-m", "pytest"])
            .arg(self.layout.tests_dir())
            .inherit_output();
        self.invoke_checked(&invocation)?;
        Ok(())
    }

    /// Install `requirements.txt` into the environment.
    pub fn install(&self) -> Result<()> {
        self.precheck(Precheck::Manifest)?;
        let invocation = self
            .python()
            .args(["-m", "pip", "install", "-r"])
            .arg(self.layout.manifest())
            .inherit_output();
        self.invoke_checked(&invocation)?;
        Ok(())
    }

    /// Format with black, then sort imports with isort.
    pub fn fmt(&self) -> Result<()> {
        for module in ["black", "isort"] {
            let invocation = self
                .python()
                .args(["-m", module])
                .arg(self.layout.src_dir())
                .arg(self.layout.tests_dir());
            self.invoke_checked(&invocation)?;
        }
        Ok(())
    }

    /// Lint with ruff, capturing its report.
    ///
    /// Ruff exits 1 with a report on stdout when it finds violations. Any
    /// other non-zero exit, or exit 1 with nothing on stdout (ruff missing
    /// from the environment), is a tool failure.
    pub fn check(&self) -> Result<CheckOutcome> {
        let invocation = self
            .python()
            .args(["-m", "ruff", "check"])
            .arg(self.layout.src_dir())
            .arg(self.layout.tests_dir());
        let output = self.invoke(&invocation)?;

        if output.succeeded() {
            return Ok(CheckOutcome::Clean);
        }
        if output.code == Some(LINT_FINDINGS_STATUS) && !output.stdout.trim().is_empty() {
            if !output.stderr.trim().is_empty() {
                debug!("ruff stderr: {}", output.stderr.trim());
            }
            return Ok(CheckOutcome::Findings(output.stdout));
        }
        Err(Error::ToolFailed {
            program: invocation.program_name(),
            code: output.code,
            stderr: output.stderr,
        })
    }

    fn python(&self) -> Invocation {
        Invocation::new(self.layout.env_python(self.platform))
    }

    /// Run through the environment, reporting a missing interpreter as a
    /// missing environment.
    fn invoke(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.runner.run(invocation).map_err(|err| {
            if matches!(err, Error::ToolNotFound { .. }) {
                debug!("{err}");
                Error::EnvironmentMissing {
                    path: self.layout.env_root(),
                }
            } else {
                err
            }
        })
    }

    fn invoke_checked(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.invoke(invocation)?.ensure_success(invocation)
    }

    fn precheck(&self, precheck: Precheck) -> Result<()> {
        let (path, present) = match precheck {
            Precheck::EntryPoint => {
                let path = self.layout.entry_point();
                let present = path.is_file();
                (path, present)
            }
            Precheck::TestsDir => {
                let path = self.layout.tests_dir();
                let present = path.is_dir();
                (path, present)
            }
            Precheck::Manifest => {
                let path = self.layout.manifest();
                let present = path.is_file();
                (path, present)
            }
        };

        if present {
            Ok(())
        } else {
            debug!("{}: {}", precheck, path.display());
            Err(Error::PreconditionMissing {
                kind: precheck,
                path,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RecordingRunner, ToolOutput};
    use std::fs;

    fn tasks<'a>(root: &std::path::Path, runner: &'a RecordingRunner) -> TaskRunner<'a, RecordingRunner> {
        TaskRunner::new(root, &Config::for_platform(PlatformFamily::Posix), runner)
            .with_platform(PlatformFamily::Posix)
    }

    #[test]
    fn run_without_entry_point_invokes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();

        let err = tasks(dir.path(), &runner).run().unwrap_err();

        assert!(matches!(err, Error::PreconditionMissing { kind: Precheck::EntryPoint, .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_without_tests_dir_invokes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();

        let err = tasks(dir.path(), &runner).test().unwrap_err();

        assert!(matches!(err, Error::PreconditionMissing { kind: Precheck::TestsDir, .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn install_without_manifest_invokes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();

        let err = tasks(dir.path(), &runner).install().unwrap_err();

        assert!(matches!(err, Error::PreconditionMissing { kind: Precheck::Manifest, .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn run_uses_environment_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.py"), "print('hi')\n").unwrap();
        let runner = RecordingRunner::new();

        tasks(dir.path(), &runner).run().unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].program,
            dir.path().join(".venv").join("bin").join("python").into_os_string()
        );
        assert_eq!(calls[0].args[0], dir.path().join("src").join("main.py").into_os_string());
        assert_eq!(calls[0].output, crate::OutputMode::Inherit);
    }

    #[test]
    fn run_reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.py"), "raise SystemExit(3)\n").unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::failure(3)));

        let err = tasks(dir.path(), &runner).run().unwrap_err();
        assert!(matches!(err, Error::ToolFailed { code: Some(3), .. }));
    }

    #[test]
    fn fmt_runs_black_then_isort_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();

        tasks(dir.path(), &runner).fmt().unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args[1], "black");
        assert_eq!(calls[1].args[1], "isort");
        assert!(calls.iter().all(|c| c.output == crate::OutputMode::Capture));
    }

    #[test]
    fn fmt_stops_when_black_fails() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::failure(123).with_stderr("cannot parse")));

        let err = tasks(dir.path(), &runner).fmt().unwrap_err();
        assert!(matches!(err, Error::ToolFailed { code: Some(123), .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn check_clean_tree() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::success().with_stdout("All checks passed!\n")));

        let outcome = tasks(dir.path(), &runner).check().unwrap();
        assert_eq!(outcome, CheckOutcome::Clean);
    }

    #[test]
    fn check_dirty_tree_returns_stdout_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let report = "src/main.py:1:1: F401 `os` imported but unused\nFound 1 error.\n";
        runner.push(Ok(ToolOutput::failure(1).with_stdout(report).with_stderr("warning")));

        let outcome = tasks(dir.path(), &runner).check().unwrap();
        assert_eq!(outcome, CheckOutcome::Findings(report.to_string()));

        let calls = runner.calls();
        assert_eq!(calls[0].args[1], "ruff");
        assert_eq!(calls[0].args[2], "check");
    }

    #[test]
    fn check_abnormal_exit_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::failure(2).with_stderr("error: Failed to parse pyproject.toml")));

        let err = tasks(dir.path(), &runner).check().unwrap_err();

        match err {
            Error::ToolFailed { code, stderr, .. } => {
                assert_eq!(code, Some(2));
                assert!(stderr.contains("Failed to parse"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_without_ruff_installed_surfaces_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::failure(1).with_stderr("No module named ruff\n")));

        let err = tasks(dir.path(), &runner).check().unwrap_err();

        assert!(matches!(err, Error::ToolFailed { code: Some(1), .. }));
        assert!(err.to_string().ends_with("No module named ruff"));
    }

    #[test]
    fn missing_interpreter_reports_missing_environment() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Err(Error::ToolNotFound {
            program: ".venv/bin/python".into(),
        }));

        let err = tasks(dir.path(), &runner).check().unwrap_err();

        match &err {
            Error::EnvironmentMissing { path } => assert_eq!(*path, dir.path().join(".venv")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.to_string().contains("PATH"));
        assert!(!err.is_warning());
    }

    #[test]
    fn prechecks_match_the_command_table() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let tasks = tasks(dir.path(), &runner);

        let outcomes = [
            ("run", tasks.run()),
            ("test", tasks.test()),
            ("install", tasks.install()),
            ("fmt", tasks.fmt()),
            ("check", tasks.check().map(|_| ())),
        ];

        for (command, result) in outcomes {
            let expected = crate::registry::lookup(command).unwrap().precheck;
            let actual = match result {
                Err(Error::PreconditionMissing { kind, .. }) => Some(kind),
                _ => None,
            };
            assert_eq!(actual, expected, "precheck for `{command}`");
        }
        // Only fmt (black, isort) and check (ruff) reached the runner.
        assert_eq!(runner.calls().len(), 3);
    }
}
