//! The `new` pipeline: lay out a project and drive the external tools.
//!
//! The root directory is claimed first so an existing project is never
//! touched. Every later [`Step`] runs in order and the first failure stops the
//! pipeline with [`Error::StepFailed`]. Nothing is rolled back.

use crate::config::Config;
use crate::platform::PlatformFamily;
use crate::project::{ProjectLayout, ProjectName};
use crate::runner::{CommandRunner, Invocation};
use crate::{templates, Error, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// One stage of project creation, in execution order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    CreateDirs,
    WriteEntryPoint,
    InitRepository,
    WriteReadme,
    WriteGitignore,
    CreateEnvironment,
    WriteManifest,
    WriteToolConfig,
    WritePreCommitConfig,
    InstallDependencies,
    InstallHooks,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::CreateDirs,
        Step::WriteEntryPoint,
        Step::InitRepository,
        Step::WriteReadme,
        Step::WriteGitignore,
        Step::CreateEnvironment,
        Step::WriteManifest,
        Step::WriteToolConfig,
        Step::WritePreCommitConfig,
        Step::InstallDependencies,
        Step::InstallHooks,
    ];

    /// Progress message shown while the step runs.
    pub fn description(self) -> &'static str {
        match self {
            Step::CreateDirs => "Creating src/ and tests/",
            Step::WriteEntryPoint => "Writing src/main.py",
            Step::InitRepository => "Initializing git repository",
            Step::WriteReadme => "Writing README.md",
            Step::WriteGitignore => "Writing .gitignore",
            Step::CreateEnvironment => "Creating virtual environment",
            Step::WriteManifest => "Writing requirements.txt",
            Step::WriteToolConfig => "Writing pyproject.toml",
            Step::WritePreCommitConfig => "Writing .pre-commit-config.yaml",
            Step::InstallDependencies => "Installing requirements",
            Step::InstallHooks => "Installing pre-commit hooks",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::CreateDirs => "creating project directories",
            Step::WriteEntryPoint => "writing src/main.py",
            Step::InitRepository => "git init",
            Step::WriteReadme => "writing README.md",
            Step::WriteGitignore => "writing .gitignore",
            Step::CreateEnvironment => "virtual environment creation",
            Step::WriteManifest => "writing requirements.txt",
            Step::WriteToolConfig => "writing pyproject.toml",
            Step::WritePreCommitConfig => "writing .pre-commit-config.yaml",
            Step::InstallDependencies => "requirements install",
            Step::InstallHooks => "pre-commit install",
        })
    }
}

/// Creates new projects using the configured tools.
pub struct Scaffolder<'a, R: ?Sized> {
    config: &'a Config,
    runner: &'a R,
    platform: PlatformFamily,
}

impl<'a, R: CommandRunner + ?Sized> Scaffolder<'a, R> {
    pub fn new(config: &'a Config, runner: &'a R) -> Self {
        Self {
            config,
            runner,
            platform: PlatformFamily::current(),
        }
    }

    /// Override the platform family used to locate environment executables.
    pub fn with_platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    /// Create `parent/name` and everything in it.
    pub fn scaffold(&self, parent: &Path, name: &ProjectName) -> Result<ProjectLayout> {
        self.scaffold_with(parent, name, |_| {})
    }

    /// Like [`Scaffolder::scaffold`], calling `on_step` before each step starts.
    pub fn scaffold_with(
        &self,
        parent: &Path,
        name: &ProjectName,
        mut on_step: impl FnMut(Step),
    ) -> Result<ProjectLayout> {
        let layout = ProjectLayout::new(parent.join(name), self.config.env_dir.as_str());
        info!("Creating project {} at {}", name, layout.root().display());

        claim_root(layout.root())?;

        for step in Step::ALL {
            on_step(step);
            info!("{}", step.description());
            self.perform(step, &layout, name)
                .map_err(|source| Error::step(step, source))?;
        }

        info!("Project {} created", name);
        Ok(layout)
    }

    fn perform(&self, step: Step, layout: &ProjectLayout, name: &ProjectName) -> Result<()> {
        match step {
            Step::CreateDirs => {
                fs::create_dir(layout.src_dir())?;
                fs::create_dir(layout.tests_dir())?;
            }
            Step::WriteEntryPoint => fs::write(layout.entry_point(), templates::ENTRY_POINT)?,
            Step::InitRepository => {
                let init = Invocation::new(&self.config.git)
                    .arg("init")
                    .arg(layout.root());
                self.runner.run_checked(&init)?;
            }
            Step::WriteReadme => fs::write(layout.readme(), templates::readme(name))?,
            Step::WriteGitignore => fs::write(
                layout.gitignore(),
                templates::gitignore(layout.env_dir_name()),
            )?,
            Step::CreateEnvironment => {
                let venv = Invocation::new(&self.config.python)
                    .args(["-m", "venv"])
                    .arg(layout.env_root());
                self.runner.run_checked(&venv)?;
            }
            Step::WriteManifest => fs::write(layout.manifest(), templates::requirements())?,
            Step::WriteToolConfig => fs::write(layout.pyproject(), templates::PYPROJECT)?,
            Step::WritePreCommitConfig => {
                fs::write(layout.pre_commit_config(), templates::PRE_COMMIT_CONFIG)?
            }
            Step::InstallDependencies => {
                let python = layout.env_python(self.platform);
                debug!("Environment interpreter: {}", python.display());
                let install = Invocation::new(python)
                    .args(["-m", "pip", "install", "-r"])
                    .arg(layout.manifest())
                    .arg(templates::HOOK_MANAGER);
                self.runner.run_checked(&install)?;
            }
            Step::InstallHooks => {
                let hooks = Invocation::new(layout.env_python(self.platform))
                    .args(["-m", "pre_commit", "install"])
                    .current_dir(layout.root());
                self.runner.run_checked(&hooks)?;
            }
        }
        Ok(())
    }
}

/// Create the project root, refusing to reuse an existing path.
fn claim_root(root: &Path) -> Result<()> {
    match fs::create_dir(root) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            debug!("{} already exists", root.display());
            Err(Error::AlreadyExists {
                path: root.to_path_buf(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RecordingRunner, ToolOutput};

    fn config() -> Config {
        Config::for_platform(PlatformFamily::Posix)
    }

    #[test]
    fn steps_run_in_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config = config();
        let name = ProjectName::parse("demo").unwrap();

        let mut seen = Vec::new();
        Scaffolder::new(&config, &runner)
            .with_platform(PlatformFamily::Posix)
            .scaffold_with(dir.path(), &name, |step| seen.push(step))
            .unwrap();

        assert_eq!(seen, Step::ALL);
    }

    #[test]
    fn invocations_target_the_new_project() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config = config();
        let name = ProjectName::parse("demo").unwrap();

        let layout = Scaffolder::new(&config, &runner)
            .with_platform(PlatformFamily::Posix)
            .scaffold(dir.path(), &name)
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 4);

        assert_eq!(calls[0].program, "git");
        assert_eq!(calls[0].args[0], "init");
        assert_eq!(calls[0].args[1], layout.root().as_os_str());

        assert_eq!(calls[1].program, "python3");
        assert_eq!(calls[1].args[0], "-m");
        assert_eq!(calls[1].args[1], "venv");
        assert_eq!(calls[1].args[2], layout.env_root().into_os_string());

        let env_python = layout.root().join(".venv").join("bin").join("python");
        assert_eq!(calls[2].program, env_python.clone().into_os_string());
        assert_eq!(calls[2].args[4], layout.manifest().as_os_str());
        assert_eq!(calls[2].args[5], "pre-commit");

        assert_eq!(calls[3].program, env_python.into_os_string());
        assert_eq!(calls[3].args, ["-m", "pre_commit", "install"]);
        assert_eq!(calls[3].cwd.as_deref(), Some(layout.root()));
    }

    #[test]
    fn git_failure_stops_before_readme() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        runner.push(Ok(ToolOutput::failure(128).with_stderr("fatal: nope")));
        let config = config();
        let name = ProjectName::parse("demo").unwrap();

        let err = Scaffolder::new(&config, &runner)
            .scaffold(dir.path(), &name)
            .unwrap_err();

        assert!(matches!(err, Error::StepFailed { step: Step::InitRepository, .. }));
        let root = dir.path().join("demo");
        assert!(root.join("src").join("main.py").exists());
        assert!(!root.join("README.md").exists());
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn missing_parent_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let config = config();
        let name = ProjectName::parse("demo").unwrap();

        let err = Scaffolder::new(&config, &runner)
            .scaffold(&dir.path().join("missing"), &name)
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(runner.calls().is_empty());
    }
}
