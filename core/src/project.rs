//! Project names and the on-disk layout of a scaffolded project.

use crate::platform::PlatformFamily;
use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

const RESERVED_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// A validated project name, safe to use as a single directory component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name == "." || name == ".." {
            Some("name refers to a relative directory")
        } else if name.contains(RESERVED_CHARS) {
            Some("name contains a path separator or reserved character")
        } else if name.chars().any(char::is_control) {
            Some("name contains a control character")
        } else if name.ends_with(' ') || name.ends_with('.') {
            Some("name ends with a space or a dot")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidProjectName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for ProjectName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Paths of everything pycargo creates or expects inside a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    env_dir: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, env_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            env_dir: env_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.root.join("tests")
    }

    pub fn entry_point(&self) -> PathBuf {
        self.src_dir().join("main.py")
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join("README.md")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("requirements.txt")
    }

    pub fn pyproject(&self) -> PathBuf {
        self.root.join("pyproject.toml")
    }

    pub fn pre_commit_config(&self) -> PathBuf {
        self.root.join(".pre-commit-config.yaml")
    }

    pub fn env_dir_name(&self) -> &str {
        &self.env_dir
    }

    pub fn env_root(&self) -> PathBuf {
        self.root.join(&self.env_dir)
    }

    /// The environment's Python interpreter for the given platform family.
    pub fn env_python(&self, family: PlatformFamily) -> PathBuf {
        family.env_executable(&self.env_root(), "python")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["demo", "my-project", "my_project2", "Demo App", ".hidden"] {
            assert_eq!(ProjectName::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn rejects_traversal_and_reserved_names() {
        for name in ["", ".", "..", "../escape", "a/b", "a\\b", "what?", "con:", "bad\n", "trailing."] {
            let err = ProjectName::parse(name).unwrap_err();
            assert!(matches!(err, Error::InvalidProjectName { .. }), "{name:?} accepted");
        }
    }

    #[test]
    fn layout_paths() {
        let layout = ProjectLayout::new("demo", ".venv");
        assert_eq!(layout.entry_point(), Path::new("demo").join("src").join("main.py"));
        assert_eq!(layout.manifest(), Path::new("demo").join("requirements.txt"));
        assert_eq!(
            layout.env_python(PlatformFamily::Posix),
            Path::new("demo").join(".venv").join("bin").join("python")
        );
        assert_eq!(
            layout.env_python(PlatformFamily::Windows),
            Path::new("demo").join(".venv").join("Scripts").join("python.exe")
        );
    }
}
