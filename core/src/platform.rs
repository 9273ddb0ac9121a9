//! Host platform detection and environment executable paths.

use std::path::{Path, PathBuf};

/// Operating system family, as far as virtual environment layout is concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlatformFamily {
    Posix,
    Windows,
}

impl PlatformFamily {
    /// The family of the host this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Default name of the host Python interpreter for this family.
    pub fn default_python(self) -> &'static str {
        match self {
            Self::Posix => "python3",
            Self::Windows => "python",
        }
    }

    /// Resolve `program` inside the environment rooted at `env_root`.
    ///
    /// Posix environments keep executables in `bin/`, Windows ones in
    /// `Scripts/` with an `.exe` suffix.
    pub fn env_executable(self, env_root: &Path, program: &str) -> PathBuf {
        match self {
            Self::Posix => env_root.join("bin").join(program),
            Self::Windows => env_root.join("Scripts").join(format!("{program}.exe")),
        }
    }
}
