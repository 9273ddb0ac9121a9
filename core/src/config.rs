//! Configuration model and loader.

use crate::platform::PlatformFamily;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Tool names and layout settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Host interpreter used to create the virtual environment.
    pub python: String,
    /// Environment directory name inside each project.
    pub env_dir: String,
    /// Version-control executable.
    pub git: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_platform(PlatformFamily::current())
    }
}

impl Config {
    /// Defaults for the given platform family.
    pub fn for_platform(family: PlatformFamily) -> Self {
        Self {
            python: family.default_python().to_string(),
            env_dir: ".venv".to_string(),
            git: "git".to_string(),
        }
    }

    /// Load the file at `path` if one was given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

/// Load configuration from the provided path.
///
/// Expected TOML keys:
/// - `python` host interpreter for `-m venv`
/// - `env_dir` environment directory name
/// - `git` version-control executable
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
