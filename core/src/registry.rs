//! Static table of the commands pycargo exposes.

/// What a command needs to find in the project root before it runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// `src/main.py` must exist.
    EntryPoint,
    /// `tests/` must exist.
    TestsDir,
    /// `requirements.txt` must exist.
    Manifest,
}

impl std::fmt::Display for Precheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EntryPoint => "entry point not found",
            Self::TestsDir => "no tests found",
            Self::Manifest => "no requirements manifest found",
        })
    }
}

/// Metadata describing one subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub summary: &'static str,
    pub precheck: Option<Precheck>,
}

pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "new",
        summary: "Create a new Python project",
        precheck: None,
    },
    CommandInfo {
        name: "run",
        summary: "Run src/main.py with the project environment",
        precheck: Some(Precheck::EntryPoint),
    },
    CommandInfo {
        name: "test",
        summary: "Run the test suite with pytest",
        precheck: Some(Precheck::TestsDir),
    },
    CommandInfo {
        name: "install",
        summary: "Install requirements.txt into the environment",
        precheck: Some(Precheck::Manifest),
    },
    CommandInfo {
        name: "fmt",
        summary: "Format src/ and tests/ with black and isort",
        precheck: None,
    },
    CommandInfo {
        name: "check",
        summary: "Lint src/ and tests/ with ruff",
        precheck: None,
    },
];

/// Look up a command by name.
pub fn lookup(name: &str) -> Option<&'static CommandInfo> {
    COMMANDS.iter().find(|command| command.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_listed_once() {
        let names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
        assert_eq!(names, ["new", "run", "test", "install", "fmt", "check"]);
    }

    #[test]
    fn lookup_finds_prechecks() {
        assert_eq!(lookup("run").and_then(|c| c.precheck), Some(Precheck::EntryPoint));
        assert_eq!(lookup("fmt").and_then(|c| c.precheck), None);
        assert!(lookup("deploy").is_none());
    }
}
