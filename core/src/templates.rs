//! Static file contents written into new projects.

use crate::project::ProjectName;

pub const ENTRY_POINT: &str = "\
def main():
    print('Hello, world!')


if __name__ == '__main__':
    main()
";

/// Tools installed into every new environment.
pub const BASELINE_REQUIREMENTS: [&str; 4] = ["pytest", "black", "isort", "ruff"];

/// Installed alongside the requirements so `new` can install the git hooks.
pub const HOOK_MANAGER: &str = "pre-commit";

pub const PYPROJECT: &str = r#"[tool.black]
line-length = 88

[tool.isort]
profile = "black"

[tool.ruff]
extend-ignore = ["E203", "W503"]
"#;

// black has no tagged release at "stable"; `pre-commit autoupdate` pins it.
pub const PRE_COMMIT_CONFIG: &str = "\
repos:
  - repo: https://github.com/psf/black
    rev: stable
    hooks:
      - id: black

  - repo: https://github.com/PyCQA/isort
    rev: 5.12.0
    hooks:
      - id: isort

  - repo: https://github.com/charliermarsh/ruff-pre-commit
    rev: v0.3.0
    hooks:
      - id: ruff
";

pub fn readme(name: &ProjectName) -> String {
    format!("# {name}\n")
}

pub fn gitignore(env_dir: &str) -> String {
    format!("*.pyc\n__pycache__/\n{env_dir}/\n")
}

pub fn requirements() -> String {
    let mut text = BASELINE_REQUIREMENTS.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_is_a_single_heading() {
        let name = ProjectName::parse("demo").unwrap();
        assert_eq!(readme(&name), "# demo\n");
    }

    #[test]
    fn gitignore_lists_three_patterns() {
        let text = gitignore(".venv");
        assert_eq!(text.lines().collect::<Vec<_>>(), ["*.pyc", "__pycache__/", ".venv/"]);
    }

    #[test]
    fn requirements_one_tool_per_line() {
        assert_eq!(requirements(), "pytest\nblack\nisort\nruff\n");
    }

    #[test]
    fn pre_commit_config_lists_three_hooks() {
        let hooks: Vec<_> = PRE_COMMIT_CONFIG
            .lines()
            .filter_map(|line| line.trim().strip_prefix("- id: "))
            .collect();
        assert_eq!(hooks, ["black", "isort", "ruff"]);
    }
}
