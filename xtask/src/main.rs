use clap::{Parser, ValueEnum};
use std::process::{Command, ExitCode};

#[derive(Debug, Parser)]
#[command(about = "Utility tasks for developing pycargo")]
struct Xtask {
    /// Task to run; lists the tasks when omitted.
    task: Option<Task>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Task {
    /// cargo fmt --all
    Format,
    /// cargo build --workspace
    Build,
    /// cargo clippy --workspace --all-targets -- -D warnings
    Check,
    /// cargo test --workspace
    Test,
}

impl Task {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Task::Format => &["fmt", "--all"],
            Task::Build => &["build", "--workspace"],
            Task::Check => &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            Task::Test => &["test", "--workspace"],
        }
    }
}

fn main() -> ExitCode {
    let cli = Xtask::parse();

    let Some(task) = cli.task else {
        println!("Available tasks: format, build, check, test.");
        return ExitCode::SUCCESS;
    };

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    println!("Running `{} {}`", cargo, task.cargo_args().join(" "));

    match Command::new(&cargo).args(task.cargo_args()).status() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(status) => {
            eprintln!("Task {:?} failed with {}", task, status);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Failed to launch {cargo}: {err}");
            ExitCode::FAILURE
        }
    }
}
