//! Command builders for the version-control and environment tools.
//!
//! These only describe commands; running them is the job of a
//! [`ProcessRunner`](crate::io::process::ProcessRunner).

use std::path::PathBuf;

use crate::core::types::CommandSpec;

/// `git` invocations rooted at a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    workdir: PathBuf,
}

impl Git {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    pub fn init(&self) -> CommandSpec {
        self.command(["init"])
    }

    /// Stage all changes (respects .gitignore).
    pub fn add_all(&self) -> CommandSpec {
        self.command(["add", "-A"])
    }

    /// Human-readable status; says "nothing to commit" when there is nothing
    /// staged or modified.
    pub fn status(&self) -> CommandSpec {
        self.command(["status"])
    }

    pub fn commit(&self, message: &str) -> CommandSpec {
        self.command(["commit", "-m", message])
    }

    pub fn pull(&self) -> CommandSpec {
        self.command(["pull"])
    }

    pub fn push(&self) -> CommandSpec {
        self.command(["push"])
    }

    fn command<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> CommandSpec {
        CommandSpec::new(self.program.as_str(), args).in_dir(&self.workdir)
    }
}

/// `uv` invocations rooted at a project directory.
#[derive(Debug, Clone)]
pub struct Uv {
    program: String,
    workdir: PathBuf,
}

impl Uv {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    /// Create `.venv/` in the project.
    pub fn venv(&self) -> CommandSpec {
        CommandSpec::new(self.program.as_str(), ["venv"]).in_dir(&self.workdir)
    }

    /// Install the project with the given `uv` arguments
    /// (by default `pip install -e .[dev]`).
    pub fn install(&self, args: &[String]) -> CommandSpec {
        CommandSpec::new(self.program.as_str(), args.iter().cloned()).in_dir(&self.workdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn commit_keeps_message_as_single_argument() {
        let git = Git::new("git", "/work/demo");
        let spec = git.commit("fix the \"quote\" bug; rm -rf nothing");
        assert_eq!(spec.program(), "git");
        assert_eq!(
            spec.args(),
            ["commit", "-m", "fix the \"quote\" bug; rm -rf nothing"]
        );
        assert_eq!(spec.workdir(), Some(Path::new("/work/demo")));
    }

    #[test]
    fn configured_program_is_used() {
        let git = Git::new("/usr/local/bin/git", "/work/demo");
        assert_eq!(git.add_all().program(), "/usr/local/bin/git");
        assert_eq!(git.add_all().args(), ["add", "-A"]);
    }

    #[test]
    fn uv_install_uses_configured_args() {
        let uv = Uv::new("uv", "/work/demo");
        let args = vec!["sync".to_string()];
        assert_eq!(uv.install(&args).args(), ["sync"]);
        assert_eq!(uv.venv().args(), ["venv"]);
    }
}
