//! Shared data types for commands and their outcomes.
//!
//! These carry no behavior beyond small accessors; building and running
//! commands lives in [`crate::io`].

use std::path::{Path, PathBuf};

use serde::Serialize;

/// An external command to run: program, arguments, working directory and
/// optional stdin payload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    workdir: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = vec![program.into()];
        argv.extend(args.into_iter().map(Into::into));
        Self {
            argv,
            workdir: None,
            stdin: None,
        }
    }

    pub fn in_dir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn stdin(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }

    /// Shell-like rendering for messages and logs (`git commit -m msg`).
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Captured result of one external process invocation.
///
/// A non-zero `exit_code` is a normal outcome. `exit_code` is `None` when the
/// child was terminated by a signal, including after a timeout kill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutcome {
    /// Outcome of a command that exited on its own.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
            stdout_truncated: 0,
            stderr_truncated: 0,
            timed_out: false,
        }
    }

    /// Outcome of a command that was killed after exceeding its timeout.
    pub fn timeout(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            timed_out: true,
            ..Self::exited(0, stdout, stderr)
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Stderr if the tool wrote any, otherwise stdout. Git reports some
    /// failures (e.g. `nothing to commit`) on stdout only.
    pub fn diagnostic_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim_end()
        } else {
            self.stderr.trim_end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_splits_program_and_args() {
        let spec = CommandSpec::new("git", ["commit", "-m", "first save"]).in_dir("/tmp/demo");
        assert_eq!(spec.program(), "git");
        assert_eq!(spec.args(), ["commit", "-m", "first save"]);
        assert_eq!(spec.workdir(), Some(Path::new("/tmp/demo")));
        assert_eq!(spec.display(), "git commit -m first save");
    }

    #[test]
    fn diagnostic_text_prefers_stderr() {
        let outcome = CommandOutcome::exited(1, "out\n", "err\n");
        assert_eq!(outcome.diagnostic_text(), "err");
        let outcome = CommandOutcome::exited(1, "only stdout\n", "  \n");
        assert_eq!(outcome.diagnostic_text(), "only stdout");
    }

    #[test]
    fn timeout_is_never_success() {
        let outcome = CommandOutcome::timeout("", "");
        assert!(!outcome.success());
        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, None);
    }
}
