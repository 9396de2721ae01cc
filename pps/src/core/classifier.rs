//! Deterministic classification of tool output.
//!
//! Maps a [`CommandOutcome`] and the kind of step that produced it to an
//! [`OutcomeClass`]. All knowledge of git's wording lives in [`PatternTable`]
//! so it can be extended (e.g. for another locale) without touching the
//! workflows.
//!
//! Patterns are matched as case-insensitive substrings against stdout and
//! stderr. They track English output of current git releases; other locales
//! or future wordings fall through to a generic failure or plain success.

use serde::Serialize;

use crate::core::types::CommandOutcome;

/// The workflow step that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Writing the project tree; not a command, never classified.
    Scaffold,
    RepoInit,
    VenvCreate,
    InstallDeps,
    Stage,
    PendingCheck,
    Commit,
    Pull,
    Push,
    Status,
}

impl StepKind {
    /// Steps whose successful output may mean "nothing to do".
    pub fn can_noop(self) -> bool {
        matches!(
            self,
            StepKind::Stage
                | StepKind::PendingCheck
                | StepKind::Commit
                | StepKind::Pull
                | StepKind::Push
        )
    }
}

/// Semantic bucket for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    /// Exit 0, but the tool reported there was nothing to do.
    BenignNoop,
    Failure(ToolFailure),
}

impl OutcomeClass {
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeClass::Failure(_))
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            OutcomeClass::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The branch has no remote counterpart (or there is no remote at all).
    NeedsUpstream,
    /// A pull stopped on merge conflicts.
    Conflict,
    /// The working directory is not inside a git repository.
    NotARepository,
    TimedOut,
    /// The tool could not be started at all. Never produced by
    /// [`Classifier::classify`]; recorded by workflows for best-effort steps.
    ExecutableNotFound,
    /// Anything the table does not recognize.
    Generic,
}

impl FailureKind {
    pub fn hint(self) -> Option<&'static str> {
        match self {
            FailureKind::NeedsUpstream => Some(
                "no remote branch is configured. Add a remote with \
                 `git remote add origin <url>`, then publish this branch once with \
                 `git push -u origin <branch>`; after that `pps sync` works on its own.",
            ),
            FailureKind::Conflict => Some(
                "the remote has changes that conflict with yours. Edit the files \
                 git lists as conflicted, then run `pps save -m \"resolve conflicts\"` \
                 and `pps sync` again.",
            ),
            FailureKind::NotARepository => {
                Some("run this command from inside your project directory (or pass --dir).")
            }
            FailureKind::TimedOut => {
                Some("the command did not finish in time; check your network and try again.")
            }
            FailureKind::ExecutableNotFound => {
                Some("install the tool (or set its path in .pps.toml) and run the step by hand.")
            }
            FailureKind::Generic => None,
        }
    }
}

/// A failed step, with the tool's own words kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub kind: FailureKind,
    pub exit_code: Option<i32>,
    pub output: String,
}

impl ToolFailure {
    pub fn hint(&self) -> Option<&'static str> {
        self.kind.hint()
    }
}

/// Substring patterns (matched lowercase) for each recognized situation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    pub benign: Vec<String>,
    pub needs_upstream: Vec<String>,
    pub conflict: Vec<String>,
    pub not_repository: Vec<String>,
}

impl Default for PatternTable {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            benign: owned(&[
                "nothing to commit",
                "working tree clean",
                "no changes added to commit",
                "already up to date",
                "already up-to-date",
                "everything up-to-date",
            ]),
            needs_upstream: owned(&[
                "no upstream branch",
                "has no upstream branch",
                "no tracking information",
                "no configured push destination",
                "does not appear to be a git repository",
            ]),
            conflict: owned(&["automatic merge failed", "conflict"]),
            not_repository: owned(&["not a git repository"]),
        }
    }
}

impl PatternTable {
    /// Append extra patterns (stored lowercase) to the defaults.
    pub fn extend(&mut self, benign: &[String], needs_upstream: &[String]) {
        self.benign.extend(benign.iter().map(|p| p.to_lowercase()));
        self.needs_upstream
            .extend(needs_upstream.iter().map(|p| p.to_lowercase()));
    }
}

/// Pattern-table driven classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    table: PatternTable,
}

impl Classifier {
    pub fn new(table: PatternTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, step: StepKind, outcome: &CommandOutcome) -> OutcomeClass {
        if outcome.timed_out {
            return failure(FailureKind::TimedOut, outcome);
        }
        let text = format!("{}\n{}", outcome.stdout, outcome.stderr).to_lowercase();

        if outcome.exit_code == Some(0) {
            if step.can_noop() && matches_any(&text, &self.table.benign) {
                return OutcomeClass::BenignNoop;
            }
            return OutcomeClass::Success;
        }

        if step == StepKind::Status {
            return failure(FailureKind::Generic, outcome);
        }
        // Not-a-repository and upstream both mention "git repository"; the
        // upstream wording is more specific, so it wins.
        let kind = if matches_any(&text, &self.table.needs_upstream) {
            FailureKind::NeedsUpstream
        } else if matches_any(&text, &self.table.not_repository) {
            FailureKind::NotARepository
        } else if step == StepKind::Pull && matches_any(&text, &self.table.conflict) {
            FailureKind::Conflict
        } else {
            FailureKind::Generic
        };
        failure(kind, outcome)
    }
}

fn matches_any(haystack: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|p| !p.is_empty() && haystack.contains(p.as_str()))
}

fn failure(kind: FailureKind, outcome: &CommandOutcome) -> OutcomeClass {
    OutcomeClass::Failure(ToolFailure {
        kind,
        exit_code: outcome.exit_code,
        output: outcome.diagnostic_text().to_string(),
    })
}
