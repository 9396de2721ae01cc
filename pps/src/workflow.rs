//! Shared plumbing for the workflow verbs ([`init`](crate::init),
//! [`save`](crate::save), [`sync`](crate::sync), [`status`](crate::status)).
//!
//! A [`Workflow`] bundles the process runner, configuration and classifier.
//! Each verb runs its steps strictly in sequence through [`Workflow::execute`].

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::core::classifier::{Classifier, FailureKind, OutcomeClass, StepKind, ToolFailure};
use crate::core::report::WorkflowResult;
use crate::core::types::{CommandOutcome, CommandSpec};
use crate::error::{StarterError, StarterResult};
use crate::io::config::StarterConfig;
use crate::io::git::{Git, Uv};
use crate::io::process::{ProcessRunner, RunError};

impl From<RunError> for StarterError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::ExecutableNotFound { program } => StarterError::ExecutableNotFound { program },
            RunError::Io { command, source } => {
                StarterError::Other(source.context(format!("run {command}")))
            }
        }
    }
}

/// One command run together with its classification.
#[derive(Debug, Clone)]
pub struct Executed {
    pub outcome: CommandOutcome,
    pub class: OutcomeClass,
}

/// Runner, configuration and classifier shared by every step of a verb.
pub struct Workflow<'a, R: ProcessRunner> {
    runner: &'a R,
    config: &'a StarterConfig,
    classifier: Classifier,
}

impl<'a, R: ProcessRunner> Workflow<'a, R> {
    pub fn new(runner: &'a R, config: &'a StarterConfig) -> Self {
        Self {
            runner,
            config,
            classifier: config.classifier(),
        }
    }

    pub fn config(&self) -> &StarterConfig {
        self.config
    }

    pub fn git(&self, workdir: &Path) -> Git {
        Git::new(self.config.tools.git.as_str(), workdir)
    }

    pub fn uv(&self, workdir: &Path) -> Uv {
        Uv::new(self.config.tools.uv.as_str(), workdir)
    }

    /// Run one command and classify its outcome. Never retries.
    #[instrument(skip_all, fields(step = ?kind, command = %spec.display()))]
    pub fn execute(&self, kind: StepKind, spec: &CommandSpec) -> Result<Executed, RunError> {
        info!("running step");
        let outcome = self
            .runner
            .run(spec, Some(self.config.command_timeout()))?;
        let class = self.classifier.classify(kind, &outcome);
        match &class {
            OutcomeClass::Failure(failure) => {
                warn!(kind = ?failure.kind, exit_code = ?failure.exit_code, "step failed");
            }
            other => debug!(class = ?other, "step finished"),
        }
        Ok(Executed { outcome, class })
    }

    /// Run a step whose failure must not abort the operation.
    ///
    /// Failures (including a missing executable) are recorded as recovered
    /// warnings carrying `manual` as the follow-up instruction. Returns true
    /// when the step did not fail.
    pub fn best_effort(
        &self,
        result: &mut WorkflowResult,
        name: &str,
        kind: StepKind,
        spec: &CommandSpec,
        manual: &str,
    ) -> bool {
        let class = match self.execute(kind, spec) {
            Ok(executed) => executed.class,
            Err(RunError::ExecutableNotFound { program }) => OutcomeClass::Failure(ToolFailure {
                kind: FailureKind::ExecutableNotFound,
                exit_code: None,
                output: format!("'{program}' is not installed or not on PATH"),
            }),
            Err(RunError::Io { command, source }) => OutcomeClass::Failure(ToolFailure {
                kind: FailureKind::Generic,
                exit_code: None,
                output: format!("{:#}", source.context(format!("run {command}"))),
            }),
        };
        if class.is_failure() {
            result.push_recovered(name, kind, class, format!("{name} failed; {manual}"));
            return false;
        }
        result.push(name, kind, class, format!("{} completed", spec.display()));
        true
    }
}

/// Message for a failed essential step: the label plus the remediation hint
/// when one is known.
pub fn failure_message(label: &str, failure: &ToolFailure) -> String {
    match failure.hint() {
        Some(hint) => format!("{label} failed: {hint}"),
        None => format!("{label} failed"),
    }
}

/// Save and sync operate on an existing repository in `dir`.
pub fn require_repository(dir: &Path) -> StarterResult<()> {
    if dir.join(".git").exists() {
        Ok(())
    } else {
        Err(StarterError::NotARepository(dir.to_path_buf()))
    }
}

/// Resolve a user-supplied directory, failing if it is not a directory.
pub fn resolve_dir(dir: &Path) -> StarterResult<std::path::PathBuf> {
    if !dir.is_dir() {
        return Err(StarterError::TargetDirMissing(dir.to_path_buf()));
    }
    dir.canonicalize().map_err(|source| StarterError::ResolveDir {
        path: dir.to_path_buf(),
        source,
    })
}
