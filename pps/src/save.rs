//! `pps save`: stage everything and commit with a message.

use std::path::Path;

use tracing::{debug, instrument};

use crate::core::classifier::{OutcomeClass, StepKind};
use crate::core::report::WorkflowResult;
use crate::error::{StarterError, StarterResult};
use crate::io::process::ProcessRunner;
use crate::workflow::{Workflow, failure_message, require_repository};

pub const NO_CHANGES: &str = "no changes to save";

/// Stage all changes in `dir` and commit them with `message`.
///
/// An empty message is rejected before any command runs. When there is
/// nothing to stage the result holds a single informational entry and no
/// commit is attempted.
#[instrument(skip(workflow, message))]
pub fn save_changes<R: ProcessRunner>(
    workflow: &Workflow<'_, R>,
    dir: &Path,
    message: &str,
) -> StarterResult<WorkflowResult> {
    if message.trim().is_empty() {
        return Err(StarterError::EmptyMessage);
    }
    require_repository(dir)?;
    let git = workflow.git(dir);
    let mut result = WorkflowResult::new();

    let stage = workflow.execute(StepKind::Stage, &git.add_all())?;
    match stage.class {
        OutcomeClass::Failure(failure) => {
            let msg = failure_message("staging changes", &failure);
            result.push("stage", StepKind::Stage, OutcomeClass::Failure(failure), msg);
            return Ok(result);
        }
        OutcomeClass::BenignNoop => {
            result.push("save", StepKind::Stage, OutcomeClass::BenignNoop, NO_CHANGES);
            return Ok(result);
        }
        OutcomeClass::Success => {}
    }

    // `git add` is silent either way; ask git whether anything is staged.
    let pending = workflow.execute(StepKind::PendingCheck, &git.status())?;
    match pending.class {
        OutcomeClass::Failure(failure) => {
            let msg = failure_message("checking for changes", &failure);
            result.push(
                "check",
                StepKind::PendingCheck,
                OutcomeClass::Failure(failure),
                msg,
            );
            return Ok(result);
        }
        OutcomeClass::BenignNoop => {
            result.push("save", StepKind::PendingCheck, OutcomeClass::BenignNoop, NO_CHANGES);
            return Ok(result);
        }
        OutcomeClass::Success => debug!("changes staged"),
    }
    result.push("stage", StepKind::Stage, OutcomeClass::Success, "staged all changes");

    let commit = workflow.execute(StepKind::Commit, &git.commit(message))?;
    let msg = match &commit.class {
        OutcomeClass::Success => format!("saved changes: {message}"),
        OutcomeClass::BenignNoop => NO_CHANGES.to_string(),
        OutcomeClass::Failure(failure) => failure_message("committing changes", failure),
    };
    result.push("commit", StepKind::Commit, commit.class, msg);
    Ok(result)
}
