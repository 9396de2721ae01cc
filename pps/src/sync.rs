//! `pps sync`: pull remote changes, then push local ones.

use std::path::Path;

use tracing::instrument;

use crate::core::classifier::{OutcomeClass, StepKind};
use crate::core::report::WorkflowResult;
use crate::error::StarterResult;
use crate::io::process::ProcessRunner;
use crate::workflow::{Workflow, failure_message, require_repository};

/// Pull then push in `dir`. A failed pull stops before pushing.
///
/// Conflicts are reported, never resolved.
#[instrument(skip(workflow))]
pub fn sync_changes<R: ProcessRunner>(
    workflow: &Workflow<'_, R>,
    dir: &Path,
) -> StarterResult<WorkflowResult> {
    require_repository(dir)?;
    let git = workflow.git(dir);
    let mut result = WorkflowResult::new();

    let pull = workflow.execute(StepKind::Pull, &git.pull())?;
    let msg = match &pull.class {
        OutcomeClass::Success => "pulled remote changes".to_string(),
        OutcomeClass::BenignNoop => "already up to date with the remote".to_string(),
        OutcomeClass::Failure(failure) => failure_message("pulling from the remote", failure),
    };
    let pulled = !pull.class.is_failure();
    result.push("pull", StepKind::Pull, pull.class, msg);
    if !pulled {
        return Ok(result);
    }

    let push = workflow.execute(StepKind::Push, &git.push())?;
    let msg = match &push.class {
        OutcomeClass::Success => "pushed local changes".to_string(),
        OutcomeClass::BenignNoop => "nothing to push".to_string(),
        OutcomeClass::Failure(failure) => failure_message("pushing to the remote", failure),
    };
    result.push("push", StepKind::Push, push.class, msg);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::FailureKind;
    use crate::io::config::StarterConfig;
    use crate::test_support::{ScriptedRunner, ScriptedStep};

    fn repo() -> tempfile::TempDir {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(temp.path().join(".git")).expect("fake .git");
        temp
    }

    #[test]
    fn pull_failure_skips_push() {
        let temp = repo();
        let runner = ScriptedRunner::new(vec![ScriptedStep::outcome(
            crate::core::types::CommandOutcome::exited(
                1,
                "CONFLICT (content): Merge conflict in app.py\nAutomatic merge failed; fix conflicts and then commit the result.\n",
                "",
            ),
        )]);
        let config = StarterConfig::default();

        let result = sync_changes(&Workflow::new(&runner, &config), temp.path()).expect("sync");

        assert!(!result.success());
        assert_eq!(result.steps.len(), 1);
        let pull = result.step("pull").expect("pull");
        assert_eq!(
            pull.outcome.failure().map(|f| f.kind),
            Some(FailureKind::Conflict)
        );
        assert!(pull.message.contains("conflict"));
        assert_eq!(runner.call_lines(), vec!["git pull"]);
    }

    #[test]
    fn up_to_date_both_ways_is_noop() {
        let temp = repo();
        let runner = ScriptedRunner::new(vec![
            ScriptedStep::ok("Already up to date.\n"),
            ScriptedStep::outcome(crate::core::types::CommandOutcome::exited(
                0,
                "",
                "Everything up-to-date\n",
            )),
        ]);
        let config = StarterConfig::default();

        let result = sync_changes(&Workflow::new(&runner, &config), temp.path()).expect("sync");

        assert!(result.success());
        assert!(
            result
                .steps
                .iter()
                .all(|s| s.outcome == OutcomeClass::BenignNoop)
        );
        assert_eq!(result.step("push").expect("push").message, "nothing to push");
    }
}
