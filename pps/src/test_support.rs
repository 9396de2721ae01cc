//! Test-only helpers: a scripted process runner that replays canned outcomes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::types::{CommandOutcome, CommandSpec};
use crate::io::process::{ProcessRunner, RunError};

/// One queued response.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    Outcome(CommandOutcome),
    /// Behave as if the program is not installed.
    Missing,
}

impl ScriptedStep {
    pub fn outcome(outcome: CommandOutcome) -> Self {
        ScriptedStep::Outcome(outcome)
    }

    /// Exit 0 with the given stdout.
    pub fn ok(stdout: &str) -> Self {
        ScriptedStep::Outcome(CommandOutcome::exited(0, stdout, ""))
    }

    /// Exit `code` with the given stderr.
    pub fn fail(code: i32, stderr: &str) -> Self {
        ScriptedStep::Outcome(CommandOutcome::exited(code, "", stderr))
    }
}

/// Replays queued responses in order and records every command it was asked
/// to run. Running past the end of the queue panics.
pub struct ScriptedRunner {
    queue: RefCell<VecDeque<ScriptedStep>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new(steps: Vec<ScriptedStep>) -> Self {
        Self {
            queue: RefCell::new(steps.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// `program arg...` of each command run so far.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::display).collect()
    }

    pub fn assert_drained(&self) -> Result<()> {
        let remaining = self.queue.borrow().len();
        if remaining > 0 {
            return Err(anyhow!("{remaining} scripted step(s) were never used"));
        }
        Ok(())
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(
        &self,
        spec: &CommandSpec,
        _timeout: Option<Duration>,
    ) -> std::result::Result<CommandOutcome, RunError> {
        self.calls.borrow_mut().push(spec.clone());
        let step = self
            .queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {}", spec.display()));
        match step {
            ScriptedStep::Outcome(outcome) => Ok(outcome),
            ScriptedStep::Missing => Err(RunError::ExecutableNotFound {
                program: spec.program().to_string(),
            }),
        }
    }
}
