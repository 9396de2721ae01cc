//! Aggregated result of one workflow operation.
//!
//! A [`WorkflowResult`] is built step by step and handed back to the caller,
//! which decides how to present it. Nothing here prints.

use serde::Serialize;

use crate::core::classifier::{OutcomeClass, StepKind};

/// One executed (or skipped) step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub name: String,
    pub kind: StepKind,
    pub outcome: OutcomeClass,
    pub message: String,
    /// The step failed but the operation carried on (best-effort steps).
    pub recovered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    pub steps: Vec<StepReport>,
    pub warnings: Vec<String>,
    /// Free-form notes for the user (next steps, status output).
    pub notes: Vec<String>,
    /// Scaffolding exists but a follow-up step failed and needs manual work.
    pub partial: bool,
}

impl WorkflowResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no step holds an unrecovered failure.
    pub fn success(&self) -> bool {
        !self
            .steps
            .iter()
            .any(|step| step.outcome.is_failure() && !step.recovered)
    }

    pub fn push(
        &mut self,
        name: impl Into<String>,
        kind: StepKind,
        outcome: OutcomeClass,
        message: impl Into<String>,
    ) {
        self.steps.push(StepReport {
            name: name.into(),
            kind,
            outcome,
            message: message.into(),
            recovered: false,
        });
    }

    /// Record a failure that the operation tolerates, turning it into a warning.
    pub fn push_recovered(
        &mut self,
        name: impl Into<String>,
        kind: StepKind,
        outcome: OutcomeClass,
        message: impl Into<String>,
    ) {
        let message = message.into();
        self.warnings.push(message.clone());
        self.steps.push(StepReport {
            name: name.into(),
            kind,
            outcome,
            message,
            recovered: true,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn step(&self, name: &str) -> Option<&StepReport> {
        self.steps.iter().find(|step| step.name == name)
    }
}
