//! `pps status`: show `git status` verbatim and check the project layout.

use std::path::Path;

use tracing::instrument;

use crate::core::classifier::{OutcomeClass, StepKind};
use crate::core::report::WorkflowResult;
use crate::error::StarterResult;
use crate::io::process::ProcessRunner;
use crate::io::scaffold::{ESSENTIAL_FILES, ProjectPaths, SRC_DIR, TESTS_DIR};
use crate::workflow::{Workflow, resolve_dir};

/// Report repository status for `dir`.
///
/// The git output is passed through untouched as a note. Layout problems are
/// warnings only; the result fails only when `git status` itself fails.
#[instrument(skip(workflow))]
pub fn project_status<R: ProcessRunner>(
    workflow: &Workflow<'_, R>,
    dir: &Path,
) -> StarterResult<WorkflowResult> {
    let dir = resolve_dir(dir)?;
    let git = workflow.git(&dir);
    let mut result = WorkflowResult::new();

    let status = workflow.execute(StepKind::Status, &git.status())?;
    match status.class {
        OutcomeClass::Failure(failure) => {
            result.push(
                "status",
                StepKind::Status,
                OutcomeClass::Failure(failure),
                "git status failed (is this a git repository?)",
            );
        }
        class => {
            result.note(status.outcome.stdout.trim_end().to_string());
            result.push("status", StepKind::Status, class, "repository status");
        }
    }

    for problem in layout_problems(&dir) {
        result.warn(problem);
    }
    Ok(result)
}

/// Missing pieces of the standard layout. The package directory is expected
/// to be named after the project directory.
pub fn layout_problems(dir: &Path) -> Vec<String> {
    let package = dir
        .file_name()
        .map(|name| name.to_string_lossy().replace('-', "_").to_lowercase())
        .unwrap_or_default();
    let paths = ProjectPaths::new(dir, &package);
    let mut problems = Vec::new();

    if !paths.src_dir.is_dir() {
        problems.push(format!("missing source directory ({SRC_DIR}/)"));
    } else if !paths.package_dir.is_dir() {
        problems.push(format!("missing package directory ({SRC_DIR}/{package}/)"));
    }
    if !paths.tests_dir.is_dir() {
        problems.push(format!("missing tests directory ({TESTS_DIR}/)"));
    }
    let missing: Vec<&str> = ESSENTIAL_FILES
        .into_iter()
        .filter(|file| !dir.join(file).exists())
        .collect();
    if !missing.is_empty() {
        problems.push(format!("missing essential files: {}", missing.join(", ")));
    }
    problems
}
