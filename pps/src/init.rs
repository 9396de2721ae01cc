//! `pps new`: scaffold a project, then set up git and a virtual environment.
//!
//! Only validation and the filesystem build can abort. The tool steps that
//! follow are best-effort: a failure there leaves a usable project and is
//! reported as a warning with a manual follow-up (partial initialization).

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::core::classifier::{OutcomeClass, StepKind};
use crate::core::name::ProjectName;
use crate::core::report::WorkflowResult;
use crate::core::template::Placeholders;
use crate::error::StarterResult;
use crate::io::process::ProcessRunner;
use crate::io::scaffold::{PlannedFile, ProjectPaths, build_tree};
use crate::io::templates::{self, TemplateStore};
use crate::workflow::{Workflow, resolve_dir};

/// Create `<target_dir>/<name>` and initialize it.
///
/// `target_dir` must already exist.
#[instrument(skip(workflow))]
pub fn init_project<R: ProcessRunner>(
    workflow: &Workflow<'_, R>,
    name: &str,
    target_dir: &Path,
) -> StarterResult<WorkflowResult> {
    let name = ProjectName::parse(name)?;
    let target_dir = resolve_dir(target_dir)?;
    let paths = ProjectPaths::new(target_dir.join(name.as_str()), name.package_identifier());

    // Render everything before touching the filesystem so template problems
    // leave no trace.
    let store = workflow.config().templates();
    let plan = plan_files(&store, &name, &paths)?;
    let dirs = [relative(&paths, &paths.package_dir), relative(&paths, &paths.tests_dir)];
    build_tree(&paths.root, &dirs, &plan)?;
    info!(root = %paths.root.display(), "project tree created");

    let mut result = WorkflowResult::new();
    result.push(
        "scaffold",
        StepKind::Scaffold,
        OutcomeClass::Success,
        format!("created project '{name}' at {}", paths.root.display()),
    );

    let git = workflow.git(&paths.root);
    workflow.best_effort(
        &mut result,
        "git init",
        StepKind::RepoInit,
        &git.init(),
        "run 'git init' inside the project yourself",
    );

    let uv = workflow.uv(&paths.root);
    let venv_ok = workflow.best_effort(
        &mut result,
        "create environment",
        StepKind::VenvCreate,
        &uv.venv(),
        "run 'uv venv' inside the project yourself",
    );
    let install = uv.install(&workflow.config().tools.install_args);
    if venv_ok {
        let manual = format!(
            "activate the environment and run '{}' yourself",
            install.display()
        );
        workflow.best_effort(
            &mut result,
            "install dependencies",
            StepKind::InstallDeps,
            &install,
            &manual,
        );
    } else {
        result.warn(format!(
            "skipped '{}' because the environment could not be created",
            install.display()
        ));
    }

    if !result.warnings.is_empty() {
        result.partial = true;
        result.warn(format!(
            "the project exists at {} but needs the manual steps above",
            paths.root.display()
        ));
    }
    result.note(format!(
        "next steps:\n  1. cd {}\n  2. source .venv/bin/activate   (Windows: .venv\\Scripts\\Activate.ps1)\n  3. start coding, then `pps save -m \"first version\"`",
        paths.root.display()
    ));
    Ok(result)
}

/// Rendered files in creation order.
fn plan_files(
    store: &impl TemplateStore,
    name: &ProjectName,
    paths: &ProjectPaths,
) -> StarterResult<Vec<PlannedFile>> {
    let values: Placeholders = [
        ("project_name".to_string(), name.as_str().to_string()),
        ("package_name".to_string(), name.package_identifier().to_string()),
    ]
    .into_iter()
    .collect();

    let targets = [
        (templates::MANIFEST, &paths.manifest_path),
        (templates::README, &paths.readme_path),
        (templates::GITIGNORE, &paths.gitignore_path),
        (templates::PACKAGE_INIT, &paths.package_init_path),
        (templates::TESTS_INIT, &paths.tests_init_path),
    ];
    targets
        .into_iter()
        .map(|(id, path)| -> StarterResult<PlannedFile> {
            let contents = store.render(id, &values)?;
            Ok(PlannedFile::new(relative(paths, path), contents))
        })
        .collect()
}

fn relative(paths: &ProjectPaths, path: &Path) -> PathBuf {
    path.strip_prefix(&paths.root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
