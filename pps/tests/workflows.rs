//! Workflow-level tests for the four verbs.
//!
//! Each test drives a verb against a real temporary directory with a
//! `ScriptedRunner` standing in for git and uv, then checks the aggregated
//! result, the commands that were issued, and what ended up on disk.

use std::fs;
use std::path::Path;

use pps::core::classifier::{FailureKind, OutcomeClass};
use pps::core::types::CommandOutcome;
use pps::error::{ErrorKind, StarterError};
use pps::init::init_project;
use pps::io::config::StarterConfig;
use pps::save::{NO_CHANGES, save_changes};
use pps::status::project_status;
use pps::sync::sync_changes;
use pps::test_support::{ScriptedRunner, ScriptedStep};
use pps::workflow::Workflow;

fn tools_ok() -> Vec<ScriptedStep> {
    vec![
        ScriptedStep::ok("Initialized empty Git repository\n"),
        ScriptedStep::ok("Creating virtual environment at: .venv\n"),
        ScriptedStep::ok("Installed 1 package\n"),
    ]
}

fn fake_repo() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(temp.path().join(".git")).expect("fake .git");
    temp
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).expect("read dir").count()
}

/// `new sample_app` in an empty directory: full tree, manifest carries the
/// name, and the three tool steps run inside the new project in order.
#[test]
fn init_creates_tree_and_runs_tools_in_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(tools_ok());
    let config = StarterConfig::default();

    let result =
        init_project(&Workflow::new(&runner, &config), "sample_app", temp.path()).expect("init");

    assert!(result.success());
    assert!(!result.partial);
    assert!(result.warnings.is_empty());

    let root = temp.path().canonicalize().expect("canon").join("sample_app");
    assert!(root.join("src/sample_app/__init__.py").is_file());
    assert!(root.join("tests/__init__.py").is_file());
    assert!(root.join("README.md").is_file());
    assert!(root.join(".gitignore").is_file());
    let manifest = fs::read_to_string(root.join("pyproject.toml")).expect("manifest");
    assert!(manifest.contains("name = \"sample_app\""));
    assert!(!manifest.contains("{{"));

    assert_eq!(
        runner.call_lines(),
        vec!["git init", "uv venv", "uv pip install -e .[dev]"]
    );
    for call in runner.calls() {
        assert_eq!(call.workdir(), Some(root.as_path()));
    }
    runner.assert_drained().expect("drained");
}

#[test]
fn valid_names_map_to_package_directories() {
    for name in ["a", "_private", "data_tool2", "x_1_y"] {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = ScriptedRunner::new(tools_ok());
        let config = StarterConfig::default();

        let result =
            init_project(&Workflow::new(&runner, &config), name, temp.path()).expect("init");

        assert!(result.success(), "{name}");
        assert!(
            temp.path().join(name).join("src").join(name).is_dir(),
            "{name}"
        );
    }
}

/// Rejected names never touch the filesystem and never run a tool.
#[test]
fn invalid_names_leave_no_trace() {
    for name in ["", "1abc", "Abc", "a b", "my-project", "a.b"] {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = ScriptedRunner::new(Vec::new());
        let config = StarterConfig::default();

        let err = init_project(&Workflow::new(&runner, &config), name, temp.path())
            .expect_err("invalid name");

        assert!(
            matches!(err, StarterError::InvalidName { .. }),
            "{name}: {err}"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(entries(temp.path()), 0, "{name}");
        assert!(runner.calls().is_empty(), "{name}");
    }
}

#[test]
fn second_init_refuses_and_keeps_first_tree() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = StarterConfig::default();

    let first = ScriptedRunner::new(tools_ok());
    init_project(&Workflow::new(&first, &config), "demo", temp.path()).expect("first init");
    let readme = temp.path().join("demo/README.md");
    fs::write(&readme, "edited by hand\n").expect("edit");

    let second = ScriptedRunner::new(Vec::new());
    let err = init_project(&Workflow::new(&second, &config), "demo", temp.path())
        .expect_err("second init");

    assert!(matches!(err, StarterError::TargetAlreadyExists(_)));
    assert_eq!(err.kind(), ErrorKind::Filesystem);
    assert_eq!(
        fs::read_to_string(&readme).expect("readme"),
        "edited by hand\n"
    );
    assert!(second.calls().is_empty());
}

#[test]
fn missing_target_dir_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(Vec::new());
    let config = StarterConfig::default();

    let err = init_project(
        &Workflow::new(&runner, &config),
        "demo",
        &temp.path().join("nowhere"),
    )
    .expect_err("missing dir");

    assert!(matches!(err, StarterError::TargetDirMissing(_)));
    assert!(!temp.path().join("nowhere").exists());
}

/// Without git the scaffold still succeeds; the result is partial and tells
/// the user what to run by hand.
#[test]
fn init_without_git_is_partial_but_successful() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(vec![
        ScriptedStep::Missing,
        ScriptedStep::ok(""),
        ScriptedStep::ok(""),
    ]);
    let config = StarterConfig::default();

    let result =
        init_project(&Workflow::new(&runner, &config), "demo", temp.path()).expect("init");

    assert!(result.success());
    assert!(result.partial);
    let git_step = result.step("git init").expect("git init step");
    assert!(git_step.recovered);
    assert_eq!(
        git_step.outcome.failure().map(|f| f.kind),
        Some(FailureKind::ExecutableNotFound)
    );
    assert!(result.warnings.iter().any(|w| w.contains("git init")));
    assert!(temp.path().join("demo/pyproject.toml").is_file());
    assert_eq!(runner.call_lines().len(), 3);
}

#[test]
fn save_rejects_blank_message_before_running_anything() {
    let temp = fake_repo();
    let runner = ScriptedRunner::new(Vec::new());
    let config = StarterConfig::default();

    for message in ["", "   ", "\n\t"] {
        let err = save_changes(&Workflow::new(&runner, &config), temp.path(), message)
            .expect_err("blank message");
        assert!(matches!(err, StarterError::EmptyMessage));
    }
    assert!(runner.calls().is_empty());
}

#[test]
fn save_with_clean_tree_reports_no_changes_without_commit() {
    let temp = fake_repo();
    let runner = ScriptedRunner::new(vec![ScriptedStep::ok(
        "On branch main\nnothing to commit, working tree clean\n",
    )]);
    let config = StarterConfig::default();

    let result =
        save_changes(&Workflow::new(&runner, &config), temp.path(), "tweak").expect("save");

    assert!(result.success());
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].outcome, OutcomeClass::BenignNoop);
    assert_eq!(result.steps[0].message, NO_CHANGES);
    assert_eq!(runner.call_lines(), vec!["git add -A"]);
}

#[test]
fn save_detects_clean_tree_after_silent_add() {
    let temp = fake_repo();
    let runner = ScriptedRunner::new(vec![
        ScriptedStep::ok(""),
        ScriptedStep::ok("On branch main\nnothing to commit, working tree clean\n"),
    ]);
    let config = StarterConfig::default();

    let result =
        save_changes(&Workflow::new(&runner, &config), temp.path(), "tweak").expect("save");

    assert!(result.success());
    assert_eq!(result.step("save").expect("save").message, NO_CHANGES);
    assert_eq!(runner.call_lines(), vec!["git add -A", "git status"]);
}

#[test]
fn save_commits_staged_changes() {
    let temp = fake_repo();
    let runner = ScriptedRunner::new(vec![
        ScriptedStep::ok(""),
        ScriptedStep::ok("On branch main\nChanges to be committed:\n\tmodified:   app.py\n"),
        ScriptedStep::ok("[main 1a2b3c4] first save\n 1 file changed\n"),
    ]);
    let config = StarterConfig::default();

    let result =
        save_changes(&Workflow::new(&runner, &config), temp.path(), "first save").expect("save");

    assert!(result.success());
    assert_eq!(result.step("commit").expect("commit").outcome, OutcomeClass::Success);
    let commit = runner.calls().pop().expect("commit call");
    assert_eq!(commit.args(), ["commit", "-m", "first save"]);
    runner.assert_drained().expect("drained");
}

#[test]
fn save_outside_repository_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(Vec::new());
    let config = StarterConfig::default();

    let err = save_changes(&Workflow::new(&runner, &config), temp.path(), "msg")
        .expect_err("no repo");

    assert!(matches!(err, StarterError::NotARepository(_)));
    assert!(runner.calls().is_empty());
}

/// Push without an upstream fails with the remote-setup hint and keeps the
/// raw git output.
#[test]
fn sync_push_without_upstream_needs_upstream() {
    let temp = fake_repo();
    let stderr = "fatal: The current branch main has no upstream branch.\n";
    let runner = ScriptedRunner::new(vec![
        ScriptedStep::ok("Already up to date.\n"),
        ScriptedStep::fail(128, stderr),
    ]);
    let config = StarterConfig::default();

    let result = sync_changes(&Workflow::new(&runner, &config), temp.path()).expect("sync");

    assert!(!result.success());
    let push = result.step("push").expect("push step");
    let failure = push.outcome.failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::NeedsUpstream);
    assert_eq!(failure.exit_code, Some(128));
    assert_eq!(failure.output, stderr.trim());
    let hint = FailureKind::NeedsUpstream.hint().expect("hint");
    assert!(push.message.contains(hint));
    assert_eq!(runner.call_lines(), vec!["git pull", "git push"]);
}

#[test]
fn sync_timeout_is_reported_as_failure() {
    let temp = fake_repo();
    let runner = ScriptedRunner::new(vec![ScriptedStep::outcome(CommandOutcome::timeout(
        "", "",
    ))]);
    let config = StarterConfig::default();

    let result = sync_changes(&Workflow::new(&runner, &config), temp.path()).expect("sync");

    assert!(!result.success());
    assert_eq!(
        result
            .step("pull")
            .and_then(|s| s.outcome.failure())
            .map(|f| f.kind),
        Some(FailureKind::TimedOut)
    );
}

#[test]
fn status_passes_git_output_through() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = "On branch main\nChanges not staged for commit:\n\tmodified:   app.py\n";
    let runner = ScriptedRunner::new(vec![ScriptedStep::ok(output)]);
    let config = StarterConfig::default();

    let result = project_status(&Workflow::new(&runner, &config), temp.path()).expect("status");

    assert!(result.success());
    assert_eq!(result.notes, vec![output.trim_end().to_string()]);
    // Empty directory: every layout check fails, as warnings only.
    assert_eq!(result.warnings.len(), 3);
}

#[test]
fn status_failure_fails_the_result() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(vec![ScriptedStep::fail(
        128,
        "fatal: not a git repository (or any of the parent directories): .git\n",
    )]);
    let config = StarterConfig::default();

    let result = project_status(&Workflow::new(&runner, &config), temp.path()).expect("status");

    assert!(!result.success());
    assert!(result.notes.is_empty());
}
