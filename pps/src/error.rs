//! Error taxonomy for workflow operations.
//!
//! Tool failures are *not* errors here: a command that ran and exited non-zero
//! is reported inside a [`WorkflowResult`](crate::core::report::WorkflowResult).
//! `StarterError` covers the cases that abort an operation before or instead of
//! producing a report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

/// Coarse grouping used for exit codes and user-facing prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; no external process was invoked.
    Validation,
    /// The environment is missing something (tool not installed, bad config).
    Setup,
    /// Scaffolding could not be written.
    Filesystem,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Validation => exit_codes::INVALID,
            ErrorKind::Setup => exit_codes::SETUP,
            ErrorKind::Filesystem => exit_codes::FILESYSTEM,
        }
    }
}

#[derive(Debug, Error)]
pub enum StarterError {
    #[error("invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("a save message is required (use -m \"describe your changes\")")]
    EmptyMessage,

    #[error("target directory does not exist: {}", .0.display())]
    TargetDirMissing(PathBuf),

    #[error("no git repository found at {} (are you inside the project directory?)", .0.display())]
    NotARepository(PathBuf),

    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("template '{template}' is missing values for: {}", .names.join(", "))]
    MissingPlaceholder {
        template: String,
        names: Vec<String>,
    },

    #[error("{} already exists and is not an empty directory", .0.display())]
    TargetAlreadyExists(PathBuf),

    /// A write failed part way through scaffolding. Paths in `created` were
    /// left on disk.
    #[error("failed to create {}: {source}; {}", .path.display(), created_note(.created))]
    PartialTree {
        path: PathBuf,
        created: Vec<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("cannot resolve directory {}: {source}", .path.display())]
    ResolveDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' is not installed or not on PATH")]
    ExecutableNotFound { program: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StarterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StarterError::InvalidName { .. }
            | StarterError::EmptyMessage
            | StarterError::TargetDirMissing(_)
            | StarterError::NotARepository(_) => ErrorKind::Validation,
            StarterError::TemplateNotFound(_)
            | StarterError::MissingPlaceholder { .. }
            | StarterError::TargetAlreadyExists(_)
            | StarterError::PartialTree { .. }
            | StarterError::ResolveDir { .. } => ErrorKind::Filesystem,
            StarterError::ExecutableNotFound { .. } | StarterError::Other(_) => ErrorKind::Setup,
        }
    }
}

fn created_note(created: &[PathBuf]) -> String {
    if created.is_empty() {
        return "nothing was created".to_string();
    }
    let paths: Vec<String> = created.iter().map(|p| p.display().to_string()).collect();
    format!("left on disk: {}", paths.join(", "))
}

pub type StarterResult<T> = std::result::Result<T, StarterError>;
