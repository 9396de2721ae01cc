//! Filesystem builder for new project trees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{StarterError, StarterResult};

pub const SRC_DIR: &str = "src";
pub const TESTS_DIR: &str = "tests";
pub const MANIFEST_FILE: &str = "pyproject.toml";
pub const README_FILE: &str = "README.md";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const ESSENTIAL_FILES: [&str; 3] = [MANIFEST_FILE, README_FILE, GITIGNORE_FILE];

/// Canonical paths within a project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub src_dir: PathBuf,
    pub package_dir: PathBuf,
    pub tests_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub readme_path: PathBuf,
    pub gitignore_path: PathBuf,
    pub package_init_path: PathBuf,
    pub tests_init_path: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, package: &str) -> Self {
        let root = root.into();
        let src_dir = root.join(SRC_DIR);
        let package_dir = src_dir.join(package);
        let tests_dir = root.join(TESTS_DIR);
        Self {
            root: root.clone(),
            src_dir: src_dir.clone(),
            package_dir: package_dir.clone(),
            tests_dir: tests_dir.clone(),
            manifest_path: root.join(MANIFEST_FILE),
            readme_path: root.join(README_FILE),
            gitignore_path: root.join(GITIGNORE_FILE),
            package_init_path: package_dir.join("__init__.py"),
            tests_init_path: tests_dir.join("__init__.py"),
        }
    }
}

/// A file to materialize, relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl PlannedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Fail unless `root` is absent or an empty directory.
pub fn ensure_vacant(root: &Path) -> StarterResult<()> {
    match fs::read_dir(root) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                return Err(StarterError::TargetAlreadyExists(root.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        // Exists but is not a readable directory (typically a plain file).
        Err(_) => Err(StarterError::TargetAlreadyExists(root.to_path_buf())),
    }
}

/// Create `root`, then `dirs`, then `files` in the given order.
///
/// Refuses to touch a `root` that already exists as a file or a non-empty
/// directory. Stops at the first failure without rolling back: the returned
/// [`StarterError::PartialTree`] lists every path created so far. On success
/// returns the created paths in creation order.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn build_tree(
    root: &Path,
    dirs: &[PathBuf],
    files: &[PlannedFile],
) -> StarterResult<Vec<PathBuf>> {
    ensure_vacant(root)?;

    let mut created = Vec::new();
    create_dir(root, &mut created)?;
    for dir in dirs {
        create_dir(&root.join(dir), &mut created)?;
    }
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            create_dir(parent, &mut created)?;
        }
        if let Err(source) = fs::write(&path, &file.contents) {
            return Err(StarterError::PartialTree {
                path,
                created,
                source,
            });
        }
        debug!(path = %path.display(), "created file");
        created.push(path);
    }
    Ok(created)
}

/// Create `path` and any missing ancestors, recording each new directory.
fn create_dir(path: &Path, created: &mut Vec<PathBuf>) -> StarterResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut missing = Vec::new();
    let mut cursor = Some(path);
    while let Some(dir) = cursor {
        if dir.as_os_str().is_empty() || dir.exists() {
            break;
        }
        missing.push(dir.to_path_buf());
        cursor = dir.parent();
    }
    for dir in missing.into_iter().rev() {
        if let Err(source) = fs::create_dir(&dir) {
            return Err(StarterError::PartialTree {
                path: dir,
                created: std::mem::take(created),
                source,
            });
        }
        debug!(path = %dir.display(), "created directory");
        created.push(dir);
    }
    Ok(())
}
