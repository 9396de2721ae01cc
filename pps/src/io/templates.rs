//! Template bodies for new projects.
//!
//! Bodies are compiled into the binary. A configured override directory may
//! replace any of them with `<dir>/<id>.tmpl`.

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::anyhow;
use tracing::debug;

use crate::core::template::{Placeholders, render};
use crate::error::{StarterError, StarterResult};

pub const README: &str = "readme";
pub const GITIGNORE: &str = "gitignore";
pub const MANIFEST: &str = "manifest";
pub const PACKAGE_INIT: &str = "package_init";
pub const TESTS_INIT: &str = "tests_init";

const BUNDLED: &[(&str, &str)] = &[
    (README, include_str!("templates/readme.tmpl")),
    (GITIGNORE, include_str!("templates/gitignore.tmpl")),
    (MANIFEST, include_str!("templates/manifest.tmpl")),
    (PACKAGE_INIT, include_str!("templates/package_init.tmpl")),
    (TESTS_INIT, include_str!("templates/tests_init.tmpl")),
];

/// Source of template bodies by id.
pub trait TemplateStore {
    fn load(&self, id: &str) -> StarterResult<Cow<'_, str>>;

    /// Load `id` and substitute `values`.
    fn render(&self, id: &str, values: &Placeholders) -> StarterResult<String> {
        let body = self.load(id)?;
        render(id, &body, values)
    }
}

/// Bundled templates, optionally overridden from a directory.
#[derive(Debug, Clone, Default)]
pub struct BundledTemplates {
    override_dir: Option<PathBuf>,
}

impl BundledTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    pub fn ids() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(id, _)| *id)
    }
}

impl TemplateStore for BundledTemplates {
    fn load(&self, id: &str) -> StarterResult<Cow<'_, str>> {
        let bundled = BUNDLED
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, body)| *body)
            .ok_or_else(|| StarterError::TemplateNotFound(id.to_string()))?;

        let Some(dir) = &self.override_dir else {
            return Ok(Cow::Borrowed(bundled));
        };
        let path = dir.join(format!("{id}.tmpl"));
        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!(template = id, path = %path.display(), "using template override");
                Ok(Cow::Owned(body))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Cow::Borrowed(bundled)),
            Err(e) => Err(anyhow!(e)
                .context(format!("read template {}", path.display()))
                .into()),
        }
    }
}
