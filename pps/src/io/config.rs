//! Optional configuration stored in `.pps.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::classifier::{Classifier, PatternTable};
use crate::io::templates::BundledTemplates;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".pps.toml";

/// Starter configuration (TOML).
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StarterConfig {
    pub tools: ToolsConfig,

    /// Per-command wall-clock limit in seconds.
    pub command_timeout_secs: u64,

    /// Keep at most this many bytes of each stream per command.
    pub output_limit_bytes: usize,

    /// Directory with `<id>.tmpl` files overriding bundled templates.
    pub templates_dir: Option<PathBuf>,

    pub patterns: PatternsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    /// Version-control executable.
    pub git: String,
    /// Environment-management executable.
    pub uv: String,
    /// Arguments passed to `uv` to install the project's dependencies.
    pub install_args: Vec<String>,
}

/// Extra classifier patterns, appended to the built-in table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatternsConfig {
    pub benign: Vec<String>,
    pub needs_upstream: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            uv: "uv".to_string(),
            install_args: ["pip", "install", "-e", ".[dev]"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            command_timeout_secs: 10 * 60,
            output_limit_bytes: 1_000_000,
            templates_dir: None,
            patterns: PatternsConfig::default(),
        }
    }
}

impl StarterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tools.git.trim().is_empty() {
            return Err(anyhow!("tools.git must not be empty"));
        }
        if self.tools.uv.trim().is_empty() {
            return Err(anyhow!("tools.uv must not be empty"));
        }
        if self.tools.install_args.is_empty() {
            return Err(anyhow!("tools.install_args must be a non-empty array"));
        }
        if self.command_timeout_secs == 0 {
            return Err(anyhow!("command_timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn classifier(&self) -> Classifier {
        let mut table = PatternTable::default();
        table.extend(&self.patterns.benign, &self.patterns.needs_upstream);
        Classifier::new(table)
    }

    pub fn templates(&self) -> BundledTemplates {
        match &self.templates_dir {
            Some(dir) => BundledTemplates::with_override_dir(dir),
            None => BundledTemplates::new(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `StarterConfig::default()`.
pub fn load_config(path: &Path) -> Result<StarterConfig> {
    if !path.exists() {
        let cfg = StarterConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: StarterConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
