use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{PageSightError, PageSightResult};

/// Perception settings. All fields have defaults so the crate works
/// without a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Directory labeled screenshots are persisted to. Created on first use.
    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: PathBuf,
    /// Inject the live highlight overlay after each scan. Cosmetic; turning
    /// it off leaves the page DOM untouched by this crate.
    #[serde(default = "default_true")]
    pub inject_highlights: bool,
    /// Cap on boxes drawn per screenshot and per live overlay pass.
    #[serde(default = "default_max_labels")]
    pub max_labels: usize,
}

fn default_screenshots_dir() -> PathBuf {
    PathBuf::from("results/screenshots")
}

fn default_true() -> bool {
    true
}

fn default_max_labels() -> usize {
    50
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            screenshots_dir: default_screenshots_dir(),
            inject_highlights: default_true(),
            max_labels: default_max_labels(),
        }
    }
}

fn resolve_config_path() -> PageSightResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(PageSightError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> PageSightResult<VisionConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config: VisionConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `config.toml` if one is resolvable, otherwise fall back to defaults.
pub fn load_or_default() -> VisionConfig {
    match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::debug!(error = %e, "no usable config, using defaults");
            VisionConfig::default()
        }
    }
}
