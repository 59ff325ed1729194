use labelforge_render::RenderMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "labelforge.config.json";

/// Labelforge configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding template documents (`<id>.json`)
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Render mode used when `render` gets no `--mode`
    #[serde(default)]
    pub default_mode: RenderMode,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Undo history depth of editing sessions
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_undo_depth() -> usize {
    labelforge_editor::DEFAULT_UNDO_DEPTH
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn templates_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.templates_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            default_mode: RenderMode::default(),
            log_level: default_log_level(),
            undo_depth: default_undo_depth(),
        }
    }
}
