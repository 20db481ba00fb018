//! Configuration system for cobra.
//!
//! Loads config from:
//! 1. Global: ~/.config/cobra/config.toml
//! 2. Per-project: .cobra/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [compile]
//! dedent = true
//!
//! [output]
//! extension = "js"
//!
//! [log]
//! level = "warn"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Compilation configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CompileConfig {
    /// Strip indentation shared by every source line before lexing.
    pub dedent: Option<bool>,
}

/// Output file configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of files written with `--out-dir`.
    pub extension: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: Option<String>,
}

/// Root configuration structure.
///
/// Every field is optional so a later file only overrides what it sets.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CobraConfig {
    pub compile: CompileConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl CobraConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/cobra/config.toml,
    /// then merges with per-project config from .cobra/config.toml.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config = config.merge(global);
            }
        }

        let project_path = root.join(".cobra").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    pub fn dedent(&self) -> bool {
        self.compile.dedent.unwrap_or(true)
    }

    pub fn extension(&self) -> &str {
        self.output.extension.as_deref().unwrap_or("js")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or("warn")
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("cobra").join("config.toml"))
    }

    /// Missing or malformed files are treated as absent.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Values set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            compile: CompileConfig {
                dedent: other.compile.dedent.or(self.compile.dedent),
            },
            output: OutputConfig {
                extension: other.output.extension.or(self.output.extension),
            },
            log: LogConfig {
                level: other.log.level.or(self.log.level),
            },
        }
    }
}
