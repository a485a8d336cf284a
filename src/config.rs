//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/modtree/modtree.toml`
//! 3. Local config: `<blueprint_dir>/.modtree.toml`
//! 4. Environment variables: `MODTREE_*` prefix

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::Mode;

/// How `show` prints a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Nested `Kind(\n  (name): Child()\n)` representation
    #[default]
    Repr,
    /// Box-drawing tree including parameters
    Tree,
}

impl std::str::FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <RenderStyle as ValueEnum>::from_str(s.trim(), true)
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub mode: Option<Mode>,
    pub style: Option<RenderStyle>,
    pub show_values: Option<bool>,
}

/// Unified configuration for modtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Mode applied to a loaded tree before listing it
    pub mode: Mode,
    /// Default output style of `show`
    pub style: RenderStyle,
    /// Print parameter values in listings
    pub show_values: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Train,
            style: RenderStyle::Repr,
            show_values: true,
        }
    }
}

/// Get the XDG config directory for modtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "modtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("modtree.toml"))
}

/// Get the path to the local config file next to a blueprint.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".modtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            mode: overlay.mode.unwrap_or(self.mode),
            style: overlay.style.unwrap_or(self.style),
            show_values: overlay.show_values.unwrap_or(self.show_values),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.modtree.toml`, usually the blueprint's directory
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(
            global_config_path().as_deref(),
            local_dir,
            Environment::with_prefix("MODTREE")
                .prefix_separator("_")
                .separator("__"),
        )
    }

    /// Layer defaults, an optional global file, an optional local directory and `env`.
    ///
    /// A missing global or local file is skipped.
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current.apply_env_overrides(env)
    }

    /// Apply `MODTREE_*` variables from `source` as explicit overrides.
    pub fn apply_env_overrides(mut self, source: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("mode") {
            self.mode = val.parse().map_err(|message| ApplicationError::Config {
                message: format!("MODTREE_MODE: {message}"),
            })?;
        }
        if let Ok(val) = config.get_string("style") {
            self.style = val.parse().map_err(|message| ApplicationError::Config {
                message: format!("MODTREE_STYLE: {message}"),
            })?;
        }
        if config.get_string("show_values").is_ok() {
            self.show_values = config.get_bool("show_values").map_err(config_err)?;
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# modtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/modtree/modtree.toml
#   Local:  <blueprint_dir>/.modtree.toml
#   Env:    MODTREE_* environment variables (MODTREE_MODE, MODTREE_STYLE, MODTREE_SHOW_VALUES)

# Mode applied to a loaded tree before listing it: "train" or "eval"
# mode = "train"

# Output style of `modtree show`: "repr" or "tree"
# style = "repr"

# Print parameter values in `modtree params`
# show_values = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
