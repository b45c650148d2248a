//! Configuration file support for compose.
//!
//! Two configuration file locations are read:
//! - Global: `~/.compose/config.toml` - User-wide defaults
//! - Project: `.compose/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{FactoryGeneration, WrapperShape, WrapperShapes};

/// Directory name holding compose configuration.
pub const CONFIG_DIR: &str = ".compose";

/// compose configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Additional wrapper definitions
    pub wrappers: WrapperConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Generic definitions recognized as wrappers in addition to the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WrapperConfig {
    /// Deferred-value wrappers, e.g. `app::Deferred`
    pub lazy: Vec<String>,

    /// First-generation factory wrappers
    pub factory_v1: Vec<String>,

    /// Second-generation factory wrappers
    pub factory_v2: Vec<String>,
}

impl WrapperConfig {
    fn is_empty(&self) -> bool {
        self.lazy.is_empty() && self.factory_v1.is_empty() && self.factory_v2.is_empty()
    }

    /// Every configured definition, whatever its shape.
    fn definitions(&self) -> impl Iterator<Item = &String> {
        self.lazy
            .iter()
            .chain(&self.factory_v1)
            .chain(&self.factory_v2)
    }
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format (text, json)
    pub format: Option<OutputFormat>,
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Wrapper lists accumulate; a definition named in both keeps the shape
    /// given by `other`.
    pub fn merge(&mut self, other: Config) {
        let overridden: Vec<String> = other.wrappers.definitions().cloned().collect();
        for list in [
            &mut self.wrappers.lazy,
            &mut self.wrappers.factory_v1,
            &mut self.wrappers.factory_v2,
        ] {
            list.retain(|d| !overridden.contains(d));
        }

        self.wrappers.lazy.extend(other.wrappers.lazy);
        self.wrappers.factory_v1.extend(other.wrappers.factory_v1);
        self.wrappers.factory_v2.extend(other.wrappers.factory_v2);

        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
    }

    /// Output format, defaulting to text.
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    /// The built-in wrapper shapes extended with the configured ones.
    pub fn wrapper_shapes(&self) -> Result<WrapperShapes> {
        let mut shapes = WrapperShapes::standard().clone();
        if self.wrappers.is_empty() {
            return Ok(shapes);
        }

        let configured = self
            .wrappers
            .lazy
            .iter()
            .map(|d| (d, WrapperShape::Lazy))
            .chain(
                self.wrappers
                    .factory_v1
                    .iter()
                    .map(|d| (d, WrapperShape::Factory(FactoryGeneration::V1))),
            )
            .chain(
                self.wrappers
                    .factory_v2
                    .iter()
                    .map(|d| (d, WrapperShape::Factory(FactoryGeneration::V2))),
            );

        for (definition, shape) in configured {
            shapes
                .register(definition, shape)
                .with_context(|| format!("invalid wrapper definition `{}` in config", definition))?;
        }

        tracing::debug!("{} wrapper shape(s) registered", shapes.len());
        Ok(shapes)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.compose/config.toml)
/// 2. Global config (~/.compose/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global compose config directory (~/.compose).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.compose/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.compose/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}
