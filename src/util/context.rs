//! Global context for compose operations.
//!
//! Provides centralized access to the working directory, merged
//! configuration, and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::WrapperShapes;
use crate::util::config::{self, Config, OutputFormat};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global and project configuration
    config: Config,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a context for the current directory, loading configuration.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context for a specific working directory, loading configuration.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let global = config::global_config_path();
        let config = config::load_config(global.as_deref(), &config::project_config_path(&cwd));
        Self::with_config(cwd, config)
    }

    /// Create a context with an explicit configuration.
    pub fn with_config(cwd: PathBuf, config: Config) -> Self {
        GlobalContext {
            cwd,
            config,
            verbose: false,
            color: true,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Output format, with an explicit `--json` taking precedence over config.
    pub fn output_format(&self, json: bool) -> OutputFormat {
        if json {
            OutputFormat::Json
        } else {
            self.config.output_format()
        }
    }

    /// Wrapper shapes built from the configuration.
    pub fn wrapper_shapes(&self) -> Result<WrapperShapes> {
        self.config.wrapper_shapes()
    }

    /// Resolve a user-supplied catalog path against the working directory.
    ///
    /// No path means the working directory itself.
    pub fn catalog_path(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.cwd.join(p),
            None => self.cwd.clone(),
        }
    }
}
