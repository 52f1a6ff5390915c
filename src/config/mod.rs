//! Site configuration management for `vitrine.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[base]`    | Site metadata (title, description, repo)       |
//! | `[build]`   | Build paths, minification, css/js toolchain    |
//! | `[serve]`   | Development server (port, interface, watch)    |
//! | `[deploy]`  | Hosting branch deployment (GitHub)             |
//! | `[extra]`   | User-defined fields merged into site data      |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Solved by Flexbox"
//! description = "A showcase of problems once hard, now easy"
//! repo = "solved-by-flexbox"
//!
//! [build]
//! content = "pages"
//! output = "build"
//! minify = true
//!
//! [serve]
//! port = 4000
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod base;
mod build;
pub mod defaults;
mod deploy;
mod error;
mod serve;

// Re-export public types used by other modules
pub use build::Env;

// Internal imports used in this module
use base::BaseConfig;
use build::BuildConfig;
use deploy::DeployConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands, Task};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Environment variable selecting the build environment.
/// Any value other than "dev" means production.
pub const ENV_VAR: &str = "VITRINE_ENV";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing vitrine.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Deployment settings
    #[serde(default)]
    pub deploy: DeployConfig,

    /// User-defined extra fields, merged into the template-visible
    /// site data.
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Base path prefix for absolute links.
    ///
    /// Production: `/<repo>/` (project-page hosting); dev, or prod with
    /// no repo configured: `/`.
    pub fn base_url(&self) -> String {
        match self.build.env {
            Env::Prod if !self.base.repo.is_empty() => format!("/{}/", self.base.repo),
            _ => "/".to_string(),
        }
    }

    /// The tasks the current CLI command will run.
    pub fn effective_tasks(&self) -> Vec<Task> {
        match &self.get_cli().command {
            Commands::Build { tasks, .. } if !tasks.is_empty() => tasks.clone(),
            Commands::Build { .. } | Commands::Serve { .. } | Commands::Deploy { .. } => {
                Task::DEFAULT.to_vec()
            }
            Commands::Lint => vec![Task::Lint],
            Commands::Clean => vec![],
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        self.set_root(&root);
        self.update_path_with_root(&root);

        // Resolve environment: CLI flag wins over VITRINE_ENV,
        // production is the default.
        let env_value = cli.env.clone().or_else(|| std::env::var(ENV_VAR).ok());
        self.build.env = env_value
            .as_deref()
            .map(Env::from_value)
            .unwrap_or_default();

        Self::update_option(&mut self.build.minify, cli.minify.as_ref());
        if let Some(args) = cli.build_args() {
            self.build.clean = self.build.clean || args.clean;
        }

        match &cli.command {
            Commands::Serve {
                interface,
                port,
                watch,
                ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Deploy { force, .. } => {
                Self::update_option(&mut self.deploy.force, force.as_ref());
            }
            _ => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let cli = self.get_cli();

        // Apply CLI overrides first
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        // Normalize root to absolute path
        let root = Self::normalize_path(root);
        self.set_root(&root);

        // Normalize config path
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        // Normalize all directory paths
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.templates = Self::normalize_path(&root.join(&self.build.templates));

        // Normalize token path (with tilde expansion)
        if let Some(token_path) = &self.deploy.github.token_path
            && let Some(token_str) = token_path.to_str()
        {
            let expanded = shellexpand::tilde(token_str).into_owned();
            let path = PathBuf::from(expanded);
            self.deploy.github.token_path = Some(if path.is_relative() {
                Self::normalize_path(&root.join(path))
            } else {
                Self::normalize_path(&path)
            });
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        let cli = self.get_cli();

        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        // External commands are only required by the tasks that run them
        let tasks = self.effective_tasks();

        if tasks.contains(&Task::Css)
            && let Some(command) = &self.build.css.command
        {
            Self::check_command_installed("[build.css.command]", command)?;
        }

        if tasks.contains(&Task::Javascript) {
            Self::check_command_installed("[build.js.bundle_command]", &self.build.js.bundle_command)?;
        }

        if tasks.contains(&Task::Javascript) || tasks.contains(&Task::Lint) {
            Self::check_command_installed("[build.js.lint_command]", &self.build.js.lint_command)?;
        }

        if let Commands::Deploy { .. } = &cli.command {
            if !self.deploy.github.url.starts_with("https://") {
                bail!(ConfigError::Validation(
                    "[deploy.github.url] must start with https://".into()
                ));
            }
            if let Some(path) = &self.deploy.github.token_path {
                if !path.exists() {
                    bail!(ConfigError::Validation(
                        "[deploy.github.token_path] not found".into()
                    ));
                }
                if !path.is_file() {
                    bail!(ConfigError::Validation(
                        "[deploy.github.token_path] is not a file".into()
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        if command.is_empty() {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        }

        let cmd = &command[0];
        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
