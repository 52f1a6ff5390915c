//! Vitrine - a build pipeline for static marketing/demo sites.

mod assets;
mod build;
mod cli;
mod config;
mod deploy;
mod logger;
mod pipeline;
mod serve;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::run_tasks;
use clap::Parser;
use cli::{Cli, Commands, Task};
use config::SiteConfig;
use deploy::deploy_site;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { tasks, .. } => {
            let tasks = if tasks.is_empty() {
                Task::DEFAULT.to_vec()
            } else {
                tasks.clone()
            };
            run_tasks(&tasks, config)
        }
        Commands::Lint => assets::lint_js(config),
        Commands::Clean => build::clean_output(config),
        Commands::Serve { .. } => {
            run_tasks(Task::DEFAULT, config)?;
            serve_site(config)
        }
        Commands::Deploy { .. } => {
            run_tasks(Task::DEFAULT, config)?;
            deploy_site(config)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
