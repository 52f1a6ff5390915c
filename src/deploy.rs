//! Site deployment.
//!
//! Publishes a built snapshot: the output tree gets committed in its
//! own repository and pushed to the configured hosting branch.

use crate::{config::SiteConfig, log, utils::git};
use anyhow::{Result, bail};

/// Deploy the built site to the configured provider
pub fn deploy_site(config: &'static SiteConfig) -> Result<()> {
    match config.deploy.provider.as_str() {
        "github" => deploy_github(config),
        provider => bail!("Unsupported deploy provider: {provider}"),
    }
}

/// Deploy to GitHub Pages
fn deploy_github(config: &'static SiteConfig) -> Result<()> {
    let repo = git::open_or_create_repo(&config.build.output)?;
    git::commit_all(&repo, "Deploy site.")?;
    git::push(&repo, config)?;
    log!("deploy"; "published to {}", config.deploy.github.branch);
    Ok(())
}
