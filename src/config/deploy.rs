//! `[deploy]` section configuration.
//!
//! Settings for publishing the built output tree to a hosting branch.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[deploy]` section in vitrine.toml - deployment configuration.
///
/// # Example
/// ```toml
/// [deploy]
/// provider = "github"
/// force = false
///
/// [deploy.github]
/// url = "https://github.com/user/solved-by-flexbox"
/// branch = "gh-pages"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Deployment provider. Only "github" is supported.
    #[serde(default = "defaults::deploy::provider")]
    #[educe(Default = defaults::deploy::provider())]
    pub provider: String,

    /// Force push (overwrites remote history).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub force: bool,

    /// GitHub Pages deployment settings.
    #[serde(default)]
    pub github: GithubDeployConfig,
}

/// `[deploy.github]` section - GitHub Pages deployment.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct GithubDeployConfig {
    /// Repository URL (HTTPS format).
    #[serde(default = "defaults::deploy::github::url")]
    #[educe(Default = defaults::deploy::github::url())]
    pub url: String,

    /// Hosting branch the built snapshot is pushed to.
    #[serde(default = "defaults::deploy::github::branch")]
    #[educe(Default = defaults::deploy::github::branch())]
    pub branch: String,

    /// Path to file containing a GitHub personal access token.
    ///
    /// # Security
    /// - Store outside the repository (e.g., `~/.github-token`)
    /// - Never commit tokens to version control!
    #[serde(default = "defaults::deploy::github::token_path")]
    #[educe(Default = defaults::deploy::github::token_path())]
    pub token_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_deploy_config() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"

            [deploy]
            provider = "github"
            force = true

            [deploy.github]
            url = "https://github.com/user/solved-by-flexbox"
            branch = "gh-pages"
            token_path = "~/.github-token"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.deploy.provider, "github");
        assert!(config.deploy.force);
        assert_eq!(
            config.deploy.github.url,
            "https://github.com/user/solved-by-flexbox"
        );
        assert_eq!(config.deploy.github.branch, "gh-pages");
        assert_eq!(
            config.deploy.github.token_path,
            Some(PathBuf::from("~/.github-token"))
        );
    }

    #[test]
    fn test_deploy_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.deploy.provider, "github");
        assert!(!config.deploy.force);
        assert_eq!(config.deploy.github.branch, "gh-pages");
        assert!(config.deploy.github.token_path.is_none());
    }

    #[test]
    fn test_deploy_config_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
            [deploy]
            unknown = "field"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
