//! `[base]` section configuration.
//!
//! Basic site information: title, description, repository name. These
//! fields are merged into the site data visible to every template.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in vitrine.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Solved by Flexbox"
/// description = "A showcase of problems once hard, now easy"
/// repo = "solved-by-flexbox"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    pub title: String,

    /// Site description for SEO meta tags.
    pub description: String,

    /// Author name for meta tags.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Repository name. In production mode, absolute links are prefixed
    /// with `/<repo>/` (project-page hosting convention).
    #[serde(default = "defaults::base::repo")]
    #[educe(Default = defaults::base::repo())]
    pub repo: String,

    /// Canonical URL of the published site, if any.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Solved by Flexbox"
            description = "A showcase site"
            author = "Alice"
            repo = "solved-by-flexbox"
            url = "https://alice.github.io/solved-by-flexbox"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Solved by Flexbox");
        assert_eq!(config.base.description, "A showcase site");
        assert_eq!(config.base.author, "Alice");
        assert_eq!(config.base.repo, "solved-by-flexbox");
        assert_eq!(
            config.base.url,
            Some("https://alice.github.io/solved-by-flexbox".to_string())
        );
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert_eq!(config.base.repo, "");
        assert_eq!(config.base.url, None);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }
}
