//! Template rendering over `{site, page}` data.
//!
//! Two sequential substitutions per page:
//!
//! 1. the page body is itself treated as an inline template, so bodies
//!    can reference site/page variables before being wrapped;
//! 2. the layout template named by the page's `template` attribute is
//!    rendered with the same scope, now including `page.content`.
//!
//! Auto-escaping is disabled by configuration: template authors are
//! trusted, and page bodies already carry rendered HTML. This is a
//! deliberate trade-off, not an oversight.

use crate::config::SiteConfig;
use anyhow::{Context as _, Result};
use serde_json::{Map, Value};
use tera::{Context, Tera};

/// Template renderer for one build run.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every template under the configured template directory.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let glob = format!("{}/**/*", config.build.templates.display());
        let mut tera = Tera::new(&glob).with_context(|| {
            format!(
                "Failed to load templates from {}",
                config.build.templates.display()
            )
        })?;
        tera.autoescape_on(vec![]);
        Ok(Self { tera })
    }

    /// Render a page body as an inline template.
    pub fn render_body(
        &mut self,
        body: &str,
        site: &Value,
        page: &Map<String, Value>,
    ) -> tera::Result<String> {
        self.tera.render_str(body, &scope(site, page))
    }

    /// Render the named layout template with the full page scope.
    pub fn render_layout(
        &self,
        template: &str,
        site: &Value,
        page: &Map<String, Value>,
    ) -> tera::Result<String> {
        self.tera.render(template, &scope(site, page))
    }
}

/// The variable scope every substitution sees: `site` and `page`.
fn scope(site: &Value, page: &Map<String, Value>) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert("page", page);
    context
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    /// Config whose template dir holds the given (name, content) files.
    fn config_with_templates(files: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }

        let mut config = SiteConfig::default();
        config.build.templates = dir.path().to_path_buf();
        (dir, config)
    }

    fn page(entries: &[(&str, &str)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_render_body_interpolates_site_and_page() {
        let (_dir, config) = config_with_templates(&[]);
        let mut renderer = TemplateRenderer::new(&config).unwrap();

        let site = json!({ "title": "Showcase", "base_url": "/showcase/" });
        let page = page(&[("slug", "about")]);

        let out = renderer
            .render_body(
                "<a href=\"{{ site.base_url }}{{ page.slug }}/\">{{ site.title }}</a>",
                &site,
                &page,
            )
            .unwrap();

        assert_eq!(out, "<a href=\"/showcase/about/\">Showcase</a>");
    }

    #[test]
    fn test_render_layout_sees_page_content() {
        let (_dir, config) = config_with_templates(&[(
            "default.html",
            "<main>{{ page.content }}</main>",
        )]);
        let renderer = TemplateRenderer::new(&config).unwrap();

        let site = json!({});
        let page = page(&[("content", "<p>body</p>")]);

        let out = renderer.render_layout("default.html", &site, &page).unwrap();
        assert_eq!(out, "<main><p>body</p></main>");
    }

    #[test]
    fn test_autoescape_disabled() {
        let (_dir, config) = config_with_templates(&[("raw.html", "{{ page.content }}")]);
        let renderer = TemplateRenderer::new(&config).unwrap();

        let page = page(&[("content", "<b>bold</b>")]);
        let out = renderer.render_layout("raw.html", &json!({}), &page).unwrap();

        // Interpolated markup stays raw: authors are trusted
        assert_eq!(out, "<b>bold</b>");
    }

    #[test]
    fn test_layout_enumerates_demo_list() {
        let (_dir, config) = config_with_templates(&[(
            "nav.html",
            "{% for demo in site.demos %}[{{ demo.slug }}]{% endfor %}",
        )]);
        let renderer = TemplateRenderer::new(&config).unwrap();

        let site = json!({ "demos": [{ "slug": "grids" }, { "slug": "media" }] });
        let out = renderer.render_layout("nav.html", &site, &page(&[])).unwrap();

        assert_eq!(out, "[grids][media]");
    }

    #[test]
    fn test_unknown_layout_errors() {
        let (_dir, config) = config_with_templates(&[]);
        let renderer = TemplateRenderer::new(&config).unwrap();

        let result = renderer.render_layout("missing.html", &json!({}), &page(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_body_syntax_error_reported() {
        let (_dir, config) = config_with_templates(&[]);
        let mut renderer = TemplateRenderer::new(&config).unwrap();

        let result = renderer.render_body("{% endfor %}", &json!({}), &page(&[]));
        assert!(result.is_err());
    }
}
