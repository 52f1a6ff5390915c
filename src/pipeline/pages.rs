//! Page pipeline driver.
//!
//! Walks the content tree, runs the two-phase scan, then renders and
//! writes every file sequentially. Each file gets its own result; a
//! failure is labeled with the offending path, already-queued files
//! still render, and the batch as a whole fails afterwards, so a watch
//! rebuild never silently continues on stale output.

use crate::config::SiteConfig;
use crate::log;
use crate::pipeline::front_matter::{self, SourceFile};
use crate::pipeline::markdown::MarkdownRenderer;
use crate::pipeline::template::TemplateRenderer;
use crate::utils::{minify, url};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Files to ignore during content traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

// ============================================================================
// Errors
// ============================================================================

/// Per-file pipeline failures, labeled with the offending path.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("markdown rendering failed for `{}`", path.display())]
    Markdown {
        path: PathBuf,
        #[source]
        source: syntect::Error,
    },

    #[error("inline template failed for `{}`", path.display())]
    Body {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("layout `{template}` failed for `{}`", path.display())]
    Layout {
        path: PathBuf,
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("missing `template` attribute in `{}`", path.display())]
    MissingTemplate { path: PathBuf },
}

// ============================================================================
// Public API
// ============================================================================

/// Build the pages task.
pub fn build_pages(config: &SiteConfig) -> Result<()> {
    let content = &config.build.content;
    if !content.exists() {
        log!("pages"; "no content directory, skipping");
        return Ok(());
    }

    // Collect sources. Binary files can't carry front matter; they are
    // copied verbatim below, outside the text pipeline.
    let mut text_files = Vec::new();
    let mut raw_files = Vec::new();
    for path in collect_content_files(content) {
        let rel = path
            .strip_prefix(content)
            .with_context(|| format!("Path outside content root: {}", path.display()))?
            .to_path_buf();
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(text) => text_files.push((rel, text)),
            Err(err) => raw_files.push((rel, err.into_bytes())),
        }
    }

    // Phase 1: scan everything. The demo list must be complete before
    // any page renders.
    let (files, site) = front_matter::scan(text_files, config);
    let site = site.into_value();

    let markdown = MarkdownRenderer::new();
    let mut templates = TemplateRenderer::new(config)?;

    // Phase 2: emit, one file at a time.
    let mut written = 0usize;
    let mut failures = 0usize;
    for file in files {
        match emit(file, &site, &markdown, &mut templates, config) {
            Ok(()) => written += 1,
            Err(err) => {
                failures += 1;
                log!("error"; "{err:#}");
            }
        }
    }

    for (rel, bytes) in raw_files {
        write_output(&config.build.output.join(&rel), &bytes)?;
        written += 1;
    }

    if failures > 0 {
        bail!("pages: {failures} file(s) failed to render");
    }

    log!("pages"; "wrote {written} files");
    Ok(())
}

// ============================================================================
// Internal
// ============================================================================

/// Collect content files in sorted order, so demo encounter order is
/// deterministic across platforms.
fn collect_content_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Render one source file and write it to the output tree.
///
/// Passthrough files (no page data) keep byte-identical content at
/// their unchanged relative path. Pages run markdown (for `.md`
/// sources), both template passes, URL shaping and minification.
fn emit(
    mut file: SourceFile,
    site: &Value,
    markdown: &MarkdownRenderer,
    templates: &mut TemplateRenderer,
    config: &SiteConfig,
) -> Result<()> {
    let Some(mut page) = file.page.take() else {
        return write_output(
            &config.build.output.join(&file.path),
            file.content.as_bytes(),
        );
    };

    if file.path.extension().is_some_and(|ext| ext == "md") {
        file.content = markdown
            .render(&file.content)
            .map_err(|source| PageError::Markdown {
                path: file.path.clone(),
                source,
            })?;
    }

    // Pass 1: the body itself is a template; its output becomes
    // page.content for the layout to embed.
    let body = templates
        .render_body(&file.content, site, &page)
        .map_err(|source| PageError::Body {
            path: file.path.clone(),
            source,
        })?;
    page.insert("content".into(), Value::String(body));

    // Pass 2: wrap in the layout named by the required `template`
    // attribute.
    let template = page
        .get("template")
        .and_then(Value::as_str)
        .ok_or_else(|| PageError::MissingTemplate {
            path: file.path.clone(),
        })?
        .to_string();
    let html = templates
        .render_layout(&template, site, &page)
        .map_err(|source| PageError::Layout {
            path: file.path.clone(),
            template,
            source,
        })?;

    let out_path = config.build.output.join(url::shape(&file.path));
    let html = minify::minify(html.as_bytes(), config);
    write_output(&out_path, &html)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DEFAULT_TEMPLATE: &str = "<!doctype html>\n<title>{{ page.title }}</title>\n\
        <nav>{% for demo in site.demos %}<a href=\"{{ site.base_url }}demos/{{ demo.slug }}/\">{{ demo.title }}</a>{% endfor %}</nav>\n\
        <main>{{ page.content }}</main>\n";

    fn page_source(title: &str, body: &str) -> String {
        format!("---\ntitle: {title}\ntemplate: default.html\n---\n\n{body}")
    }

    /// A full site fixture: content, templates and output under a tempdir.
    fn site_fixture() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("pages");
        let templates = dir.path().join("templates");
        fs::create_dir_all(content.join("demos")).unwrap();
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("default.html"), DEFAULT_TEMPLATE).unwrap();

        let mut config = SiteConfig::default();
        config.build.content = content;
        config.build.templates = templates;
        config.build.output = dir.path().join("build");
        config.build.minify = false;
        (dir, config)
    }

    fn read_output(config: &SiteConfig, rel: &str) -> String {
        fs::read_to_string(config.build.output.join(rel)).unwrap()
    }

    #[test]
    fn test_build_pages_end_to_end() {
        let (_dir, config) = site_fixture();
        let content = &config.build.content;

        fs::write(
            content.join("index.html"),
            page_source("Home", "<h1>{{ site.title }}</h1>"),
        )
        .unwrap();
        fs::write(
            content.join("demos/grids.md"),
            page_source("Grids", "Some *flexing* layout."),
        )
        .unwrap();
        fs::write(
            content.join("demos/media.md"),
            page_source("Media", "Media object text."),
        )
        .unwrap();

        build_pages(&config).unwrap();

        // index stays in place, demo pages get pretty URLs
        let index = read_output(&config, "index.html");
        let grids = read_output(&config, "demos/grids/index.html");
        assert!(config.build.output.join("demos/media/index.html").exists());

        // The demo list was complete before index (scanned first)
        // rendered: both demos appear in its nav.
        assert!(index.contains(">Grids</a>"), "got {index}");
        assert!(index.contains(">Media</a>"), "got {index}");

        // Markdown rendered, then embedded by the layout
        assert!(grids.contains("<em>flexing</em>"), "got {grids}");
        assert!(grids.contains("<title>Grids</title>"), "got {grids}");
    }

    #[test]
    fn test_passthrough_is_byte_identical_at_unchanged_path() {
        let (_dir, config) = site_fixture();
        let css = ".Demo { display: flex; }\n";
        fs::write(config.build.content.join("demos/site.css"), css).unwrap();

        build_pages(&config).unwrap();

        assert_eq!(read_output(&config, "demos/site.css"), css);
    }

    #[test]
    fn test_binary_files_copied_verbatim() {
        let (_dir, config) = site_fixture();
        let bytes = [0xffu8, 0xfe, 0x00, 0x01];
        fs::write(config.build.content.join("demos/raw.bin"), bytes).unwrap();

        build_pages(&config).unwrap();

        assert_eq!(
            fs::read(config.build.output.join("demos/raw.bin")).unwrap(),
            bytes
        );
    }

    #[test]
    fn test_404_keeps_its_place() {
        let (_dir, config) = site_fixture();
        fs::write(
            config.build.content.join("404.html"),
            page_source("Not found", "gone"),
        )
        .unwrap();

        build_pages(&config).unwrap();

        assert!(config.build.output.join("404.html").exists());
        assert!(!config.build.output.join("404/index.html").exists());
    }

    #[test]
    fn test_pretty_url_shaping() {
        let (_dir, config) = site_fixture();
        fs::write(
            config.build.content.join("about.html"),
            page_source("About", "hi"),
        )
        .unwrap();

        build_pages(&config).unwrap();

        assert!(config.build.output.join("about/index.html").exists());
        assert!(!config.build.output.join("about.html").exists());
    }

    #[test]
    fn test_minified_output_is_smaller() {
        let (_dir, mut config) = site_fixture();
        fs::write(
            config.build.content.join("index.html"),
            page_source("Home", "x"),
        )
        .unwrap();

        build_pages(&config).unwrap();
        let plain = read_output(&config, "index.html");

        config.build.minify = true;
        build_pages(&config).unwrap();
        let minified = read_output(&config, "index.html");

        assert!(minified.len() < plain.len(), "{minified:?} vs {plain:?}");
        assert!(minified.contains("<main>"));
    }

    #[test]
    fn test_missing_template_attribute_fails_batch() {
        let (_dir, config) = site_fixture();
        fs::write(
            config.build.content.join("broken.html"),
            "---\ntitle: No layout\n---\nbody",
        )
        .unwrap();

        let result = build_pages(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_does_not_abort_queued_files() {
        let (_dir, config) = site_fixture();
        // "aaa" sorts before "zzz", so the broken page is seen first
        fs::write(
            config.build.content.join("aaa.html"),
            "---\ntitle: Broken\ntemplate: missing.html\n---\nx",
        )
        .unwrap();
        fs::write(
            config.build.content.join("zzz.html"),
            page_source("Fine", "still built"),
        )
        .unwrap();

        let result = build_pages(&config);
        assert!(result.is_err());
        // The healthy page after the failure was still rendered
        assert!(config.build.output.join("zzz/index.html").exists());
    }

    #[test]
    fn test_emit_error_labels_offending_path() {
        let (_dir, config) = site_fixture();
        fs::write(
            config.build.content.join("bad.md"),
            "---\ntitle: Bad\ntemplate: default.html\n---\n{% endfor %}",
        )
        .unwrap();

        let mut text_files = Vec::new();
        let path = config.build.content.join("bad.md");
        text_files.push((
            PathBuf::from("bad.md"),
            fs::read_to_string(&path).unwrap(),
        ));
        let (files, site) = front_matter::scan(text_files, &config);
        let site = site.into_value();

        let markdown = MarkdownRenderer::new();
        let mut templates = TemplateRenderer::new(&config).unwrap();
        let err = emit(
            files.into_iter().next().unwrap(),
            &site,
            &markdown,
            &mut templates,
            &config,
        )
        .unwrap_err();

        assert!(err.to_string().contains("bad.md"), "got {err:#}");
    }

    #[test]
    fn test_missing_content_directory_is_ok() {
        let (_dir, mut config) = site_fixture();
        config.build.content = config.build.content.join("nope");
        assert!(build_pages(&config).is_ok());
    }
}
