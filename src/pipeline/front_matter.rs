//! Front-matter extraction and the per-build site data record.
//!
//! A page source starts with a `---` fenced YAML header followed by the
//! body. Files without a complete, well-formed header pass through the
//! pipeline untouched (the parser is deliberately lenient; see
//! DESIGN.md for the stricter alternative).

use crate::config::SiteConfig;
use serde_json::{Map, Value};
use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

// ============================================================================
// Types
// ============================================================================

/// A source file flowing through the page pipeline.
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the content root. Never rewritten before the
    /// URL-shaping stage.
    pub path: PathBuf,

    /// Current content, replaced in place by each stage.
    pub content: String,

    /// Page data attached when a front-matter header was found:
    /// the parsed attributes plus `slug`.
    pub page: Option<Map<String, Value>>,
}

/// Site-wide data shared by every page of one build run.
///
/// Built once from config base data plus computed overrides
/// (`base_url`, `env`), then the demo list is filled during the scan
/// phase. Passed by reference into the render stages and never mutated
/// after scanning completes.
#[derive(Debug)]
pub struct SiteData {
    values: Map<String, Value>,
}

impl SiteData {
    /// Assemble the record from config: user `[extra]` fields first,
    /// then base metadata, then the computed overrides.
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut values = Map::new();

        for (key, value) in &config.extra {
            if let Ok(value) = serde_json::to_value(value) {
                values.insert(key.clone(), value);
            }
        }

        values.insert("title".into(), config.base.title.clone().into());
        values.insert("description".into(), config.base.description.clone().into());
        values.insert("author".into(), config.base.author.clone().into());
        values.insert("repo".into(), config.base.repo.clone().into());
        if let Some(url) = &config.base.url {
            values.insert("url".into(), url.clone().into());
        }

        values.insert("base_url".into(), config.base_url().into());
        values.insert("env".into(), config.build.env.as_str().into());
        values.insert("demos".into(), Value::Array(Vec::new()));

        Self { values }
    }

    /// Append a demo page's data, preserving encounter order.
    fn push_demo(&mut self, page: &Map<String, Value>) {
        if let Some(Value::Array(demos)) = self.values.get_mut("demos") {
            demos.push(Value::Object(page.clone()));
        }
    }

    /// The collected demo entries.
    pub fn demos(&self) -> &[Value] {
        match self.values.get("demos") {
            Some(Value::Array(demos)) => demos,
            _ => &[],
        }
    }

    /// The template-visible `site` value.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Scan a batch of source files, extracting front matter and collecting
/// demo entries.
///
/// This is an explicit two-phase operation: every file is scanned once
/// and nothing is handed downstream until the whole batch is done, so
/// the returned [`SiteData`] always carries the complete demo list.
pub fn scan(files: Vec<(PathBuf, String)>, config: &SiteConfig) -> (Vec<SourceFile>, SiteData) {
    let mut site = SiteData::from_config(config);
    let mut scanned = Vec::with_capacity(files.len());

    for (path, content) in files {
        let file = extract(path, content);

        if let Some(page) = &file.page
            && in_demos_dir(&file.path, &config.build.demos_dir)
        {
            site.push_demo(page);
        }

        scanned.push(file);
    }

    (scanned, site)
}

/// Split one source file into front-matter attributes and body.
///
/// No header, or a malformed one, leaves the file untouched. A parsed
/// header replaces the content with the body and attaches page data.
pub fn extract(path: PathBuf, content: String) -> SourceFile {
    let parsed = split_front_matter(&content).and_then(|(header, body)| {
        parse_attributes(header).map(|attrs| (attrs, body.to_string()))
    });

    match parsed {
        Some((mut page, body)) => {
            page.insert("slug".into(), Value::String(slug(&path)));
            SourceFile {
                path,
                content: body,
                page: Some(page),
            }
        }
        None => SourceFile {
            path,
            content,
            page: None,
        },
    }
}

/// URL-safe identifier for a page: file basename without its extension.
pub fn slug(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default()
        .to_string()
}

/// Whether a relative path sits under the demos directory marker.
fn in_demos_dir(rel: &Path, demos_dir: &str) -> bool {
    rel.parent().is_some_and(|parent| {
        parent
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == OsStr::new(demos_dir)))
    })
}

/// Split a leading `---` fenced header from the body.
///
/// Returns `None` unless the file opens with a fence and a matching
/// closing fence exists at the start of a later line.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let body = body
                .strip_prefix("\r\n")
                .or_else(|| body.strip_prefix('\n'))
                .unwrap_or(body);
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

/// Parse the YAML header into a JSON object.
///
/// Lenient: anything that is not a non-empty string-keyed mapping
/// degrades to `None`, which callers treat as "no front matter".
fn parse_attributes(header: &str) -> Option<Map<String, Value>> {
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(header).ok()?;
    match serde_json::to_value(&yaml).ok()? {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
