//! Output path shaping for pretty URLs.
//!
//! `name.ext` becomes `name/index.html` so published links can omit the
//! file extension. `index` and `404` keep their place: web servers
//! resolve them by convention.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Rewrite a rendered page's relative path to its output location.
///
/// - `about.html` → `about/index.html`
/// - `demos/grid.md` → `demos/grid/index.html`
/// - `index.html` → `index.html`
/// - `404.html` → `404.html`
pub fn shape(rel: &Path) -> PathBuf {
    let stem = rel.file_stem().and_then(OsStr::to_str).unwrap_or_default();

    if stem == "index" || stem == "404" {
        return rel.with_extension("html");
    }

    match rel.parent() {
        Some(parent) => parent.join(stem).join("index.html"),
        None => Path::new(stem).join("index.html"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_plain_page() {
        assert_eq!(shape(Path::new("about.html")), Path::new("about/index.html"));
    }

    #[test]
    fn test_shape_index_unchanged() {
        assert_eq!(shape(Path::new("index.html")), Path::new("index.html"));
    }

    #[test]
    fn test_shape_404_unchanged() {
        assert_eq!(shape(Path::new("404.html")), Path::new("404.html"));
    }

    #[test]
    fn test_shape_markdown_extension() {
        assert_eq!(
            shape(Path::new("demos/grid.md")),
            Path::new("demos/grid/index.html")
        );
    }

    #[test]
    fn test_shape_nested_index() {
        // index keeps its directory, only the extension normalizes
        assert_eq!(
            shape(Path::new("demos/index.md")),
            Path::new("demos/index.html")
        );
    }

    #[test]
    fn test_shape_deep_nesting() {
        assert_eq!(
            shape(Path::new("a/b/c.html")),
            Path::new("a/b/c/index.html")
        );
    }
}
