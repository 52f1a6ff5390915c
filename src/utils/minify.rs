//! HTML minification.
//!
//! Wraps the `minify_html` crate behind the `[build] minify` switch:
//! whitespace and comments are stripped, redundant markup removed, and
//! inline JS/CSS minified.

use crate::config::SiteConfig;
use std::borrow::Cow;

/// Minify rendered HTML based on config.
///
/// Returns `Cow::Borrowed` when minification is disabled.
pub fn minify<'a>(html: &'a [u8], config: &SiteConfig) -> Cow<'a, [u8]> {
    if config.build.minify {
        Cow::Owned(minify_inner(html))
    } else {
        Cow::Borrowed(html)
    }
}

fn minify_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

// ============================================================================
// Tests
// ============================================================================
