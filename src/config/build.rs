//! `[build]` section configuration.
//!
//! Build settings: content/asset/template paths, the output directory,
//! minification, and the external CSS/JS toolchain commands.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Enums
// ============================================================================

/// Build environment.
///
/// Anything other than `dev` is production: absolute links get the
/// `/<repo>/` prefix and the JS bundle is minified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Local development: links rooted at `/`, no JS minification.
    Dev,
    /// Production (default).
    #[default]
    Prod,
}

impl Env {
    /// Resolve from an environment-variable or CLI value.
    pub fn from_value(value: &str) -> Self {
        if value == "dev" { Env::Dev } else { Env::Prod }
    }

    pub const fn is_prod(self) -> bool {
        matches!(self, Env::Prod)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Env::Dev => "dev",
            Env::Prod => "prod",
        }
    }
}

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in vitrine.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "pages"        # Page sources (markdown/html with front matter)
/// output = "build"         # Output directory
/// minify = true            # Minify HTML
///
/// [build.js]
/// entry = "javascript/main.js"
/// bundle_command = ["esbuild"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Page source directory (markdown/html files with front matter).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Name of the directory segment that marks demo pages.
    /// Pages under `<content>/<demos_dir>/` are collected into the
    /// site-wide demo list, in encounter order.
    #[serde(default = "defaults::build::demos_dir")]
    #[educe(Default = defaults::build::demos_dir())]
    pub demos_dir: String,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static assets directory (css, images, javascript).
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Layout template directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Minify HTML output (whitespace, comments, redundant attributes,
    /// inline JS/CSS).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Build environment, resolved from `--env` / `VITRINE_ENV`.
    #[serde(skip)]
    pub env: Env,

    /// Stylesheet task settings.
    #[serde(default)]
    pub css: CssConfig,

    /// JavaScript task settings.
    #[serde(default)]
    pub js: JsConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.css]` section - stylesheet compilation.
///
/// When `command` is set, the stylesheet is produced by running
/// `<command> <input> -o <output>` (postcss-style CLI contract).
/// Without a command the input file is copied verbatim.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CssConfig {
    /// Main stylesheet, relative to the assets directory.
    #[serde(default = "defaults::build::css::input")]
    #[educe(Default = defaults::build::css::input())]
    pub input: PathBuf,

    /// External CSS processor command, e.g. `["postcss"]`.
    #[serde(default = "defaults::build::css::command")]
    #[educe(Default = defaults::build::css::command())]
    pub command: Option<Vec<String>>,
}

/// `[build.js]` section - JavaScript lint and bundle.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct JsConfig {
    /// Bundle entry point, relative to the assets directory.
    #[serde(default = "defaults::build::js::entry")]
    #[educe(Default = defaults::build::js::entry())]
    pub entry: PathBuf,

    /// Bundler command and base arguments.
    #[serde(default = "defaults::build::js::bundle_command")]
    #[educe(Default = defaults::build::js::bundle_command())]
    pub bundle_command: Vec<String>,

    /// Linter command and base arguments.
    ///
    /// Lint failures are always reported but only fail the build in
    /// production mode.
    #[serde(default = "defaults::build::js::lint_command")]
    #[educe(Default = defaults::build::js::lint_command())]
    pub lint_command: Vec<String>,
}
