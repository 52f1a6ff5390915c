//! Asset tasks: css, images, lint, javascript.
//!
//! These are independent of the page pipeline. CSS and JS are driven by
//! the configured external toolchain commands; images are a plain tree
//! copy.

use crate::config::SiteConfig;
use crate::utils::exec::{run_unchecked, to_os};
use crate::{exec, log};
use anyhow::{Context, Result, bail};
use std::fs;
use walkdir::WalkDir;

// ============================================================================
// CSS
// ============================================================================

/// Compile the main stylesheet into `<output>/main.css`.
///
/// With `[build.css] command` configured the external processor runs as
/// `<command> <input> -o <output>`; otherwise the input is copied.
pub fn build_css(config: &SiteConfig) -> Result<()> {
    let input = config.build.assets.join(&config.build.css.input);
    if !input.exists() {
        log!("css"; "no stylesheet at {}, skipping", input.display());
        return Ok(());
    }

    let output = config.build.output.join("main.css");
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    match &config.build.css.command {
        Some(command) => {
            exec!(config.get_root(); command; &input, "-o", &output)?;
        }
        None => {
            fs::copy(&input, &output)
                .with_context(|| format!("Failed to copy {}", input.display()))?;
        }
    }

    log!("css"; "wrote main.css");
    Ok(())
}

// ============================================================================
// Images
// ============================================================================

/// Copy the image tree into `<output>/images/`.
pub fn copy_images(config: &SiteConfig) -> Result<()> {
    let source = config.build.assets.join("images");
    if !source.exists() {
        log!("images"; "no image directory, skipping");
        return Ok(());
    }

    let dest_root = config.build.output.join("images");
    let mut copied = 0usize;

    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(&source)?;
        let dest = dest_root.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    log!("images"; "copied {copied} files");
    Ok(())
}

// ============================================================================
// JavaScript
// ============================================================================

/// Lint the JavaScript sources.
///
/// Diagnostics are always reported; a failing lint is build-fatal only
/// in production mode.
pub fn lint_js(config: &SiteConfig) -> Result<()> {
    let js_dir = config.build.assets.join("javascript");
    if !js_dir.exists() {
        log!("lint"; "no javascript directory, skipping");
        return Ok(());
    }

    let output = run_unchecked(
        config.get_root(),
        &config.build.js.lint_command,
        &[to_os(&js_dir)],
    )?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stdout.lines().chain(stderr.lines()) {
        log!("lint"; "{line}");
    }

    if !output.status.success() {
        if config.build.env.is_prod() {
            bail!("lint failed");
        }
        log!("lint"; "failed (non-fatal outside production)");
    }

    Ok(())
}

/// Lint, then bundle the JavaScript entry into `<output>/main.js` with
/// a source map. The bundle is minified in production.
pub fn bundle_js(config: &SiteConfig) -> Result<()> {
    lint_js(config)?;

    let entry = config.build.assets.join(&config.build.js.entry);
    if !entry.exists() {
        log!("javascript"; "no entry at {}, skipping", entry.display());
        return Ok(());
    }

    let outfile = config.build.output.join("main.js");
    if let Some(parent) = outfile.parent() {
        fs::create_dir_all(parent)?;
    }

    let outfile_arg = format!("--outfile={}", outfile.display());
    let minify_flag = if config.build.env.is_prod() {
        "--minify"
    } else {
        ""
    };

    exec!(
        config.get_root();
        &config.build.js.bundle_command;
        &entry, "--bundle", "--sourcemap", &outfile_arg, minify_flag
    )?;

    log!("javascript"; "wrote main.js");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
