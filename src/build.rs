//! Build task orchestration.
//!
//! The page pipeline and the asset tasks touch disjoint parts of the
//! output tree, so they run side by side; within each task files are
//! processed one at a time.

use crate::assets;
use crate::cli::Task;
use crate::config::SiteConfig;
use crate::log;
use crate::pipeline::pages;
use anyhow::{Context, Result};
use std::fs;

/// Run the requested tasks against a fresh or existing output tree.
pub fn run_tasks(tasks: &[Task], config: &SiteConfig) -> Result<()> {
    if config.build.clean {
        clean_output(config)?;
    }
    fs::create_dir_all(&config.build.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.build.output.display()
        )
    })?;

    let (pages_result, assets_result) = rayon::join(
        || {
            if tasks.contains(&Task::Pages) {
                pages::build_pages(config)
            } else {
                Ok(())
            }
        },
        || run_asset_tasks(tasks, config),
    );

    pages_result?;
    assets_result?;

    log!("build"; "done");
    Ok(())
}

fn run_asset_tasks(tasks: &[Task], config: &SiteConfig) -> Result<()> {
    for task in tasks {
        match task {
            Task::Css => assets::build_css(config)?,
            Task::Images => assets::copy_images(config)?,
            // javascript runs lint itself; avoid double-linting
            Task::Lint if !tasks.contains(&Task::Javascript) => assets::lint_js(config)?,
            Task::Lint => {}
            Task::Javascript => assets::bundle_js(config)?,
            Task::Pages => {}
        }
    }
    Ok(())
}

/// Delete the output directory.
pub fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    if output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
        log!("clean"; "removed {}", output.display());
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
