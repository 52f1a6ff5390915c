//! File system watcher for rebuild-on-change.
//!
//! Monitors the content, template and asset directories plus the config
//! file. Changes are debounced, then routed to the narrowest task that
//! covers them: a stylesheet edit reruns only the css task, a template
//! edit reruns only pages, a config edit reruns everything.
//!
//! A failing rebuild halts that rebuild only; the watcher keeps running
//! and the next save re-triggers the task.

use crate::{
    assets,
    config::SiteConfig,
    log,
    pipeline::pages,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// =============================================================================
// Rebuild Routing
// =============================================================================

/// The rebuild a changed path maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rebuild {
    Css,
    Images,
    Javascript,
    Pages,
    Full,
}

impl Rebuild {
    const fn name(self) -> &'static str {
        match self {
            Rebuild::Css => "css",
            Rebuild::Images => "images",
            Rebuild::Javascript => "javascript",
            Rebuild::Pages => "pages",
            Rebuild::Full => "full",
        }
    }

    fn run(self, config: &SiteConfig) -> Result<()> {
        match self {
            Rebuild::Css => assets::build_css(config),
            Rebuild::Images => assets::copy_images(config),
            Rebuild::Javascript => assets::bundle_js(config),
            Rebuild::Pages => pages::build_pages(config),
            Rebuild::Full => crate::build::run_tasks(crate::cli::Task::DEFAULT, config),
        }
    }
}

/// Map a changed path to the task that consumes it.
fn categorize(path: &Path, config: &SiteConfig) -> Option<Rebuild> {
    if path == config.config_path {
        return Some(Rebuild::Full);
    }

    if let Ok(rel) = path.strip_prefix(&config.build.assets) {
        let first = rel
            .components()
            .next()
            .and_then(|c| c.as_os_str().to_str())?;
        return match first {
            "css" => Some(Rebuild::Css),
            "images" => Some(Rebuild::Images),
            "javascript" => Some(Rebuild::Javascript),
            _ => None,
        };
    }

    if path.starts_with(&config.build.content) || path.starts_with(&config.build.templates) {
        return Some(Rebuild::Pages);
    }

    None
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Process a debounced batch of changes. Returns true if a full rebuild
/// ran (for cooldown tracking).
fn handle_changes(paths: &[PathBuf], config: &'static SiteConfig) -> bool {
    if paths.is_empty() {
        return false;
    }

    let root = config.get_root();

    let mut rebuilds: Vec<Rebuild> = Vec::new();
    for path in paths {
        if let Some(rebuild) = categorize(path, config)
            && !rebuilds.contains(&rebuild)
        {
            rebuilds.push(rebuild);
        }
    }

    // Config changes supersede everything else
    if rebuilds.contains(&Rebuild::Full) {
        log!("watch"; "config changed, rebuilding everything...");
        match Rebuild::Full.run(config) {
            Ok(()) => return true,
            Err(err) => {
                log!("watch"; "full rebuild failed");
                log!("watch"; "{err:#}");
                return false;
            }
        }
    }

    let triggers: Vec<_> = paths.iter().map(|p| rel_path(p, root)).collect();
    for rebuild in rebuilds {
        log!("watch"; "{} changed, rebuilding {}", triggers.join(", "), rebuild.name());
        // An in-flight error halts this rebuild only; the watcher keeps
        // running and the next save re-triggers the task.
        if let Err(err) = rebuild.run(config) {
            log!("watch"; "{} rebuild failed", rebuild.name());
            log!("watch"; "{err:#}");
        }
    }

    false
}

// =============================================================================
// Watcher Setup
// =============================================================================

/// Log watched paths.
fn log_watch_summary(config: &SiteConfig) {
    let root = config.get_root();

    let watched: Vec<_> = [
        &config.build.content,
        &config.build.templates,
        &config.build.assets,
        &config.config_path,
    ]
    .into_iter()
    .filter(|p| p.exists())
    .map(|p| rel_path(p, root))
    .collect();

    if !watched.is_empty() {
        log!("watch"; "watching: {}", watched.join(", "));
    }
}

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    for dir in [
        &config.build.content,
        &config.build.templates,
        &config.build.assets,
    ] {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
        }
    }

    if config.config_path.exists() {
        watcher
            .watch(&config.config_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", config.config_path.display()))?;
    }

    log_watch_summary(config);
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and task-scoped rebuilds.
pub fn watch_for_changes_blocking(config: &'static SiteConfig) -> Result<()> {
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, config)?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), config) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
