//! Git operations for publishing the built output tree.
//!
//! The output directory carries its own repository; each deploy commits
//! the whole tree as one snapshot and pushes it to the hosting branch.

use crate::{config::SiteConfig, exec, log};
use anyhow::{Context, Result, anyhow, bail};
use gix::{
    Repository, ThreadSafeRepository,
    bstr::BString,
    commit::NO_PARENT_IDS,
    index::{
        State,
        entry::{Flags, Mode, Stat},
        fs::Metadata,
    },
    objs::{Tree, tree},
};
use std::{fs, path::Path};

// ============================================================================
// Repository Operations
// ============================================================================

/// Create a new git repository at the given path
pub fn create_repo(root: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::init(root)?;
    Ok(repo.into_sync())
}

/// Open an existing git repository
pub fn open_repo(root: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::open(root)?;
    Ok(repo.into_sync())
}

/// Open the repository in the output directory, initializing it if missing.
pub fn open_or_create_repo(root: &Path) -> Result<ThreadSafeRepository> {
    if root.join(".git").exists() {
        open_repo(root)
    } else {
        log!("git"; "initializing repo in {}", root.display());
        create_repo(root)
    }
}

/// Commit the whole working directory as one snapshot.
pub fn commit_all(repo: &ThreadSafeRepository, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }

    let repo_local = repo.to_thread_local();
    let root = repo_root(&repo_local)?;

    // Build index and tree from the working directory
    let mut index = State::new(repo_local.object_hash());
    let tree = build_tree(&repo_local, root, root, &mut index)?;
    index.sort_entries();

    // Write index file
    let mut index_file = gix::index::File::from_state(index, repo_local.index_path());
    index_file.write(gix::index::write::Options::default())?;

    // Create commit
    let tree_id = repo_local.write_object(&tree)?;
    let parent_ids = parent_commit_ids(&repo_local);
    let commit_id = repo_local.commit("HEAD", message, tree_id, parent_ids)?;

    log!("git"; "commit {commit_id}");
    Ok(())
}

/// Push the snapshot to the configured hosting branch.
pub fn push(repo: &ThreadSafeRepository, config: &SiteConfig) -> Result<()> {
    let github = &config.deploy.github;
    log!("git"; "pushing to {} ({})", github.url, github.branch);

    let repo_local = repo.to_thread_local();
    let root = repo_root(&repo_local)?;

    let remote_url = authenticated_url(&github.url, github.token_path.as_deref())?;
    configure_origin_remote(root, &repo_local, &remote_url)?;

    let refspec = format!("HEAD:refs/heads/{}", github.branch);
    if config.deploy.force {
        exec!(root; &["git"]; "push", "origin", &refspec, "-f")?;
    } else {
        exec!(root; &["git"]; "push", "origin", &refspec)?;
    }

    Ok(())
}

// ============================================================================
// Remote Management
// ============================================================================

/// Configure origin remote (add or update URL)
fn configure_origin_remote(root: &Path, repo: &Repository, url: &str) -> Result<()> {
    let action = if repo.find_remote("origin").is_ok() {
        "set-url"
    } else {
        "add"
    };
    exec!(root; &["git"]; "remote", action, "origin", url)?;
    Ok(())
}

/// Build authenticated HTTPS URL with optional token file
fn authenticated_url(url: &str, token_path: Option<&Path>) -> Result<String> {
    let base_url = url
        .strip_prefix("https://")
        .context("Remote URL must start with https://")?;

    let token = token_path
        .and_then(|p| fs::read_to_string(p).ok())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    match token {
        Some(token) => Ok(format!("https://{token}@{base_url}")),
        None => Ok(format!("https://{base_url}")),
    }
}

// ============================================================================
// Tree Building
// ============================================================================

/// Build a git tree from a directory.
///
/// Recursively creates blobs for files and trees for subdirectories,
/// recording every file in the index. The `.git` directory is skipped;
/// the output tree carries nothing else worth excluding.
fn build_tree(repo: &Repository, root: &Path, dir: &Path, index: &mut State) -> Result<Tree> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let filename: BString = entry
            .file_name()
            .into_string()
            .map(Into::into)
            .map_err(|_| anyhow!("Invalid UTF-8 in filename"))?;

        if filename == ".git" {
            continue;
        }

        if path.is_dir() {
            let sub_tree = build_tree(repo, root, &path, index)?;
            let oid = repo.write_object(&sub_tree)?.detach();
            entries.push(tree::Entry {
                mode: tree::EntryKind::Tree.into(),
                oid,
                filename,
            });
        } else if path.is_file() {
            let contents = fs::read(&path)?;
            let oid: gix::ObjectId = repo.write_blob(contents)?.into();

            let rel: BString = path
                .strip_prefix(root)?
                .to_string_lossy()
                .into_owned()
                .into();
            let stat = Stat::from_fs(&Metadata::from_path_no_follow(&path)?)?;
            index.dangerously_push_entry(stat, oid, Flags::empty(), Mode::FILE, rel.as_ref());

            entries.push(tree::Entry {
                mode: tree::EntryKind::Blob.into(),
                oid,
                filename,
            });
        }
    }

    sort_tree_entries(&mut entries);
    Ok(Tree { entries })
}

/// Sort entries according to git tree ordering.
///
/// Git sorts tree entries by name but compares directories as if their
/// name ends with a slash: "foo" < "foo-bar" < "foo/".
fn sort_tree_entries(entries: &mut [tree::Entry]) {
    let tree_mode: tree::EntryMode = tree::EntryKind::Tree.into();
    entries.sort_by(|a, b| {
        let sort_key = |e: &tree::Entry| {
            let mut key = e.filename.as_slice().to_vec();
            if e.mode == tree_mode {
                key.push(b'/');
            }
            key
        };
        sort_key(a).cmp(&sort_key(b))
    });
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Get repository root path
fn repo_root(repo: &Repository) -> Result<&Path> {
    repo.path()
        .parent()
        .ok_or_else(|| anyhow!("Invalid repository path"))
}

/// Get parent commit IDs (empty for initial commit)
fn parent_commit_ids(repo: &Repository) -> Vec<gix::ObjectId> {
    repo.head_id()
        .map(|id| vec![id.detach()])
        .unwrap_or_else(|_| NO_PARENT_IDS.to_vec())
}

// ============================================================================
// Tests
// ============================================================================
