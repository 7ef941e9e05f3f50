//! `dir-compare` scenario: verify that a destination tree matches a source tree.
//!
//! Every regular file under both roots is hashed with BLAKE3 and keyed by its
//! `/`-separated path relative to the root. Symlinks are not followed; a link
//! is hashed by its target path, so a link missing from the destination or
//! pointing elsewhere shows up in the diff like any file.
//!
//! # Inputs
//!
//! | key | type | default |
//! |-----|------|---------|
//! | `source` | existing directory (required) | |
//! | `destination` | existing directory (required) | |
//! | `cleanup_destination` | bool | `false` |
//!
//! With `cleanup_destination`, the destination tree is removed in tear down,
//! but only when the case passed. A failed comparison leaves it for inspection.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use caseflow_core::error::CaseError;
use caseflow_core::{CaseInfo, CaseSpec, CaseflowError, TestCase, TestContext, TestStatus};
use tracing::{info, warn};

/// Registry kind name.
pub const KIND: &str = "dir-compare";

/// Paths listed per category in a failure message.
pub const MAX_LISTED: usize = 10;

/// Relative path -> content hash.
pub type TreeHashes = BTreeMap<String, blake3::Hash>;

/// Compares two directory trees.
#[derive(Debug)]
pub struct DirCompareCase {
    info: CaseInfo,
    source: PathBuf,
    destination: PathBuf,
    cleanup_destination: bool,
}

impl DirCompareCase {
    pub fn new(info: CaseInfo) -> Self {
        Self {
            info: info.with_required_inputs(["source", "destination"]),
            source: PathBuf::new(),
            destination: PathBuf::new(),
            cleanup_destination: false,
        }
    }

    /// Registry factory.
    pub fn factory(spec: &CaseSpec) -> Result<Box<dyn TestCase>, CaseflowError> {
        let info = CaseInfo::new(&spec.id, spec.display_name(), &spec.kind);
        Ok(Box::new(Self::new(info)))
    }
}

impl TestCase for DirCompareCase {
    fn info(&self) -> &CaseInfo {
        &self.info
    }

    fn setup(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        let inputs = ctx.inputs();
        self.source = existing_dir(inputs.require_str("source")?, "source")?;
        self.destination = existing_dir(inputs.require_str("destination")?, "destination")?;
        self.cleanup_destination = inputs.get_bool("cleanup_destination")?.unwrap_or(false);
        Ok(())
    }

    fn run(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        let source = hash_tree(&self.source)?;
        let destination = hash_tree(&self.destination)?;
        let diff = TreeDiff::between(&source, &destination);

        info!(
            source_files = source.len(),
            destination_files = destination.len(),
            missing = diff.missing.len(),
            extra = diff.extra.len(),
            differing = diff.differing.len(),
            "directory trees compared"
        );

        if !diff.is_empty() {
            ctx.fail(diff.describe());
        }
        Ok(())
    }

    fn tear_down(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        if !self.cleanup_destination {
            return Ok(());
        }
        if ctx.status() != TestStatus::Passed {
            warn!(
                destination = %self.destination.display(),
                "comparison failed, keeping destination for inspection"
            );
            return Ok(());
        }

        std::fs::remove_dir_all(&self.destination).map_err(|e| {
            CaseError::Teardown(format!(
                "failed to remove {}: {e}",
                self.destination.display()
            ))
        })?;
        info!(destination = %self.destination.display(), "destination removed");
        Ok(())
    }
}

fn existing_dir(raw: &str, key: &str) -> Result<PathBuf, CaseError> {
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(CaseError::InvalidInput {
            key: key.to_owned(),
            reason: format!("{} is not a directory", path.display()),
        })
    }
}

/// Hashes every regular file and symlink under `root`.
pub fn hash_tree(root: &Path) -> Result<TreeHashes, CaseflowError> {
    let mut hashes = TreeHashes::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let key = relative_key(root, &path);
                hashes.insert(key, hash_file(&path)?);
            } else if file_type.is_symlink() {
                let key = relative_key(root, &path);
                hashes.insert(key, hash_link(&path)?);
            } else {
                warn!(path = %path.display(), "skipping special file");
            }
        }
    }

    Ok(hashes)
}

fn hash_link(path: &Path) -> Result<blake3::Hash, CaseflowError> {
    let target = std::fs::read_link(path)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"symlink:");
    hasher.update(target.to_string_lossy().as_bytes());
    Ok(hasher.finalize())
}

fn hash_file(path: &Path) -> Result<blake3::Hash, CaseflowError> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize())
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Differences between two hashed trees.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeDiff {
    /// In source, absent from destination.
    pub missing: Vec<String>,
    /// In destination, absent from source.
    pub extra: Vec<String>,
    /// Present in both with different content.
    pub differing: Vec<String>,
}

impl TreeDiff {
    pub fn between(source: &TreeHashes, destination: &TreeHashes) -> Self {
        let mut diff = Self::default();
        for (path, hash) in source {
            match destination.get(path) {
                None => diff.missing.push(path.clone()),
                Some(other) if other != hash => diff.differing.push(path.clone()),
                Some(_) => {}
            }
        }
        diff.extra = destination
            .keys()
            .filter(|path| !source.contains_key(*path))
            .cloned()
            .collect();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.differing.is_empty()
    }

    /// One-line failure message, at most [`MAX_LISTED`] paths per category.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            ("missing", &self.missing),
            ("extra", &self.extra),
            ("differing", &self.differing),
        ]
        .into_iter()
        .filter(|(_, paths)| !paths.is_empty())
        .map(|(label, paths)| format!("{label} {}: {}", paths.len(), list(paths)))
        .collect();
        format!("directories differ; {}", parts.join("; "))
    }
}

fn list(paths: &[String]) -> String {
    let shown = paths
        .iter()
        .take(MAX_LISTED)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if paths.len() > MAX_LISTED {
        format!("{shown} (+{} more)", paths.len() - MAX_LISTED)
    } else {
        shown
    }
}
