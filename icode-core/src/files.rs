//! File Resolution
//!
//! The analyser reports file names relative to where it ran; the host
//! platform knows files by its own handles. A [`FileIndex`] bridges the
//! two. A miss is never an error: results for unknown files are skipped.

use crate::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use icode_utils::{normalize_report_path, relative_key};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lookup from analyser-reported file names to host file handles
pub trait FileIndex {
    type Handle: Clone + Eq + Hash;

    /// Resolve a reported file name, `None` when the host does not track it
    fn lookup(&self, file_name: &str) -> Option<Self::Handle>;
}

impl<H, S> FileIndex for HashMap<String, H, S>
where
    H: Clone + Eq + Hash,
    S: BuildHasher,
{
    type Handle = H;

    fn lookup(&self, file_name: &str) -> Option<H> {
        self.get(file_name).cloned()
    }
}

impl<H> FileIndex for BTreeMap<String, H>
where
    H: Clone + Eq + Hash,
{
    type Handle = H;

    fn lookup(&self, file_name: &str) -> Option<H> {
        self.get(file_name).cloned()
    }
}

impl<I: FileIndex + ?Sized> FileIndex for &I {
    type Handle = I::Handle;

    fn lookup(&self, file_name: &str) -> Option<I::Handle> {
        (**self).lookup(file_name)
    }
}

/// A project file known to the index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InputFile {
    /// Path relative to the project base directory, `/`-separated
    pub key: String,
    /// Path on disk
    pub path: PathBuf,
}

impl std::fmt::Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

/// Index of the files found under a project directory
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    base_dir: PathBuf,
    files: BTreeMap<String, InputFile>,
}

impl ProjectFiles {
    /// Walk `base_dir` and index every file not matched by `exclude`
    pub fn scan(base_dir: impl AsRef<Path>, exclude: &[String]) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if !base_dir.is_dir() {
            return Err(Error::Config(format!(
                "Project directory does not exist: {}",
                base_dir.display()
            )));
        }
        let excluded = build_globset(exclude)?;

        let mut files = BTreeMap::new();
        for entry in WalkDir::new(&base_dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable project entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let key = relative_key(&base_dir, entry.path())?;
            if excluded.is_match(&key) {
                debug!("Excluded {}", key);
                continue;
            }
            files.insert(
                key.clone(),
                InputFile {
                    key,
                    path: entry.into_path(),
                },
            );
        }

        debug!(
            base_dir = %base_dir.display(),
            files = files.len(),
            "Indexed project files"
        );
        Ok(Self { base_dir, files })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputFile> {
        self.files.values()
    }
}

impl FileIndex for ProjectFiles {
    type Handle = InputFile;

    /// Reported names are normalised (`./` prefix, `\` separators, `..`
    /// components); absolute names are made relative to the base directory.
    fn lookup(&self, file_name: &str) -> Option<InputFile> {
        let reported = Path::new(file_name);
        let key = if reported.is_absolute() {
            relative_key(&self.base_dir, reported).ok()?
        } else {
            normalize_report_path(file_name)
        };
        self.files.get(&key).cloned()
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::Config(format!("Invalid exclude pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::Config(format!("Invalid exclude patterns: {e}")))
}
