use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// How a tracked file differs from its staged version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileStatus {
    Modified,
    Deleted,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Modified => write!(f, "M"),
            FileStatus::Deleted => write!(f, "D"),
        }
    }
}

// Terminology:
// - untracked files: files in the working tree with no index entry
// - modified files: tracked files whose content or mode differs from the index
// - deleted files: tracked files that are no longer regular files in the working tree
impl Repository {
    /// Compare the working tree against the index
    ///
    /// Prints ` M <path>` and ` D <path>` for changed tracked files, then
    /// `?? <path>` for untracked files, each group in path order. The index
    /// is only read.
    pub fn status(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let manifest = self.index().read().context("failed to read the index")?;
        let tracked = manifest
            .entries()
            .map(|entry| (entry.path.as_str(), entry))
            .collect::<BTreeMap<_, _>>();

        let mut changed_files = BTreeMap::<String, FileStatus>::new();
        let mut untracked_files = BTreeSet::<String>::new();
        let mut seen = BTreeSet::<String>::new();

        for path in self.workspace().list_files(Path::new("."))? {
            let key = Workspace::index_key(&path)?;

            match tracked.get(key.as_str()) {
                Some(entry) => {
                    if self.is_modified(entry, &path)? {
                        changed_files.insert(key.clone(), FileStatus::Modified);
                    }
                    seen.insert(key);
                }
                None => {
                    untracked_files.insert(key);
                }
            }
        }

        for path in tracked.keys().filter(|path| !seen.contains(**path)) {
            changed_files.insert(path.to_string(), FileStatus::Deleted);
        }

        tracing::debug!(
            changed = changed_files.len(),
            untracked = untracked_files.len(),
            "compared working tree with the index"
        );

        for (path, status) in &changed_files {
            writeln!(self.writer(), " {status} {path}")?;
        }
        for path in &untracked_files {
            writeln!(self.writer(), "?? {path}")?;
        }

        Ok(())
    }

    fn is_modified(&self, entry: &IndexEntry, path: &Path) -> anyhow::Result<bool> {
        let metadata = self.workspace().stat_file(path)?;
        if metadata.mode != entry.metadata.mode || metadata.size != entry.metadata.size {
            return Ok(true);
        }

        let data = self.workspace().read_file(path)?;
        let oid = Object::new(ObjectType::Blob, data).object_id();

        Ok(oid != entry.oid)
    }
}
