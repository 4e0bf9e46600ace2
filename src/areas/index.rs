//! Staging area
//!
//! The index file is never held open between operations. Each operation
//! reads the whole file into a [`Manifest`], edits it in memory and writes it
//! back in full.
//!
//! ## Locking
//!
//! Writers first create `index.lock` next to the index with create-exclusive
//! semantics. The new manifest is written into the lock file, which is then
//! renamed over the index. An existing lock file means another writer is
//! active and the operation fails with [`Error::IndexLocked`]. The lock file
//! is removed whenever a write does not complete.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::manifest::Manifest;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    lock_path: Box<Path>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        let lock_path = path.with_extension("lock").into_boxed_path();
        Index { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the manifest from disk
    ///
    /// A missing or zero-length index file is an empty manifest.
    pub fn read(&self) -> Result<Manifest> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(Error::storage(&*self.path)(err)),
        };

        if bytes.is_empty() {
            return Ok(Manifest::empty());
        }

        let manifest = Manifest::decode(&bytes)?;
        tracing::trace!(entries = manifest.len(), "read index");

        Ok(manifest)
    }

    /// Store a working-tree file as a blob and record it in the index
    pub fn stage(&self, workspace: &Workspace, database: &Database, path: &Path) -> Result<IndexEntry> {
        let mut staged = self.stage_all(workspace, database, &[path.to_path_buf()])?;

        staged
            .pop()
            .ok_or_else(|| Error::NotFound(format!("staged entry for {}", path.display())))
    }

    /// Stage several files with a single index rewrite
    pub fn stage_all(
        &self,
        workspace: &Workspace,
        database: &Database,
        paths: &[PathBuf],
    ) -> Result<Vec<IndexEntry>> {
        let entries = Self::build_entries(workspace, database, paths)?;
        self.apply(&entries, &[])?;

        Ok(entries)
    }

    /// Drop a deleted file from the index
    ///
    /// Returns the removed entry; an untracked path leaves the index untouched.
    pub fn unstage(&self, workspace: &Workspace, path: &Path) -> Result<Option<IndexEntry>> {
        let mut removed = self.unstage_all(workspace, &[path.to_path_buf()])?;

        Ok(removed.pop())
    }

    pub fn unstage_all(&self, workspace: &Workspace, paths: &[PathBuf]) -> Result<Vec<IndexEntry>> {
        let mut keys = Vec::with_capacity(paths.len());
        for path in paths {
            if workspace.exists(path) {
                return Err(Error::StillPresent(path.clone()));
            }
            keys.push(Workspace::index_key(path)?);
        }

        self.apply(&[], &keys)
    }

    /// Stage `staged` and drop `removed` in one index rewrite
    ///
    /// A removed path may have become a directory, but it must no longer be a
    /// regular file. Returns the staged and the removed entries.
    pub fn update(
        &self,
        workspace: &Workspace,
        database: &Database,
        staged: &[PathBuf],
        removed: &[PathBuf],
    ) -> Result<(Vec<IndexEntry>, Vec<IndexEntry>)> {
        let mut keys = Vec::with_capacity(removed.len());
        for path in removed {
            if workspace.is_file(path) {
                return Err(Error::StillPresent(path.clone()));
            }
            keys.push(Workspace::index_key(path)?);
        }

        let entries = Self::build_entries(workspace, database, staged)?;
        let removed = self.apply(&entries, &keys)?;

        Ok((entries, removed))
    }

    /// Store the blobs of `paths` and describe them as index entries
    fn build_entries(
        workspace: &Workspace,
        database: &Database,
        paths: &[PathBuf],
    ) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let key = Workspace::index_key(path)?;
            let metadata = workspace.stat_file(path)?;
            let data = workspace.read_file(path)?;
            let oid = database.put(ObjectType::Blob, data)?;

            entries.push(IndexEntry::new(key, oid, metadata));
        }

        Ok(entries)
    }

    /// Remove `keys`, then upsert `entries`, under a single lock
    ///
    /// The index is rewritten only if something changed. Returns the entries
    /// removed by key.
    fn apply(&self, entries: &[IndexEntry], keys: &[String]) -> Result<Vec<IndexEntry>> {
        let lock = IndexLock::acquire(&self.lock_path)?;
        let mut manifest = self.read()?;

        let removed = keys
            .iter()
            .filter_map(|key| manifest.remove(key))
            .inspect(|entry| tracing::debug!(path = %entry.path, "unstaged file"))
            .collect::<Vec<_>>();

        for entry in entries {
            for conflict in manifest.discard_conflicts(&entry.path) {
                tracing::debug!(path = %conflict.path, replaced_by = %entry.path, "unstaged conflicting entry");
            }
            match manifest.upsert(entry.clone()) {
                Some(previous) if previous.oid != entry.oid => {
                    tracing::debug!(path = %entry.path, oid = %entry.oid, "restaged modified file");
                }
                Some(_) => tracing::trace!(path = %entry.path, "refreshed staged file"),
                None => tracing::debug!(path = %entry.path, oid = %entry.oid, "staged new file"),
            }
        }

        if !entries.is_empty() || !removed.is_empty() {
            lock.commit(&manifest, &self.path)?;
        }

        Ok(removed)
    }
}

/// Exclusive claim on `index.lock`, released on drop unless committed
#[derive(Debug)]
struct IndexLock<'p> {
    path: &'p Path,
    file: std::fs::File,
    committed: bool,
}

impl<'p> IndexLock<'p> {
    fn acquire(path: &'p Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::AlreadyExists => Error::IndexLocked(path.to_path_buf()),
                _ => Error::storage(path)(err),
            })?;

        Ok(IndexLock {
            path,
            file,
            committed: false,
        })
    }

    /// Write the manifest into the lock file and move it over the index
    fn commit(mut self, manifest: &Manifest, index_path: &Path) -> Result<()> {
        let bytes = manifest.encode()?;

        self.file
            .write_all(&bytes)
            .and_then(|_| self.file.sync_all())
            .map_err(Error::storage(self.path))?;
        std::fs::rename(self.path, index_path).map_err(Error::storage(index_path))?;
        self.committed = true;

        tracing::debug!(entries = manifest.len(), bytes = bytes.len(), "wrote index");
        Ok(())
    }
}

impl Drop for IndexLock<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(self.path);
        }
    }
}
