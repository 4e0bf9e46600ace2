//! Branch references and HEAD
//!
//! ## File Format
//!
//! - `HEAD` holds `ref: refs/heads/<branch>` followed by a newline
//! - `refs/heads/<branch>` holds the 40-character tip commit ID followed by a
//!   newline
//!
//! A branch file that does not exist yet (a fresh repository) or is empty
//! has no tip.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch HEAD points at in a fresh repository
pub const DEFAULT_BRANCH: &str = "master";

const SYMREF_PREFIX: &str = "ref: refs/heads/";

const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

static INVALID_BRANCH_NAME: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(INVALID_BRANCH_NAME_REGEX).ok());

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    pub fn validate_branch_name(name: &str) -> Result<()> {
        let invalid = match INVALID_BRANCH_NAME.as_ref() {
            Some(re) => re.is_match(name),
            None => true,
        };

        if name.is_empty() || invalid {
            return Err(Error::InvalidBranchName(name.to_string()));
        }

        Ok(())
    }

    /// Name of the branch HEAD points at
    pub fn current_branch(&self) -> Result<String> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("{} (not a repository?)", head_path.display()))
            } else {
                Error::storage(&head_path)(err)
            }
        })?;

        content
            .trim_end()
            .strip_prefix(SYMREF_PREFIX)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::NotFound(format!("branch in {} ({:?})", head_path.display(), content))
            })
    }

    /// Tip commit of a branch, or `None` while the branch has no commits
    pub fn read_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name);
        let content = match std::fs::read_to_string(&branch_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::storage(&branch_path)(err)),
        };

        match content.trim() {
            "" => Ok(None),
            hex => ObjectId::try_parse(hex.to_string()).map(Some),
        }
    }

    /// Tip commit of the current branch
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        self.read_branch(&self.current_branch()?)
    }

    /// Point a branch at a commit, replacing the branch file atomically
    pub fn update_branch(&self, name: &str, oid: &ObjectId) -> Result<()> {
        self.write_ref_file(&self.heads_path().join(name), &format!("{oid}\n"))?;
        tracing::debug!(branch = name, %oid, "updated branch");

        Ok(())
    }

    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        self.update_branch(&self.current_branch()?, oid)
    }

    pub fn set_head(&self, name: &str) -> Result<()> {
        Self::validate_branch_name(name)?;
        self.write_ref_file(&self.head_path(), &format!("{SYMREF_PREFIX}{name}\n"))
    }

    /// Create a branch at the current tip commit
    pub fn create_branch(&self, name: &str) -> Result<ObjectId> {
        Self::validate_branch_name(name)?;

        // check whether another branch with the same name already exists
        if self.heads_path().join(name).exists() {
            return Err(Error::BranchExists(name.to_string()));
        }

        let tip = self
            .read_head()?
            .ok_or_else(|| Error::NotFound("a commit to branch from".to_string()))?;
        self.update_branch(name, &tip)?;

        Ok(tip)
    }

    /// All branch names, `/`-separated and sorted
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let heads_path = self.heads_path();
        if !heads_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                Self::validate_branch_name(&name).ok().map(|_| name)
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::NotFound(format!("parent of {}", path.display())))?;
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(parent).map_err(Error::storage(parent))?;

        let temp_path = parent.join(format!("tmp-ref-{}", rand::random::<u32>()));
        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .and_then(|mut file| file.write_all(content.as_bytes()))
            .and_then(|_| std::fs::rename(&temp_path, path));

        if let Err(source) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(Error::StorageError {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }
}
