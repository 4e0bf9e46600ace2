//! Typed failures of the object store and the staging index
//!
//! The core never prints or exits; every failure is returned to the caller as
//! one of these variants. Command implementations wrap them with
//! `anyhow::Context` before they reach the user.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A working-tree path or a stored object does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A hash prefix names more than one stored object
    #[error("short object ID {prefix} is ambiguous ({} candidates)", candidates.len())]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("hash prefix {0:?} must be at least 3 hexadecimal characters")]
    InvalidPrefix(String),

    #[error("invalid object ID {0:?}")]
    InvalidObjectId(String),

    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The trailing digest of the index disagrees with its content
    #[error("index checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },

    #[error("index truncated: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedIndex {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unsupported index: {0}")]
    UnsupportedIndex(String),

    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("path {0:?} is too long to be stored in the index")]
    PathTooLong(String),

    /// Unstage was requested for a path that is still in the working tree
    #[error("{0} still exists in the working tree")]
    StillPresent(PathBuf),

    #[error("unable to create {0}: another process holds the index lock")]
    IndexLocked(PathBuf),

    #[error("invalid branch name {0:?}")]
    InvalidBranchName(String),

    #[error("a branch named {0:?} already exists")]
    BranchExists(String),

    #[error("{0} is not set")]
    MissingIdentity(&'static str),

    #[error("I/O error on {}: {source}", path.display())]
    StorageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::StorageError { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
