//! Command implementations
//!
//! Each command is an `impl Repository` block in its own module, split the
//! way version-control tools usually are:
//!
//! - `plumbing`: Direct object and index access (hash-object, cat-file, ls-files, write-tree)
//! - `porcelain`: Everyday workflows (init, add, rm, commit, branch)
//!
//! Commands write their output to the repository's writer and return
//! `anyhow` errors carrying context for the user.

pub mod plumbing;
pub mod porcelain;
