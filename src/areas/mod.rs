//! Repository storage areas
//!
//! - `database`: Content-addressed object store under `.git/objects`
//! - `index`: Staging area, read and rewritten whole under an `index.lock`
//! - `refs`: Branch files and HEAD
//! - `repository`: Wires the areas together for the commands
//! - `workspace`: Working tree files

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
