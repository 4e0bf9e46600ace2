//! Plumbing commands (low-level operations)
//!
//! Plumbing commands give direct access to the object store and the index.
//! They are meant for scripting and as building blocks for porcelain.
//!
//! ## Commands
//!
//! - `hash-object`: Compute an object ID and optionally store the object
//! - `cat-file`: Print an object's content, kind or size
//! - `ls-files`: List the staged paths
//! - `write-tree`: Store the index as tree objects

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod write_tree;
