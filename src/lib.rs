//! A content-addressable object store and binary staging index
//!
//! The crate is laid out in three layers:
//!
//! - [`artifacts`]: pure data structures and their byte formats
//! - [`areas`]: the on-disk stores built from them (objects, index, refs, working tree)
//! - [`commands`]: user-facing operations composed from the areas

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
