//! On-disk data structures
//!
//! - `index`: Binary staging manifest (header, entries, checksum)
//! - `objects`: Content-addressed objects (blob, tree, commit) and their codec

pub mod index;
pub mod objects;
