//! Content-addressed objects
//!
//! Every object is stored as `<kind> <size>\0<payload>` and named by the SHA-1
//! of that encoding. Three kinds exist:
//!
//! - **Blob**: raw file content
//! - **Tree**: a directory listing (mode, name and object ID per entry)
//! - **Commit**: a tree snapshot plus parent, author and message
//!
//! `object` holds the codec shared by all kinds; `tree` and `commit` build the
//! payloads of the structured kinds.

pub mod commit;
pub mod digest;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const RAW_OBJECT_ID_LENGTH: usize = 20;

/// Shortest hash prefix accepted when looking objects up
pub const MIN_PREFIX_LENGTH: usize = 3;
