//! Index file format
//!
//! The index (staging area) lists the files intended for the next commit.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length), sorted by path:
//!   - 62-byte fixed block (stat data, raw object ID, flags)
//!   - path bytes
//!   - 1 to 8 NUL bytes so each entry ends on an 8-byte boundary
//!
//! Checksum (20 bytes):
//!   - raw SHA-1 of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod cursor;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;
pub mod manifest;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;
