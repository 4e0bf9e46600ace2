//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path, relative to the working tree and `/`-separated
//! - Content hash (object ID of the blob)
//! - File metadata (mode, size, timestamps, device and inode)
//!
//! ## Entry Format
//!
//! ```text
//! ctime s | ctime ns | mtime s | mtime ns | dev | ino | mode | uid | gid | size   (10 x 4 bytes)
//! object ID (20 raw bytes)
//! flags (2 bytes, low 12 bits = path length)
//! path bytes, then 1..=8 NUL bytes up to the next 8-byte boundary
//! ```
//!
//! Every numeric field occupies 32 bits on disk; wider platform values are
//! truncated when the metadata is captured.

use crate::artifacts::index::cursor::Cursor;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;
use std::fs::Metadata;
use std::path::Path;

/// Size of the fixed-length part of an entry
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Largest path length the 12-bit flags field can describe
pub const MAX_PATH_SIZE: usize = 0x0FFF;

/// Number of NUL bytes after a path of `path_len` bytes
///
/// Always between 1 and 8: an entry that would already end on a boundary
/// still gets a full block of padding so the path stays NUL-terminated.
pub fn padding_len(path_len: usize) -> usize {
    ENTRY_BLOCK - (ENTRY_FIXED_SIZE + path_len) % ENTRY_BLOCK
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub path: String,
    /// SHA-1 hash of file content
    pub oid: ObjectId,
    /// File metadata (mode, size, timestamps)
    pub metadata: EntryMetadata,
}

/// Stat data captured when a file is staged
///
/// Platforms without device, inode or ownership information leave those
/// fields zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl IndexEntry {
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn entry_mode(&self) -> EntryMode {
        EntryMode::from_u32(self.metadata.mode)
    }

    /// Flags field: stage 0, no extended flags, low 12 bits = path length
    pub fn flags(&self) -> Result<u16> {
        if self.path.len() > MAX_PATH_SIZE {
            return Err(Error::PathTooLong(self.path.clone()));
        }

        Ok(self.path.len() as u16)
    }

    /// Total bytes this entry occupies on disk, padding included
    pub fn encoded_len(&self) -> usize {
        ENTRY_FIXED_SIZE + self.path.len() + padding_len(self.path.len())
    }

    /// Read one entry (fixed block, path and padding) from the cursor
    pub fn parse(cursor: &mut Cursor) -> Result<Self> {
        let metadata = EntryMetadata {
            ctime: cursor.read_u32()?,
            ctime_nsec: cursor.read_u32()?,
            mtime: cursor.read_u32()?,
            mtime_nsec: cursor.read_u32()?,
            dev: cursor.read_u32()?,
            ino: cursor.read_u32()?,
            mode: cursor.read_u32()?,
            uid: cursor.read_u32()?,
            gid: cursor.read_u32()?,
            size: cursor.read_u32()?,
        };

        let mut raw_oid = [0u8; RAW_OBJECT_ID_LENGTH];
        raw_oid.copy_from_slice(cursor.take(RAW_OBJECT_ID_LENGTH)?);
        let oid = ObjectId::from_raw(&raw_oid);

        let path_len = (cursor.read_u16()? as usize) & MAX_PATH_SIZE;
        let path = std::str::from_utf8(cursor.take(path_len)?)
            .map_err(|_| Error::MalformedIndex("entry path is not valid UTF-8".to_string()))?
            .to_string();
        cursor.skip(padding_len(path_len))?;

        Ok(IndexEntry {
            path,
            oid,
            metadata,
        })
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let flags = self.flags()?;
        let m = &self.metadata;

        let mut entry_bytes = BytesMut::with_capacity(self.encoded_len());
        for field in [
            m.ctime,
            m.ctime_nsec,
            m.mtime,
            m.mtime_nsec,
            m.dev,
            m.ino,
            m.mode,
            m.uid,
            m.gid,
            m.size,
        ] {
            entry_bytes.put_u32(field);
        }
        entry_bytes.put_slice(&self.oid.to_raw()?);
        entry_bytes.put_u16(flags);
        entry_bytes.put_slice(self.path.as_bytes());
        entry_bytes.put_bytes(0, padding_len(self.path.len()));

        Ok(entry_bytes.freeze())
    }
}

impl EntryMetadata {
    /// Capture stat data for a working-tree file, normalising its mode
    #[cfg(unix)]
    pub fn from_file(file_path: &Path, metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::of_file(file_path).as_u32(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        }
    }

    #[cfg(not(unix))]
    pub fn from_file(file_path: &Path, metadata: &Metadata) -> Self {
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(std::time::UNIX_EPOCH).ok())
            .unwrap_or_default();

        Self {
            ctime: mtime.as_secs() as u32,
            ctime_nsec: mtime.subsec_nanos(),
            mtime: mtime.as_secs() as u32,
            mtime_nsec: mtime.subsec_nanos(),
            mode: EntryMode::of_file(file_path).as_u32(),
            size: metadata.len() as u32,
            ..Default::default()
        }
    }
}
