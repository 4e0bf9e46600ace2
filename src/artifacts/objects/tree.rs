//! Tree objects
//!
//! Trees snapshot a directory. The payload is a sequence of records:
//!
//! ```text
//! <octal mode> SP <name> NUL <20-byte raw object ID>
//! ```
//!
//! Records are ordered by name, with directories compared as if their name
//! ended in `/`. Trees are built from the staging manifest, one object per
//! directory, and stored children-first so every referenced ID exists.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{ObjectPayload, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;
use std::io::BufRead;

#[derive(Debug, Clone)]
enum TreeEntry {
    File { mode: EntryMode, oid: ObjectId },
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File { mode, .. } => *mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> Result<ObjectId> {
        match self {
            TreeEntry::File { oid, .. } => Ok(oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree under construction from index entries
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Keyed by name; directory keys carry a trailing `/` so that the map
    /// order matches the tree record order
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build the root tree from a flat, path-keyed list of index entries
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let mut components = entry.path.split('/').collect::<Vec<_>>();
            let name = components.pop().unwrap_or_default();
            root.add_entry(&components, name, entry)?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, parents: &[&str], name: &str, entry: &IndexEntry) -> Result<()> {
        match parents.split_first() {
            None => {
                if self.entries.contains_key(&format!("{name}/")) {
                    return Err(Self::conflict(name));
                }
                self.entries.insert(
                    name.to_string(),
                    TreeEntry::File {
                        mode: entry.entry_mode(),
                        oid: entry.oid.clone(),
                    },
                );
            }
            Some((parent, rest)) => {
                if self.entries.contains_key(*parent) {
                    return Err(Self::conflict(parent));
                }
                let subtree = self
                    .entries
                    .entry(format!("{parent}/"))
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match subtree {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, name, entry)?,
                    TreeEntry::File { .. } => return Err(Self::conflict(parent)),
                }
            }
        }

        Ok(())
    }

    fn conflict(name: &str) -> Error {
        Error::MalformedIndex(format!(
            "{name} is staged both as a file and as a directory"
        ))
    }

    /// Visit every tree depth-first, children before parents
    pub fn traverse<F>(&self, func: &mut F) -> Result<()>
    where
        F: FnMut(&Tree) -> Result<()>,
    {
        for entry in self.entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }

        func(self)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = BytesMut::new();

        for (name, entry) in &self.entries {
            let name = name.trim_end_matches('/');
            content.put_slice(format!("{} {}\0", entry.mode().as_str(), name).as_bytes());
            content.put_slice(&entry.oid()?.to_raw()?);
        }

        Ok(content.freeze())
    }
}

impl ObjectPayload for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

/// One record of a stored tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    pub mode: u32,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeRecord {
    pub fn object_type(&self) -> ObjectType {
        if EntryMode::from_u32(self.mode).is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}

impl std::fmt::Display for TreeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:06o} {} {}\t{}",
            self.mode,
            self.object_type(),
            self.oid,
            self.name
        )
    }
}

/// Records of a tree read back from the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    records: Vec<TreeRecord>,
}

impl TreeListing {
    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }
}

impl Unpackable for TreeListing {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let malformed = |what: &str| Error::MalformedObject(format!("tree record: {what}"));
        let mut records = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader
                .read_until(b' ', &mut mode_bytes)
                .map_err(|_| malformed("unreadable mode"))?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(malformed("unexpected end in mode"));
            }
            let mode = std::str::from_utf8(&mode_bytes)
                .ok()
                .and_then(|mode| u32::from_str_radix(mode, 8).ok())
                .ok_or_else(|| malformed("mode is not octal"))?;

            name_bytes.clear();
            reader
                .read_until(b'\0', &mut name_bytes)
                .map_err(|_| malformed("unreadable name"))?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(malformed("unexpected end in name"));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| malformed("name is not valid UTF-8"))?;

            let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
            reader
                .read_exact(&mut raw)
                .map_err(|_| malformed("unexpected end in object ID"))?;

            records.push(TreeRecord {
                mode,
                name,
                oid: ObjectId::from_raw(&raw),
            });
        }

        Ok(TreeListing { records })
    }
}

impl std::fmt::Display for TreeListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}
