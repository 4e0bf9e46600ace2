//! In-memory staging manifest and its binary codec
//!
//! A `Manifest` is a plain value: it is decoded from the whole index file at
//! the start of an operation, edited in memory and encoded back in full.
//! Entries are kept sorted by path and unique, which is also the order the
//! file format requires.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::cursor::Cursor;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_SIZE, HEADER_SIZE};
use crate::artifacts::objects::object::Packable;
use crate::errors::{Error, Result};
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    header: IndexHeader,
    entries: Vec<IndexEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::empty()
    }
}

impl Manifest {
    pub fn empty() -> Self {
        Manifest {
            header: IndexHeader::empty(),
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = IndexEntry>) -> Self {
        let mut manifest = Self::empty();
        for entry in entries {
            manifest.upsert(entry);
        }
        manifest
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.position(path).ok().map(|i| &self.entries[i])
    }

    /// Replace the entry with the same path in place, or insert it in order
    ///
    /// Returns the entry that was replaced, if any.
    pub fn upsert(&mut self, entry: IndexEntry) -> Option<IndexEntry> {
        let replaced = match self.position(&entry.path) {
            Ok(i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            Err(i) => {
                self.entries.insert(i, entry);
                None
            }
        };
        self.header.entries_count = self.entries.len() as u32;

        replaced
    }

    pub fn remove(&mut self, path: &str) -> Option<IndexEntry> {
        let removed = self.position(path).ok().map(|i| self.entries.remove(i));
        self.header.entries_count = self.entries.len() as u32;

        removed
    }

    /// Remove entries that cannot coexist with a file at `path`
    ///
    /// These are files named like one of its parent directories, and files
    /// below `path` when it used to be a directory.
    pub fn discard_conflicts(&mut self, path: &str) -> Vec<IndexEntry> {
        let parents = path
            .match_indices('/')
            .map(|(i, _)| &path[..i])
            .collect::<Vec<_>>();
        let children = format!("{path}/");

        let (conflicts, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| {
                parents.contains(&entry.path.as_str()) || entry.path.starts_with(&children)
            });
        self.entries = kept;
        self.header.entries_count = self.entries.len() as u32;

        conflicts
    }

    fn position(&self, path: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.path.as_bytes().cmp(path.as_bytes()))
    }

    /// Encode the full index file: header, sorted entries, raw SHA-1 trailer
    pub fn encode(&self) -> Result<Bytes> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));

        let header = IndexHeader {
            entries_count: entries.len() as u32,
            ..self.header.clone()
        };

        let mut writer = Checksum::new();
        writer.write(&header.serialize()?);
        for entry in entries {
            writer.write(&entry.serialize()?);
        }

        Ok(writer.write_checksum())
    }

    /// Decode a full index file
    ///
    /// The trailer is verified before any entry is parsed, so a corrupted file
    /// never yields a partial manifest.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE + CHECKSUM_SIZE {
            return Err(Error::TruncatedIndex {
                offset: 0,
                needed: HEADER_SIZE + CHECKSUM_SIZE,
                available: bytes.len(),
            });
        }

        let (content, checksum) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
        Checksum::verify(content, checksum)?;

        let mut cursor = Cursor::new(content, 0);
        let header = IndexHeader::parse(&mut cursor)?;

        let mut entries = Vec::with_capacity(header.entries_count as usize);
        for _ in 0..header.entries_count {
            entries.push(IndexEntry::parse(&mut cursor)?);
        }

        if cursor.remaining() > 0 {
            tracing::debug!(
                trailing = cursor.remaining(),
                "ignoring index extension data after entries"
            );
        }

        let mut manifest = Manifest::from_entries(entries);
        manifest.header.version = header.version;
        if manifest.len() != header.entries_count as usize {
            return Err(Error::MalformedIndex(format!(
                "header declares {} entries but {} distinct paths were found",
                header.entries_count,
                manifest.len()
            )));
        }

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::objects::digest::digest;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(
            path.to_string(),
            digest(path.as_bytes()),
            EntryMetadata {
                mode: 0o100644,
                size: path.len() as u32,
                ..Default::default()
            },
        )
    }

    #[fixture]
    fn manifest() -> Manifest {
        Manifest::from_entries(["c.txt", "a.txt", "b/d.txt"].map(entry))
    }

    #[test]
    fn empty_manifest_is_header_plus_checksum() {
        let bytes = Manifest::empty().encode().unwrap();

        pretty_assertions::assert_eq!(bytes.len(), HEADER_SIZE + CHECKSUM_SIZE);
        pretty_assertions::assert_eq!(&bytes[..12], b"DIRC\x00\x00\x00\x02\x00\x00\x00\x00");
        pretty_assertions::assert_eq!(Manifest::decode(&bytes).unwrap(), Manifest::empty());
    }

    #[rstest]
    fn entries_are_kept_sorted_by_path(manifest: Manifest) {
        let paths = manifest.entries().map(|e| e.path.as_str()).collect::<Vec<_>>();

        pretty_assertions::assert_eq!(paths, vec!["a.txt", "b/d.txt", "c.txt"]);
    }

    #[rstest]
    fn upsert_replaces_in_place(mut manifest: Manifest) {
        let mut changed = entry("a.txt");
        changed.oid = digest(b"new content");

        let replaced = manifest.upsert(changed.clone());

        pretty_assertions::assert_eq!(replaced, Some(entry("a.txt")));
        pretty_assertions::assert_eq!(manifest.len(), 3);
        pretty_assertions::assert_eq!(manifest.entry_by_path("a.txt"), Some(&changed));
    }

    #[rstest]
    fn remove_drops_only_the_named_path(mut manifest: Manifest) {
        pretty_assertions::assert_eq!(manifest.remove("b/d.txt"), Some(entry("b/d.txt")));
        pretty_assertions::assert_eq!(manifest.remove("b/d.txt"), None);
        pretty_assertions::assert_eq!(manifest.len(), 2);
    }

    #[rstest]
    fn files_replaced_by_directories_are_discarded(mut manifest: Manifest) {
        manifest.upsert(entry("b"));

        let discarded = manifest.discard_conflicts("b/d.txt/e.txt");

        pretty_assertions::assert_eq!(discarded, vec![entry("b"), entry("b/d.txt")]);
        pretty_assertions::assert_eq!(manifest.len(), 2);
    }

    #[rstest]
    fn directories_replaced_by_files_are_discarded(mut manifest: Manifest) {
        manifest.upsert(entry("b/e/f.txt"));

        let discarded = manifest.discard_conflicts("b");

        pretty_assertions::assert_eq!(discarded, vec![entry("b/d.txt"), entry("b/e/f.txt")]);
        pretty_assertions::assert_eq!(
            manifest.entries().map(|e| e.path.as_str()).collect::<Vec<_>>(),
            vec!["a.txt", "c.txt"]
        );
    }

    #[rstest]
    fn siblings_with_shared_prefixes_are_not_conflicts(mut manifest: Manifest) {
        manifest.upsert(entry("b.txt"));
        manifest.upsert(entry("bb/x"));

        assert!(manifest.discard_conflicts("b/new.txt").is_empty());
        pretty_assertions::assert_eq!(manifest.len(), 5);
    }

    #[rstest]
    fn decode_reads_back_what_encode_wrote(manifest: Manifest) {
        let bytes = manifest.encode().unwrap();

        pretty_assertions::assert_eq!(Manifest::decode(&bytes).unwrap(), manifest);
    }

    #[rstest]
    fn any_flipped_byte_before_the_trailer_is_detected(manifest: Manifest) {
        let bytes = manifest.encode().unwrap();

        for i in 0..bytes.len() - CHECKSUM_SIZE {
            let mut tampered = bytes.to_vec();
            tampered[i] ^= 0x01;

            assert!(
                matches!(
                    Manifest::decode(&tampered),
                    Err(Error::ChecksumMismatch { .. })
                ),
                "tampering byte {i} went unnoticed"
            );
        }
    }

    #[test]
    fn too_short_files_are_truncated() {
        assert!(matches!(
            Manifest::decode(b"DIRC\x00\x00\x00\x02"),
            Err(Error::TruncatedIndex { .. })
        ));
    }

    #[test]
    fn declared_entries_beyond_the_data_are_truncated() {
        // a valid checksum over a header that promises one entry but has none
        let mut writer = Checksum::new();
        writer.write(b"DIRC\x00\x00\x00\x02\x00\x00\x00\x01");
        let bytes = writer.write_checksum();

        assert!(matches!(
            Manifest::decode(&bytes),
            Err(Error::TruncatedIndex { offset: 12, .. })
        ));
    }

    #[test]
    fn bad_signature_with_valid_checksum_is_unsupported() {
        let mut writer = Checksum::new();
        writer.write(b"XIRC\x00\x00\x00\x02\x00\x00\x00\x00");
        let bytes = writer.write_checksum();

        assert!(matches!(
            Manifest::decode(&bytes),
            Err(Error::UnsupportedIndex(_))
        ));
    }

    fn any_entry() -> impl Strategy<Value = IndexEntry> {
        (
            "[a-z]{1,8}(/[a-z0-9_.]{1,12}){0,3}",
            proptest::array::uniform20(any::<u8>()),
            proptest::array::uniform10(any::<u32>()),
        )
            .prop_map(|(path, raw, stat)| {
                IndexEntry::new(
                    path,
                    crate::artifacts::objects::object_id::ObjectId::from_raw(&raw),
                    EntryMetadata {
                        ctime: stat[0],
                        ctime_nsec: stat[1],
                        mtime: stat[2],
                        mtime_nsec: stat[3],
                        dev: stat[4],
                        ino: stat[5],
                        mode: stat[6],
                        uid: stat[7],
                        gid: stat[8],
                        size: stat[9],
                    },
                )
            })
    }

    proptest! {
        #[test]
        fn round_trip_yields_entries_sorted_by_path(entries in proptest::collection::vec(any_entry(), 0..24)) {
            let manifest = Manifest::from_entries(entries.clone());
            let decoded = Manifest::decode(&manifest.encode().unwrap()).unwrap();

            let mut expected = entries
                .into_iter()
                .rev()
                .fold(Vec::<IndexEntry>::new(), |mut acc, e| {
                    if !acc.iter().any(|seen| seen.path == e.path) {
                        acc.push(e);
                    }
                    acc
                });
            expected.sort_by(|a, b| a.path.cmp(&b.path));

            prop_assert_eq!(decoded.into_entries(), expected);
        }
    }
}
