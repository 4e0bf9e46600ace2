//! Object database
//!
//! Objects live under `objects/<xx>/<rest>`, where `xx` is the first two hex
//! characters of the object ID. Each file holds the zlib-compressed wire form
//! of the object. Files are written once, through a temporary file that is
//! renamed into place, and never modified or deleted afterwards.

use crate::artifacts::objects::object::{Object, ObjectPayload};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store a payload as an object of the given kind and return its ID
    ///
    /// Storing content that is already present is a no-op.
    pub fn put(&self, kind: ObjectType, payload: Bytes) -> Result<ObjectId> {
        self.store_object(&Object::new(kind, payload))
    }

    /// Store a structured payload (tree, commit)
    pub fn store(&self, payload: &impl ObjectPayload) -> Result<ObjectId> {
        self.store_object(&payload.to_object()?)
    }

    pub fn store_object(&self, object: &Object) -> Result<ObjectId> {
        let (object_id, wire) = object.encode();
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::NotFound(format!("parent of {}", object_path.display())))?;
        std::fs::create_dir_all(object_dir).map_err(Error::storage(object_dir))?;

        self.write_object(&object_path, wire)?;
        tracing::debug!(oid = %object_id, kind = %object.kind(), size = object.size(), "stored object");

        Ok(object_id)
    }

    /// Look an object up by an abbreviated (at least 3 characters) or full ID
    pub fn get(&self, prefix: &str) -> Result<Object> {
        let object_id = self.resolve(prefix)?;
        self.load(&object_id)
    }

    /// Expand a hash prefix to the single object ID it names
    pub fn resolve(&self, prefix: &str) -> Result<ObjectId> {
        if prefix.len() < MIN_PREFIX_LENGTH
            || prefix.len() > OBJECT_ID_LENGTH
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidPrefix(prefix.to_string()));
        }

        let prefix = prefix.to_ascii_lowercase();
        let mut candidates = self.find_objects_by_prefix(&prefix)?;

        match candidates.len() {
            0 => Err(Error::NotFound(format!("object {prefix}"))),
            1 => Ok(candidates.remove(0)),
            _ => {
                candidates.sort();
                Err(Error::AmbiguousPrefix { prefix, candidates })
            }
        }
    }

    /// Load an object by its full ID
    pub fn load(&self, object_id: &ObjectId) -> Result<Object> {
        let object_path = self.path.join(object_id.to_path());
        let wire = self.read_object(&object_path)?;

        Object::decode(wire)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Find all objects whose ID starts with the given prefix
    ///
    /// Only the shard directory named by the first two characters is listed.
    /// Files that are not named like an object (such as temporary files left
    /// by an interrupted write) are skipped.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);

        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path).map_err(Error::storage(&dir_path))? {
            let entry = entry.map_err(Error::storage(&dir_path))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }

        Ok(matches)
    }

    fn read_object(&self, object_path: &Path) -> Result<Bytes> {
        let compressed = std::fs::read(object_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("object file {}", object_path.display()))
            } else {
                Error::StorageError {
                    path: object_path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::decompress(&compressed).map_err(Error::storage(object_path))
    }

    fn write_object(&self, object_path: &Path, wire: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::NotFound(format!("parent of {}", object_path.display())))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(&wire).map_err(Error::storage(object_path))?;

        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .and_then(|mut file| file.write_all(&compressed))
            // rename the temp file to the object file to make it atomic
            .and_then(|_| std::fs::rename(&temp_object_path, object_path));

        if let Err(source) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(Error::StorageError {
                path: temp_object_path,
                source,
            });
        }

        Ok(())
    }

    pub(crate) fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    pub(crate) fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> PathBuf {
        PathBuf::from(format!("tmp-obj-{}", rand::random::<u32>()))
    }
}
