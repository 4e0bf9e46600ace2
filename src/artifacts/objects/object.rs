//! Object codec
//!
//! Every object kind shares one wire format:
//!
//! ```text
//! <kind> SP <decimal payload length> NUL <payload>
//! ```
//!
//! The object ID is the SHA-1 of the whole wire form, so identical kind and
//! payload always produce the same ID.

use crate::artifacts::objects::digest::digest;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;
use std::io::BufRead;

/// Structured payloads (trees, commits) that serialize to raw object content
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Structured payloads that can be read back from raw object content
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// A payload that knows which kind of object it becomes
pub trait ObjectPayload: Packable {
    fn object_type(&self) -> ObjectType;

    fn to_object(&self) -> Result<Object> {
        Ok(Object::new(self.object_type(), self.serialize()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(self.to_object()?.object_id())
    }
}

/// An immutable, typed byte payload
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Object {
    kind: ObjectType,
    payload: Bytes,
}

impl Object {
    pub fn kind(&self) -> ObjectType {
        self.kind
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Build the wire form and name it
    pub fn encode(&self) -> (ObjectId, Bytes) {
        let header = format!("{} {}\0", self.kind.as_str(), self.payload.len());

        let mut wire = BytesMut::with_capacity(header.len() + self.payload.len());
        wire.put_slice(header.as_bytes());
        wire.put_slice(&self.payload);
        let wire = wire.freeze();

        (digest(&wire), wire)
    }

    pub fn object_id(&self) -> ObjectId {
        self.encode().0
    }

    /// Split a wire buffer back into kind and payload
    ///
    /// The declared length is parsed but not checked against the payload; the
    /// NUL delimiter alone decides where the payload starts.
    pub fn decode(wire: Bytes) -> Result<Self> {
        let nul = wire
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::MalformedObject("missing NUL after header".to_string()))?;

        let header = std::str::from_utf8(&wire[..nul])
            .map_err(|_| Error::MalformedObject("header is not valid UTF-8".to_string()))?;
        let (kind, size) = header.split_once(' ').ok_or_else(|| {
            Error::MalformedObject(format!("header {header:?} lacks a size field"))
        })?;

        let kind = ObjectType::try_from(kind)?;
        size.parse::<usize>()
            .map_err(|_| Error::MalformedObject(format!("invalid object size {size:?}")))?;

        Ok(Object::new(kind, wire.slice(nul + 1..)))
    }
}
