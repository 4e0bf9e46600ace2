//! Content addressing
//!
//! SHA-1 over arbitrary bytes. Object identity uses the hex form, the index
//! trailer uses the raw 20 bytes; the two never mix.

use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use sha1::{Digest, Sha1};

/// Hex digest of `bytes`, as used to name objects
pub fn digest(bytes: &[u8]) -> ObjectId {
    ObjectId::from_raw(&raw_digest(bytes))
}

/// Raw 20-byte digest of `bytes`, as stored in the index trailer
pub fn raw_digest(bytes: &[u8]) -> [u8; RAW_OBJECT_ID_LENGTH] {
    let mut hasher = Sha1::new();
    hasher.update(bytes);

    let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
    raw.copy_from_slice(hasher.finalize().as_slice());
    raw
}
