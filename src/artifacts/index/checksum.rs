use crate::artifacts::index::CHECKSUM_SIZE;
use crate::artifacts::objects::digest::raw_digest;
use crate::errors::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};

/// Buffer that hashes everything written to it and appends the digest on finish
#[derive(Debug, Clone, Default)]
pub struct Checksum {
    buffer: BytesMut,
    digest: Sha1,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, data: &[u8]) {
        self.buffer.put_slice(data);
        self.digest.update(data);
    }

    pub fn write_checksum(mut self) -> Bytes {
        let checksum = self.digest.finalize();
        self.buffer.put_slice(checksum.as_slice());
        self.buffer.freeze()
    }

    /// Compare the raw digest of `content` with the stored trailer
    pub fn verify(content: &[u8], expected: &[u8]) -> Result<()> {
        let actual = raw_digest(content);

        if expected.len() != CHECKSUM_SIZE || actual.as_slice() != expected {
            return Err(Error::ChecksumMismatch {
                expected: hex(expected),
                computed: hex(&actual),
            });
        }

        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
