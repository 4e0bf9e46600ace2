use crate::artifacts::index::cursor::Cursor;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::Packable;
use crate::errors::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) marker: [u8; 4],
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn empty() -> Self {
        IndexHeader {
            marker: *SIGNATURE,
            version: VERSION,
            entries_count: 0,
        }
    }

    /// Read and validate the 12-byte header
    pub(crate) fn parse(cursor: &mut Cursor) -> Result<Self> {
        let marker = cursor.take(4)?;
        if marker != SIGNATURE {
            return Err(Error::UnsupportedIndex(format!(
                "bad signature {:?}",
                String::from_utf8_lossy(marker)
            )));
        }

        let version = cursor.read_u32()?;
        if version != VERSION {
            return Err(Error::UnsupportedIndex(format!("version {version}")));
        }

        let entries_count = cursor.read_u32()?;

        Ok(IndexHeader {
            marker: *SIGNATURE,
            version,
            entries_count,
        })
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes> {
        let mut bytes = BytesMut::with_capacity(HEADER_SIZE);
        bytes.put_slice(&self.marker);
        bytes.put_u32(self.version);
        bytes.put_u32(self.entries_count);

        Ok(bytes.freeze())
    }
}
