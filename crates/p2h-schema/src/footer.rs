//! Reading the schema document embedded in a Parquet footer.
//!
//! A Parquet file ends with `[footer][footer length: i32 LE][magic: 4 bytes]`.
//! The footer is a thrift-compact `FileMetaData` whose first key-value entry
//! holds the writer's schema as JSON.

use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use log::debug;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};
use parquet::file::metadata::ParquetMetaDataReader;
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};

/// Size of the fixed trailer that closes every Parquet file.
pub const FOOTER_TRAILER_SIZE: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterTrailer {
    pub footer_length: i32,
    pub magic: [u8; 4],
}

impl FooterTrailer {
    pub fn decode(bytes: &[u8; 8]) -> Self {
        let [l0, l1, l2, l3, m0, m1, m2, m3] = *bytes;
        Self {
            footer_length: i32::from_le_bytes([l0, l1, l2, l3]),
            magic: [m0, m1, m2, m3],
        }
    }

    pub fn try_from_slice(bytes: &[u8]) -> SchemaResult<Self> {
        let bytes: &[u8; 8] = bytes.try_into().map_err(|_| {
            SchemaError::malformed(format!(
                "expected {FOOTER_TRAILER_SIZE} trailer bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::decode(bytes))
    }

    pub fn encode(&self) -> [u8; 8] {
        let [l0, l1, l2, l3] = self.footer_length.to_le_bytes();
        let [m0, m1, m2, m3] = self.magic;
        [l0, l1, l2, l3, m0, m1, m2, m3]
    }

    pub fn footer_length(&self) -> SchemaResult<u64> {
        u64::try_from(self.footer_length).map_err(|_| {
            SchemaError::malformed(format!("negative footer length: {}", self.footer_length))
        })
    }

    /// The offset of the first footer byte in a file of `total_length` bytes.
    pub fn footer_offset(&self, total_length: u64) -> SchemaResult<u64> {
        let length = self.footer_length()?;
        total_length
            .checked_sub(FOOTER_TRAILER_SIZE)
            .and_then(|n| n.checked_sub(length))
            .ok_or_else(|| {
                SchemaError::malformed(format!(
                    "footer length {length} exceeds file size {total_length}"
                ))
            })
    }

    pub fn footer_range(&self, total_length: u64) -> SchemaResult<Range<u64>> {
        let start = self.footer_offset(total_length)?;
        Ok(start..start + self.footer_length()?)
    }
}

fn trailer_range(total_length: u64) -> SchemaResult<Range<u64>> {
    if total_length < FOOTER_TRAILER_SIZE {
        return Err(SchemaError::malformed(format!(
            "file of {total_length} bytes is too small to hold a footer"
        )));
    }
    Ok(total_length - FOOTER_TRAILER_SIZE..total_length)
}

/// Decodes footer bytes and parses the first key-value metadata entry as JSON.
pub fn decode_schema_document(footer: &[u8]) -> SchemaResult<Value> {
    let metadata = ParquetMetaDataReader::decode_metadata(footer)
        .map_err(|e| SchemaError::malformed(e.to_string()))?;
    let entry = metadata
        .file_metadata()
        .key_value_metadata()
        .and_then(|entries| entries.first())
        .ok_or_else(|| SchemaError::malformed("no key-value metadata in footer"))?;
    let value = entry.value.as_deref().ok_or_else(|| {
        SchemaError::malformed(format!("no value for metadata key {}", entry.key))
    })?;
    debug!("Reading schema from metadata key {}", entry.key);
    serde_json::from_str(value).map_err(|e| {
        SchemaError::malformed(format!("invalid schema JSON under {}: {e}", entry.key))
    })
}

/// Reads the schema document from a local seekable source.
pub fn read_schema_from_reader<R: Read + Seek>(mut reader: R) -> SchemaResult<Value> {
    let total_length = reader.seek(SeekFrom::End(0))?;
    let range = trailer_range(total_length)?;
    reader.seek(SeekFrom::Start(range.start))?;
    let mut trailer = [0u8; 8];
    reader.read_exact(&mut trailer)?;

    let range = FooterTrailer::decode(&trailer).footer_range(total_length)?;
    reader.seek(SeekFrom::Start(range.start))?;
    let length = usize::try_from(range.end - range.start)
        .map_err(|_| SchemaError::malformed("footer does not fit in memory"))?;
    let mut footer = vec![0u8; length];
    reader.read_exact(&mut footer)?;
    decode_schema_document(&footer)
}

/// Reads the schema document of an object whose size is already known.
///
/// This issues two ranged reads: the trailer, then the footer it points to.
pub async fn read_schema(store: &dyn ObjectStore, object: &ObjectMeta) -> SchemaResult<Value> {
    let total_length = object.size;
    let trailer = store
        .get_range(&object.location, trailer_range(total_length)?)
        .await?;
    let range = FooterTrailer::try_from_slice(&trailer)?.footer_range(total_length)?;
    debug!(
        "Fetching footer bytes {}..{} of {}",
        range.start, range.end, object.location
    );
    let footer = store.get_range(&object.location, range).await?;
    decode_schema_document(&footer)
}

/// Reads the schema document of an object, looking up its size first.
pub async fn read_schema_at(store: &dyn ObjectStore, location: &Path) -> SchemaResult<Value> {
    let object = store.head(location).await?;
    read_schema(store, &object).await
}
