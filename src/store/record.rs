//! On-disk record layout for the document journal
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes this field and the checksum)
//! +------------------+
//! | Collection       | (length-prefixed string)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! The checksum covers all bytes before it, including the length prefix.
//! The data model is insert-only, so there is no tombstone flag and no
//! in-place update path.

use std::io::{self, Read};

use super::checksum::compute_checksum;
use super::errors::{StoreError, StoreResult};

/// One persisted document insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    /// Collection the document belongs to
    pub collection: String,
    /// Document primary key (`_id`)
    pub document_id: String,
    /// Full JSON document body
    pub body: Vec<u8>,
}

impl JournalRecord {
    /// Creates a record for a live document.
    pub fn new(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
            body,
        }
    }

    fn serialize_fields(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(&(self.collection.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.collection.as_bytes());

        buf.extend_from_slice(&(self.document_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.document_id.as_bytes());

        buf.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }

    /// Serializes the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let fields = self.serialize_fields();
        let record_length = (4 + fields.len() + 4) as u32;

        let mut checksum_data = Vec::with_capacity(4 + fields.len());
        checksum_data.extend_from_slice(&record_length.to_le_bytes());
        checksum_data.extend_from_slice(&fields);
        let checksum = compute_checksum(&checksum_data);

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&fields);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserializes one record from the head of `data`, verifying the
    /// checksum. `offset` is the record's byte position in the journal,
    /// used only for error reporting.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8], offset: u64) -> StoreResult<(Self, usize)> {
        // len + 3 empty length-prefixed fields + checksum
        const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 4 + 4;

        if data.len() < MIN_RECORD_SIZE {
            return Err(StoreError::corrupted(
                offset,
                format!("truncated record header: {} bytes remain", data.len()),
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(StoreError::corrupted(
                offset,
                format!("invalid record length {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(StoreError::corrupted(
                offset,
                format!(
                    "truncated record: expected {} bytes, {} remain",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(StoreError::corrupted(
                offset,
                format!(
                    "checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);
        let collection = read_string(&mut cursor)
            .map_err(|e| StoreError::corrupted(offset, format!("bad collection field: {}", e)))?;
        let document_id = read_string(&mut cursor)
            .map_err(|e| StoreError::corrupted(offset, format!("bad document id field: {}", e)))?;
        let body = read_bytes(&mut cursor)
            .map_err(|e| StoreError::corrupted(offset, format!("bad body field: {}", e)))?;

        Ok((
            Self {
                collection,
                document_id,
                body,
            },
            record_length,
        ))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let bytes = read_bytes(reader)?;
    String::from_utf8(bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {}", e)))
}
