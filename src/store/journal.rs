//! Append-only journal holding every document insert
//!
//! A single file, `records.log`, inside the data directory. Appends are
//! flushed and fsynced before the insert is acknowledged. Opening
//! replays the whole file; a checksum mismatch or truncated tail
//! refuses to load instead of silently dropping records.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::errors::StoreResult;
use super::record::JournalRecord;

/// Journal file name inside the data directory.
pub const JOURNAL_FILE: &str = "records.log";

/// Append-only record journal.
pub struct Journal {
    file: File,
    path: PathBuf,
}

impl Journal {
    /// Opens (creating if needed) the journal in `data_dir` and replays
    /// it, returning the journal handle and every stored record in
    /// append order.
    pub fn open(data_dir: &Path) -> StoreResult<(Self, Vec<JournalRecord>)> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(JOURNAL_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        let records = replay(&raw)?;

        Ok((Self { file, path }, records))
    }

    /// Appends one record, flushes, and fsyncs.
    pub fn append(&mut self, record: &JournalRecord) -> StoreResult<()> {
        let bytes = record.serialize();
        self.file.write_all(&bytes)?;
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn replay(raw: &[u8]) -> StoreResult<Vec<JournalRecord>> {
    let mut records = Vec::new();
    let mut offset = 0usize;
    while offset < raw.len() {
        let (record, consumed) = JournalRecord::deserialize(&raw[offset..], offset as u64)?;
        records.push(record);
        offset += consumed;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use tempfile::TempDir;

    fn record(id: &str) -> JournalRecord {
        JournalRecord::new("users", id, format!(r#"{{"_id":"{}"}}"#, id).into_bytes())
    }

    #[test]
    fn test_empty_journal_replays_nothing() {
        let dir = TempDir::new().unwrap();
        let (_, records) = Journal::open(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_appends_replay_in_order() {
        let dir = TempDir::new().unwrap();
        {
            let (mut journal, _) = Journal::open(dir.path()).unwrap();
            journal.append(&record("a")).unwrap();
            journal.append(&record("b")).unwrap();
            journal.append(&record("c")).unwrap();
        }

        let (_, records) = Journal::open(dir.path()).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.document_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncated_tail_refuses_to_load() {
        let dir = TempDir::new().unwrap();
        {
            let (mut journal, _) = Journal::open(dir.path()).unwrap();
            journal.append(&record("a")).unwrap();
            journal.append(&record("b")).unwrap();
        }

        let path = dir.path().join(JOURNAL_FILE);
        let contents = std::fs::read(&path).unwrap();
        std::fs::write(&path, &contents[..contents.len() - 5]).unwrap();

        let result = Journal::open(dir.path());
        assert!(matches!(result, Err(StoreError::Corrupted { .. })));
    }

    #[test]
    fn test_corrupted_middle_record_refuses_to_load() {
        let dir = TempDir::new().unwrap();
        {
            let (mut journal, _) = Journal::open(dir.path()).unwrap();
            journal.append(&record("a")).unwrap();
            journal.append(&record("b")).unwrap();
        }

        let path = dir.path().join(JOURNAL_FILE);
        let mut contents = std::fs::read(&path).unwrap();
        let mid = contents.len() / 2;
        contents[mid] ^= 0xFF;
        std::fs::write(&path, &contents).unwrap();

        assert!(Journal::open(dir.path()).is_err());
    }
}
