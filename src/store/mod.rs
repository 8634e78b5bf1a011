//! Embedded document store for fitlog
//!
//! Collections of JSON documents over an append-only, checksum-verified
//! journal. The data model is insert-only (users and exercises are never
//! updated or deleted), so the journal is the storage file: opening
//! replays it into memory, and every insert appends one record.
//!
//! # Invariants
//!
//! - Every record carries a CRC32 checksum; corruption refuses to load
//! - An insert is acknowledged only after the journal append is fsynced
//! - Declared unique fields are enforced atomically with the insert
//! - Reads observe insertion order

mod checksum;
mod errors;
mod filter;
mod journal;
mod record;
mod store;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StoreError, StoreResult};
pub use filter::{sort_ascending, Filter, FilterOp, Predicate};
pub use journal::{Journal, JOURNAL_FILE};
pub use record::JournalRecord;
pub use store::{CollectionSpec, DocumentStore};
