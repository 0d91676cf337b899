//! # Storage
//!
//! The record-store seam between the transaction core and whatever
//! persistence engine the app embeds. The domain layer only ever talks to
//! [`RecordStore`]; backends are interchangeable.

mod csv;
mod memory;
mod traits;

pub use csv::CsvRecordStore;
pub use memory::MemoryRecordStore;
pub use traits::{RecordStore, TransactionRecord};
