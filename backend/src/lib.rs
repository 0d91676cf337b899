//! # Pocket Ledger Backend
//!
//! Transaction state core for the pocket ledger app: a record-store
//! abstraction, the transaction service built on top of it, and the
//! event-driven state machine that the rendering layer observes.
//!
//! The rendering layer, persistence engine and app bootstrapping live
//! outside this crate; they connect through [`storage::RecordStore`] on one
//! side and [`state::TransactionStateMachine`] on the other.

pub mod domain;
pub mod errors;
pub mod state;
pub mod storage;

pub use errors::{ErrorInfo, ErrorKind, LedgerError};
