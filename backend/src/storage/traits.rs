//! Storage abstraction for persisted transaction records.

use crate::errors::LedgerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::Transaction;

/// The fixed payload a record store persists for one transaction.
///
/// The key lives outside the record: it is assigned by the store on insert
/// and never round-trips through the payload. Field names are the stable
/// per-field identifiers of the on-disk encoding; renaming one breaks
/// compatibility with previously written data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub title: String,
    pub value: Decimal,
    pub date: DateTime<Utc>,
    pub is_expense: bool,
}

impl TransactionRecord {
    /// Attach a store-assigned key, producing the domain transaction.
    pub fn into_transaction(self, key: i64) -> Transaction {
        Transaction {
            id: Some(key),
            title: self.title,
            value: self.value,
            date: self.date,
            is_expense: self.is_expense,
        }
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            title: tx.title.clone(),
            value: tx.value,
            date: tx.date,
            is_expense: tx.is_expense,
        }
    }
}

/// Interface every record-store backend implements.
///
/// Records are keyed by an opaque integer assigned by the store on insert.
/// Backends serialize their own writes; the core does not lock around them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open or prepare the store. Idempotent.
    async fn initialize(&self) -> Result<(), LedgerError>;

    /// Snapshot of every record with its key, in storage order.
    async fn get_all(&self) -> Result<Vec<(i64, TransactionRecord)>, LedgerError>;

    /// Persist a new record and return the key the store assigned to it.
    async fn insert(&self, record: TransactionRecord) -> Result<i64, LedgerError>;

    /// Replace the record stored under `key`.
    ///
    /// Fails with [`LedgerError::NotFound`] if the key is absent.
    async fn put(&self, key: i64, record: TransactionRecord) -> Result<(), LedgerError>;

    /// Remove the record stored under `key`.
    ///
    /// Fails with [`LedgerError::NotFound`] if the key is absent.
    async fn delete(&self, key: i64) -> Result<(), LedgerError>;

    /// Remove every record. No-op success on an empty store.
    async fn clear(&self) -> Result<(), LedgerError>;
}
