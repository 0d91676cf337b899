//! In-memory record store.
//!
//! Default backend for tests and for embedding without a persistence
//! engine. Keys are assigned from a monotonic counter and never reused
//! within one process, matching the behavior of the file-backed stores.

use super::traits::{RecordStore, TransactionRecord};
use crate::errors::LedgerError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryInner {
    records: BTreeMap<i64, TransactionRecord>,
    next_key: i64,
}

/// Record store holding everything in a `BTreeMap` behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn initialize(&self) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(i64, TransactionRecord)>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .records
            .iter()
            .map(|(key, record)| (*key, record.clone()))
            .collect())
    }

    async fn insert(&self, record: TransactionRecord) -> Result<i64, LedgerError> {
        let mut inner = self.inner.lock().await;
        inner.next_key += 1;
        let key = inner.next_key;
        inner.records.insert(key, record);
        Ok(key)
    }

    async fn put(&self, key: i64, record: TransactionRecord) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        if !inner.records.contains_key(&key) {
            return Err(LedgerError::NotFound(key));
        }
        inner.records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, key: i64) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        if inner.records.remove(&key).is_none() {
            return Err(LedgerError::NotFound(key));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        inner.records.clear();
        Ok(())
    }
}
