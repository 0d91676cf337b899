//! Transaction service: validated CRUD over a record store.
//!
//! Single source of truth for persisted transactions. Input validation runs
//! synchronously before any I/O so a bad request can never dirty the store.

use crate::errors::LedgerError;
use crate::storage::{RecordStore, TransactionRecord};
use chrono::Utc;
use log::info;
use rust_decimal::Decimal;
use shared::{LedgerConfig, NewTransaction, Transaction, ValidationError};
use std::sync::Arc;

pub struct TransactionService<S: RecordStore> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: RecordStore> Clone for TransactionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RecordStore> TransactionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Validate create/update input without touching the store.
    ///
    /// The title is judged after trimming; length is counted in code points.
    pub fn validate_input(&self, title: &str, value: Decimal) -> Result<(), ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > self.config.max_title_length {
            return Err(ValidationError::TitleTooLong(length));
        }
        if value <= Decimal::ZERO {
            return Err(ValidationError::AmountNotPositive);
        }
        if value > self.config.max_amount {
            return Err(ValidationError::AmountTooLarge(self.config.max_amount));
        }
        Ok(())
    }

    /// Snapshot of every persisted transaction, in storage order.
    pub async fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let records = self.store.get_all().await?;
        Ok(records
            .into_iter()
            .map(|(key, record)| record.into_transaction(key))
            .collect())
    }

    /// Validate and persist a new transaction, returning it with the key
    /// the store assigned.
    pub async fn add(&self, request: NewTransaction) -> Result<Transaction, LedgerError> {
        self.validate_input(&request.title, request.value)?;

        let record = TransactionRecord {
            title: request.title.trim().to_string(),
            value: request.value,
            date: request.date.unwrap_or_else(Utc::now),
            is_expense: request.is_expense,
        };
        let key = self.store.insert(record.clone()).await?;
        info!("Created transaction {} ({})", key, record.title);
        Ok(record.into_transaction(key))
    }

    /// Replace a persisted transaction by its id.
    pub async fn update(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        let key = transaction.id.ok_or(ValidationError::MissingId)?;
        self.validate_input(&transaction.title, transaction.value)?;

        self.store
            .put(key, TransactionRecord::from(transaction))
            .await?;
        info!("Updated transaction {}", key);
        Ok(())
    }

    /// Delete a persisted transaction by id.
    pub async fn delete(&self, id: i64) -> Result<(), LedgerError> {
        self.store.delete(id).await?;
        info!("Deleted transaction {}", id);
        Ok(())
    }

    /// Remove every transaction. No-op success on an empty store.
    pub async fn clear_all(&self) -> Result<(), LedgerError> {
        self.store.clear().await?;
        info!("Cleared all transactions");
        Ok(())
    }
}
