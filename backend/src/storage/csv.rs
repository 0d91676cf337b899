//! CSV-backed record store.
//!
//! One file per record kind; the header row carries the stable per-field
//! identifiers (`id,title,value,date,is_expense`), so previously written
//! data stays readable as long as the columns keep their names. Every write
//! rewrites the whole file through a temp-file rename, which keeps a crash
//! from leaving a half-written ledger behind.

use super::traits::{RecordStore, TransactionRecord};
use crate::errors::LedgerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::{info, warn};
use rust_decimal::Decimal;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = ["id", "title", "value", "date", "is_expense"];

/// Record store persisting transactions to a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    file_path: PathBuf,
}

impl CsvRecordStore {
    /// Create a store backed by `file_path`. The file is created on
    /// [`RecordStore::initialize`].
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn storage_err(context: &str, err: impl std::fmt::Display) -> LedgerError {
        LedgerError::Storage(format!("{}: {}", context, err))
    }

    fn read_records(&self) -> Result<Vec<(i64, TransactionRecord)>, LedgerError> {
        let file = File::open(&self.file_path)
            .map_err(|e| Self::storage_err("opening transactions file", e))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result.map_err(|e| Self::storage_err("reading transactions file", e))?;
            records.push(Self::parse_row(&row)?);
        }
        Ok(records)
    }

    fn parse_row(row: &csv::StringRecord) -> Result<(i64, TransactionRecord), LedgerError> {
        let field = |index: usize| {
            row.get(index)
                .ok_or_else(|| LedgerError::Storage(format!("row is missing column {}", index)))
        };

        let key = field(0)?
            .parse::<i64>()
            .map_err(|e| Self::storage_err("parsing record id", e))?;
        let title = field(1)?.to_string();
        let value = field(2)?
            .parse::<Decimal>()
            .map_err(|e| Self::storage_err("parsing record value", e))?;
        let date = DateTime::parse_from_rfc3339(field(3)?)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Self::storage_err("parsing record date", e))?;
        let is_expense = field(4)?
            .parse::<bool>()
            .map_err(|e| Self::storage_err("parsing record direction", e))?;

        Ok((
            key,
            TransactionRecord {
                title,
                value,
                date,
                is_expense,
            },
        ))
    }

    fn write_records(&self, records: &[(i64, TransactionRecord)]) -> Result<(), LedgerError> {
        let temp_path = self.file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| Self::storage_err("creating temp transactions file", e))?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer
                .write_record(HEADER)
                .map_err(|e| Self::storage_err("writing header", e))?;
            for (key, record) in records {
                csv_writer
                    .write_record(&[
                        key.to_string(),
                        record.title.clone(),
                        record.value.to_string(),
                        record.date.to_rfc3339(),
                        record.is_expense.to_string(),
                    ])
                    .map_err(|e| Self::storage_err("writing record", e))?;
            }
            csv_writer
                .flush()
                .map_err(|e| Self::storage_err("flushing transactions file", e))?;
        }

        // Atomic move from temp to final file
        std::fs::rename(&temp_path, &self.file_path)
            .map_err(|e| Self::storage_err("replacing transactions file", e))
    }

    fn next_key(records: &[(i64, TransactionRecord)]) -> i64 {
        records.iter().map(|(key, _)| *key).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn initialize(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Self::storage_err("creating data directory", e))?;
        }
        if !self.file_path.exists() {
            info!("Creating transactions file at {:?}", self.file_path);
            self.write_records(&[])?;
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(i64, TransactionRecord)>, LedgerError> {
        self.read_records()
    }

    async fn insert(&self, record: TransactionRecord) -> Result<i64, LedgerError> {
        let mut records = self.read_records()?;
        let key = Self::next_key(&records);
        records.push((key, record));
        self.write_records(&records)?;
        info!("Stored transaction {}", key);
        Ok(key)
    }

    async fn put(&self, key: i64, record: TransactionRecord) -> Result<(), LedgerError> {
        let mut records = self.read_records()?;
        match records.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = record,
            None => {
                warn!("Transaction {} not found for update", key);
                return Err(LedgerError::NotFound(key));
            }
        }
        self.write_records(&records)
    }

    async fn delete(&self, key: i64) -> Result<(), LedgerError> {
        let mut records = self.read_records()?;
        let initial_len = records.len();
        records.retain(|(existing, _)| *existing != key);
        if records.len() == initial_len {
            warn!("Transaction {} not found for deletion", key);
            return Err(LedgerError::NotFound(key));
        }
        self.write_records(&records)?;
        info!("Deleted transaction {}", key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        self.write_records(&[])
    }
}
