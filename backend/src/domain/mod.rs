//! # Domain
//!
//! Business logic over the record store: the validated transaction service
//! and the pure balance helpers.

pub mod balance_service;
pub mod transaction_service;

pub use transaction_service::TransactionService;
