//! Shared data model for the merchant ledger
//!
//! This module contains the core types used throughout the system:
//! - `account` - Account value type and pure balance operations
//! - `transaction` - Transaction log records and posting shapes
//! - `request` - Validated request types
//! - `error` - Error taxonomy

pub mod account;
pub mod error;
pub mod request;
pub mod transaction;

/// Account identifier
pub type AccountId = u64;

/// Transaction identifier
pub type TransactionId = u64;

pub use account::{Account, AccountStatus};
pub use error::LedgerError;
pub use request::{CreateAccountRequest, TransactionRequest, AMOUNT_SCALE};
pub use transaction::{
    Posting, Transaction, TransactionDraft, TransactionStatus, TransactionSummary, TransactionType,
};
