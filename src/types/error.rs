//! Error types for the merchant ledger
//!
//! This module defines all error types that can occur while creating accounts,
//! applying transactions, or building statements.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: Referenced account or transaction does not exist
//! - **Validation Errors**: Malformed or contradictory request fields
//! - **Balance Errors**: A debit would drive a balance negative
//! - **Persistence Errors**: A concurrent insert won the same idempotency key
//!
//! No error is retried internally; the engine is fail-fast and leaves retry
//! policy to the caller. Retrying with the same idempotency key is always
//! safe and returns the original result.

use rust_decimal::Decimal;
use thiserror::Error;

use super::{AccountId, TransactionId};

/// Main error type for the merchant ledger
///
/// Each variant carries the context needed to diagnose the failure and to map
/// it onto the HTTP status the out-of-scope transport layer is expected to
/// return (see [`LedgerError::status_code`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A referenced account id does not resolve
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The account id that was not found
        account: AccountId,
    },

    /// A referenced transaction id does not resolve
    #[error("Transaction {tx} not found")]
    TransactionNotFound {
        /// The transaction id that was not found
        tx: TransactionId,
    },

    /// A request field is missing, forbidden, or malformed
    ///
    /// Always recoverable by the caller after fixing the named field; never
    /// retried automatically.
    #[error("Invalid request: {field} {message}")]
    InvalidRequest {
        /// Wire-format (camelCase) name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The request currency does not match an account's currency
    ///
    /// Currency comparison is case-insensitive; anything else is a mismatch.
    #[error("Currency mismatch for account {account}: account holds {expected}, request carries {requested}")]
    CurrencyMismatch {
        /// The account whose currency disagrees with the request
        account: AccountId,
        /// The account's currency
        expected: String,
        /// The currency supplied in the request
        requested: String,
    },

    /// A debit would make the account balance negative
    ///
    /// The operation is rejected before any state is mutated; for transfers
    /// neither side is touched.
    #[error("Insufficient funds for account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The account that would go negative
        account: AccountId,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// A concurrent insert won the race on a brand-new idempotency key
    ///
    /// The engine treats this as "return the winning transaction", so callers
    /// of the engine's create operation never observe it; it only surfaces
    /// from the log store's insert path.
    #[error("Idempotency key '{key}' already used")]
    DuplicateIdempotencyKey {
        /// The contended idempotency key
        key: String,
    },

    /// A credit would overflow the decimal balance representation
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account whose balance was being updated
        account: AccountId,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx: TransactionId) -> Self {
        LedgerError::TransactionNotFound { tx }
    }

    /// Create an InvalidRequest error for a named field
    pub fn invalid_request(field: &str, message: &str) -> Self {
        LedgerError::InvalidRequest {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a CurrencyMismatch error
    pub fn currency_mismatch(account: AccountId, expected: &str, requested: &str) -> Self {
        LedgerError::CurrencyMismatch {
            account,
            expected: expected.to_string(),
            requested: requested.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create a DuplicateIdempotencyKey error
    pub fn duplicate_idempotency_key(key: &str) -> Self {
        LedgerError::DuplicateIdempotencyKey {
            key: key.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// HTTP status the transport layer is expected to map this error to
    ///
    /// 400 validation error, 404 not found, 409 insufficient funds. The
    /// duplicate-key and overflow variants are internal conditions that a
    /// correct caller never sees; they map to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerError::AccountNotFound { .. } | LedgerError::TransactionNotFound { .. } => 404,
            LedgerError::InvalidRequest { .. } | LedgerError::CurrencyMismatch { .. } => 400,
            LedgerError::InsufficientFunds { .. } => 409,
            LedgerError::DuplicateIdempotencyKey { .. }
            | LedgerError::ArithmeticOverflow { .. } => 500,
        }
    }
}
