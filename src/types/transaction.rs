//! Transaction-related types for the merchant ledger
//!
//! This module defines the five transaction types, the immutable Transaction
//! log record with its before/after balance snapshots, the draft the engine
//! hands to the log store for persistence, and the Posting shape the five
//! request types collapse to.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, TransactionId};

/// Transaction types supported by the ledger
///
/// Deposits and refunds credit a single account, withdrawals and fees debit a
/// single account, and transfers move funds between two accounts atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Credit funds to an account
    Deposit,
    /// Debit funds from an account (requires sufficient balance)
    Withdrawal,
    /// Move funds from one account to another atomically
    Transfer,
    /// Debit a fee from an account; executed exactly like a withdrawal
    Fee,
    /// Credit funds back to an account; executed exactly like a deposit
    Refund,
}

/// Terminal outcome of a transaction
///
/// The engine does not model a pending or partial state: an operation either
/// fully applies and is logged as `Completed`, or it is rejected before any
/// mutation is persisted and no record exists at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// The mutation was applied and persisted
    Completed,
}

/// The mutation shape a validated request collapses to
///
/// Five request types reduce to three shapes, so the engine only ever
/// branches on "one account" vs "two accounts", never on five cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posting {
    /// Add `amount` to one account's balance (DEPOSIT, REFUND)
    Credit {
        /// Account to credit
        account: AccountId,
    },
    /// Subtract `amount` from one account's balance (WITHDRAWAL, FEE)
    Debit {
        /// Account to debit
        account: AccountId,
    },
    /// Debit `from` and credit `to` as one atomic unit (TRANSFER)
    Transfer {
        /// Account to debit
        from: AccountId,
        /// Account to credit
        to: AccountId,
    },
}

/// An immutable entry in the transaction log
///
/// Once persisted a Transaction is never updated or deleted; the log is
/// append-only and its `created_at` order is the ledger's total order. The
/// before/after balance snapshots are captured atomically with the mutation,
/// so the full balance history of an account can be reconstructed from its
/// log entries alone. The unset side of a single-account transaction carries
/// `None` in its account id and both balance fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, assigned at persistence
    pub id: TransactionId,

    /// Caller-supplied deduplication key, globally unique
    pub idempotency_key: String,

    /// What kind of mutation this entry records
    pub tx_type: TransactionType,

    /// Debited account, set for WITHDRAWAL, FEE, and TRANSFER
    pub from_account_id: Option<AccountId>,

    /// Credited account, set for DEPOSIT, REFUND, and TRANSFER
    pub to_account_id: Option<AccountId>,

    /// Strictly positive amount, scale 4
    pub amount: Decimal,

    /// 3-letter currency code, equal to that of every account touched
    pub currency: String,

    /// Terminal outcome
    pub status: TransactionStatus,

    /// Debited account's balance before the mutation
    pub from_balance_before: Option<Decimal>,

    /// Debited account's balance after the mutation
    pub from_balance_after: Option<Decimal>,

    /// Credited account's balance before the mutation
    pub to_balance_before: Option<Decimal>,

    /// Credited account's balance after the mutation
    pub to_balance_after: Option<Decimal>,

    /// Free-text caller annotation
    pub reference: Option<String>,

    /// Persistence timestamp; the log's total order
    pub created_at: DateTime<Utc>,
}

/// A fully-computed transaction awaiting persistence
///
/// The engine builds a draft under the account lock(s); the log store assigns
/// `id` and `created_at` at insert and enforces idempotency-key uniqueness.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Caller-supplied deduplication key
    pub idempotency_key: String,
    /// What kind of mutation this records
    pub tx_type: TransactionType,
    /// Debited account, if any
    pub from_account_id: Option<AccountId>,
    /// Credited account, if any
    pub to_account_id: Option<AccountId>,
    /// Strictly positive amount, scale 4
    pub amount: Decimal,
    /// 3-letter currency code
    pub currency: String,
    /// Debited account's balance before the mutation
    pub from_balance_before: Option<Decimal>,
    /// Debited account's balance after the mutation
    pub from_balance_after: Option<Decimal>,
    /// Credited account's balance before the mutation
    pub to_balance_before: Option<Decimal>,
    /// Credited account's balance after the mutation
    pub to_balance_after: Option<Decimal>,
    /// Free-text caller annotation
    pub reference: Option<String>,
}

/// Response summary returned to the caller after a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Id of the persisted transaction
    pub transaction_id: TransactionId,
    /// Terminal outcome
    pub status: TransactionStatus,
    /// Debited side's balance after the mutation, if any
    pub from_balance_after: Option<Decimal>,
    /// Credited side's balance after the mutation, if any
    pub to_balance_after: Option<Decimal>,
    /// Persistence timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionSummary {
    fn from(tx: &Transaction) -> Self {
        TransactionSummary {
            transaction_id: tx.id,
            status: tx.status,
            from_balance_after: tx.from_balance_after,
            to_balance_after: tx.to_balance_after,
            created_at: tx.created_at,
        }
    }
}
