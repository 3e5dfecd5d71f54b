//! Merchant Ledger Library
//! # Overview
//!
//! This library maintains monetary account balances and a tamper-evident
//! transaction log for a multi-merchant ledger. It applies deposits,
//! withdrawals, transfers, fees, and refunds with exactly-once semantics
//! under duplicate client retries, rejects any debit that would drive a
//! balance negative, and records an immutable audit trail carrying
//! before/after balance snapshots for every account a transaction touches.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, requests, errors)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Transaction creation orchestration
//!   - [`core::locks`] - Lock ordering policy and per-account exclusive locks
//!   - [`core::accounts`] - Account opening and balance reads
//!   - [`core::statement`] - Statement projection over the log
//!   - [`core::traits`] - Storage collaborator contracts, with in-memory
//!     reference implementations alongside
//!
//! # Transaction Types
//!
//! The engine supports five transaction types collapsing to three mutation
//! shapes:
//!
//! - **Deposit** / **Refund**: Credit funds to one account
//! - **Withdrawal** / **Fee**: Debit funds from one account (requires
//!   sufficient balance)
//! - **Transfer**: Debit one account and credit another as one atomic unit
//!
//! # Concurrency
//!
//! Every balance mutation happens under that account's exclusive lock.
//! Transfers lock both accounts in ascending-id order, making lock
//! acquisition a strict total order and concurrent transfers deadlock-free.
//! The transport layer is out of scope: callers hand the engine validated,
//! strongly-typed requests and map [`types::LedgerError`] onto their own
//! status codes via [`types::LedgerError::status_code`].

// Module declarations
pub mod core;
pub mod types;

pub use crate::core::{
    AccountService, AccountStore, BalanceSummary, InMemoryAccountStore, InMemoryTransactionLog,
    LedgerEngine, Statement, StatementBuilder, StatementEntry, TransactionLog,
};
pub use crate::types::{
    Account, AccountId, AccountStatus, CreateAccountRequest, LedgerError, Posting, Transaction,
    TransactionId, TransactionRequest, TransactionStatus, TransactionSummary, TransactionType,
};
