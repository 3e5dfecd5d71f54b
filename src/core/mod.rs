//! Core business logic module
//!
//! This module contains the core ledger components:
//! - `traits` - Collaborator traits for account storage and the transaction log
//! - `locks` - Lock ordering policy and per-account exclusive locks
//! - `engine` - Transaction creation orchestration
//! - `accounts` - Account opening and balance reads
//! - `statement` - Statement projection over the log
//! - `account_store` / `transaction_log` - In-memory reference stores

pub mod account_store;
pub mod accounts;
pub mod engine;
pub mod locks;
pub mod statement;
pub mod traits;
pub mod transaction_log;

pub use account_store::InMemoryAccountStore;
pub use accounts::{AccountService, BalanceSummary};
pub use engine::LedgerEngine;
pub use locks::{lock_order, AccountLocks};
pub use statement::{Statement, StatementBuilder, StatementEntry};
pub use traits::{AccountStore, TransactionLog};
pub use transaction_log::InMemoryTransactionLog;
