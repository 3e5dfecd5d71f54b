//! Collaborator traits for account storage and the transaction log
//!
//! The engine treats durable storage as an external collaborator and only
//! depends on these traits. The in-memory implementations in this crate back
//! them with `DashMap`; a durable deployment would back them with a database
//! and keep the same contracts.
//!
//! Exclusive access to an account is deliberately NOT part of the store
//! contract: the engine owns a keyed lock registry (see [`crate::core::locks`])
//! and only touches an account's balance while holding that account's lock.

use chrono::{DateTime, Utc};

use crate::types::{Account, AccountId, LedgerError, Transaction, TransactionDraft, TransactionId};

/// Durable keyed storage of account records
pub trait AccountStore: Send + Sync {
    /// Allocate the next unused account id
    fn allocate_id(&self) -> AccountId;

    /// Point lookup of an account
    fn get(&self, id: AccountId) -> Option<Account>;

    /// Insert or replace an account record
    ///
    /// Callers mutating a balance must hold that account's exclusive lock;
    /// the store itself does not enforce this.
    fn upsert(&self, account: Account);
}

/// Durable append-only storage of transaction records
///
/// Records are immutable once inserted; there is no update or delete.
pub trait TransactionLog: Send + Sync {
    /// Persist a draft, assigning its id and creation timestamp
    ///
    /// The insert is atomic with respect to the idempotency key: of two
    /// racing inserts with the same key exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateIdempotencyKey`] if the key is already
    /// present in the log.
    fn insert(&self, draft: TransactionDraft) -> Result<Transaction, LedgerError>;

    /// Point lookup by transaction id
    fn find_by_id(&self, id: TransactionId) -> Option<Transaction>;

    /// Point lookup by idempotency key
    fn find_by_idempotency_key(&self, key: &str) -> Option<Transaction>;

    /// All transactions in which `account` participates on either side,
    /// restricted to the half-open window `[from, to)` when bounds are
    /// given, ordered by creation time ascending
    fn find_by_account(
        &self,
        account: AccountId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Transaction>;
}
