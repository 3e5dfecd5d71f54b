//! Thread-safe in-memory transaction log
//!
//! This module provides `InMemoryTransactionLog`, the reference implementation
//! of the [`TransactionLog`] collaborator trait.
//!
//! # Append-Only
//!
//! A record, once inserted, is never updated or deleted. Readers therefore
//! never need to coordinate with writers beyond `DashMap`'s own guarantees.
//!
//! # Idempotency Arbitration
//!
//! The log is the arbiter of idempotency-key uniqueness. `insert` reserves
//! the key in a secondary index before the record is written and holds the
//! index entry's shard lock until the record is visible, so of two racing
//! inserts with the same key exactly one succeeds and the other observes
//! a fully-written winner.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::core::traits::TransactionLog;
use crate::types::{
    AccountId, LedgerError, Transaction, TransactionDraft, TransactionId, TransactionStatus,
};

/// In-memory append-only transaction log backed by `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    /// Transaction records keyed by id
    transactions: DashMap<TransactionId, Transaction>,

    /// Idempotency key -> transaction id index; uniqueness arbiter
    key_index: DashMap<String, TransactionId>,

    /// Last allocated transaction id
    next_id: AtomicU64,
}

impl InMemoryTransactionLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the log holds no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn insert(&self, draft: TransactionDraft) -> Result<Transaction, LedgerError> {
        let mut fresh = false;
        let mut slot = self
            .key_index
            .entry(draft.idempotency_key.clone())
            .or_insert_with(|| {
                fresh = true;
                0
            });

        if !fresh {
            return Err(LedgerError::duplicate_idempotency_key(
                &draft.idempotency_key,
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let tx = Transaction {
            id,
            idempotency_key: draft.idempotency_key,
            tx_type: draft.tx_type,
            from_account_id: draft.from_account_id,
            to_account_id: draft.to_account_id,
            amount: draft.amount,
            currency: draft.currency,
            status: TransactionStatus::Completed,
            from_balance_before: draft.from_balance_before,
            from_balance_after: draft.from_balance_after,
            to_balance_before: draft.to_balance_before,
            to_balance_after: draft.to_balance_after,
            reference: draft.reference,
            created_at: Utc::now(),
        };

        self.transactions.insert(id, tx.clone());
        // Publish the key mapping only once the record itself is readable.
        *slot.value_mut() = id;

        Ok(tx)
    }

    fn find_by_id(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id).map(|entry| entry.value().clone())
    }

    fn find_by_idempotency_key(&self, key: &str) -> Option<Transaction> {
        let id = *self.key_index.get(key)?.value();
        self.find_by_id(id)
    }

    fn find_by_account(
        &self,
        account: AccountId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Transaction> {
        let mut matches: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|entry| {
                let tx = entry.value();
                let participates = tx.from_account_id == Some(account)
                    || tx.to_account_id == Some(account);
                let after_from = from.map_or(true, |bound| tx.created_at >= bound);
                let before_to = to.map_or(true, |bound| tx.created_at < bound);
                participates && after_from && before_to
            })
            .map(|entry| entry.value().clone())
            .collect();

        // created_at can collide at clock resolution; the monotonically
        // assigned id breaks the tie in insertion order.
        matches.sort_by_key(|tx| (tx.created_at, tx.id));
        matches
    }
}
