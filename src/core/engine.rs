//! Transaction processing engine
//!
//! This module provides the LedgerEngine that orchestrates transaction
//! creation: idempotency resolution, per-account exclusive locking, the
//! balance mutation itself, and persistence into the transaction log.
//!
//! The engine enforces the ledger's invariants:
//! - A given idempotency key produces exactly one persisted transaction,
//!   however many times the request is retried
//! - No committed transaction ever drives a balance below zero
//! - A rejected operation persists nothing and mutates nothing
//! - Two-account operations acquire locks in ascending-id order, so
//!   concurrent transfers can never deadlock
//!
//! # Atomicity
//!
//! The log insert is the commit point. Account upserts happen after a
//! successful insert but before the locks are released, so no other
//! operation can observe the window between them. Idempotency is resolved
//! twice: a lock-free fast path before validation, and an under-lock
//! re-check before any balance mutation, so a retry that raced past the
//! fast path still replays the winner rather than re-applying the debit.
//! The insert itself rejects duplicate keys as a final backstop.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::locks::AccountLocks;
use crate::core::traits::{AccountStore, TransactionLog};
use crate::types::{
    Account, AccountId, LedgerError, Posting, Transaction, TransactionDraft, TransactionId,
    TransactionRequest,
};

/// Transaction processing engine
///
/// Generic over its storage collaborators so the same engine runs against
/// the in-memory stores in tests and a durable backend in deployment.
/// Cloneable; clones share the stores and the lock registry.
#[derive(Debug)]
pub struct LedgerEngine<A, L> {
    accounts: Arc<A>,
    log: Arc<L>,
    locks: Arc<AccountLocks>,
}

impl<A, L> Clone for LedgerEngine<A, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            log: Arc::clone(&self.log),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<A, L> LedgerEngine<A, L>
where
    A: AccountStore,
    L: TransactionLog,
{
    /// Create an engine over the given stores
    pub fn new(accounts: Arc<A>, log: Arc<L>) -> Self {
        Self {
            accounts,
            log,
            locks: Arc::new(AccountLocks::new()),
        }
    }

    /// Apply a transaction request against the ledger
    ///
    /// Retrying with the same idempotency key is always safe: the original
    /// transaction is returned unchanged and no balance moves twice.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidRequest`] for a malformed field combination,
    ///   non-positive amount, or malformed currency
    /// - [`LedgerError::AccountNotFound`] if a referenced account is missing
    /// - [`LedgerError::CurrencyMismatch`] if the request currency does not
    ///   match a touched account (case-insensitive)
    /// - [`LedgerError::InsufficientFunds`] if a debit would go negative;
    ///   nothing is persisted and no balance changes
    pub async fn create(&self, request: TransactionRequest) -> Result<Transaction, LedgerError> {
        // Idempotency fast path: a replayed key returns the original result
        // with no re-validation and no re-mutation.
        if let Some(existing) = self.log.find_by_idempotency_key(&request.idempotency_key) {
            debug!(
                idempotency_key = %request.idempotency_key,
                tx_id = existing.id,
                "idempotent replay, returning original transaction"
            );
            return Ok(existing);
        }

        let posting = request.validate()?;

        match posting {
            Posting::Credit { account } | Posting::Debit { account } => {
                self.apply_single(&request, posting, account).await
            }
            Posting::Transfer { from, to } => self.apply_transfer(&request, from, to).await,
        }
    }

    /// Look up a transaction by id
    ///
    /// Read-only; the log's append-only nature means no locking is needed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TransactionNotFound`] if the id does not
    /// resolve.
    pub fn get(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.log
            .find_by_id(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))
    }

    /// Apply a single-account credit or debit under that account's lock
    async fn apply_single(
        &self,
        request: &TransactionRequest,
        posting: Posting,
        account_id: AccountId,
    ) -> Result<Transaction, LedgerError> {
        let _guard = self.locks.acquire(account_id).await;

        // A retry that raced past the fast path serializes here behind the
        // winner, whose commit happened under this same lock. Re-checking
        // before mutating keeps the replayed call from failing against the
        // already-applied balance.
        if let Some(existing) = self.replayed(&request.idempotency_key) {
            return Ok(existing);
        }

        let account = self.load(account_id)?;
        check_currency(&account, &request.currency)?;

        let (updated, draft) = match posting {
            Posting::Debit { .. } => {
                let updated = account.debited(request.amount)?;
                let draft = TransactionDraft {
                    idempotency_key: request.idempotency_key.clone(),
                    tx_type: request.tx_type,
                    from_account_id: Some(account_id),
                    to_account_id: None,
                    amount: request.amount,
                    currency: account.currency.clone(),
                    from_balance_before: Some(account.balance),
                    from_balance_after: Some(updated.balance),
                    to_balance_before: None,
                    to_balance_after: None,
                    reference: request.reference.clone(),
                };
                (updated, draft)
            }
            _ => {
                let updated = account.credited(request.amount)?;
                let draft = TransactionDraft {
                    idempotency_key: request.idempotency_key.clone(),
                    tx_type: request.tx_type,
                    from_account_id: None,
                    to_account_id: Some(account_id),
                    amount: request.amount,
                    currency: account.currency.clone(),
                    from_balance_before: None,
                    from_balance_after: None,
                    to_balance_before: Some(account.balance),
                    to_balance_after: Some(updated.balance),
                    reference: request.reference.clone(),
                };
                (updated, draft)
            }
        };

        self.commit(draft, &[updated])
    }

    /// Apply a two-account transfer under both accounts' locks
    ///
    /// Locks are acquired in ascending-id order regardless of transfer
    /// direction. The debit is checked first; if it would go negative the
    /// whole operation aborts with neither side touched.
    async fn apply_transfer(
        &self,
        request: &TransactionRequest,
        from: AccountId,
        to: AccountId,
    ) -> Result<Transaction, LedgerError> {
        let _guards = self.locks.acquire_pair(from, to).await;

        if let Some(existing) = self.replayed(&request.idempotency_key) {
            return Ok(existing);
        }

        let from_account = self.load(from)?;
        let to_account = self.load(to)?;
        check_currency(&from_account, &request.currency)?;
        check_currency(&to_account, &request.currency)?;

        let from_updated = from_account.debited(request.amount)?;
        let to_updated = to_account.credited(request.amount)?;

        let draft = TransactionDraft {
            idempotency_key: request.idempotency_key.clone(),
            tx_type: request.tx_type,
            from_account_id: Some(from),
            to_account_id: Some(to),
            amount: request.amount,
            currency: from_account.currency.clone(),
            from_balance_before: Some(from_account.balance),
            from_balance_after: Some(from_updated.balance),
            to_balance_before: Some(to_account.balance),
            to_balance_after: Some(to_updated.balance),
            reference: request.reference.clone(),
        };

        self.commit(draft, &[from_updated, to_updated])
    }

    /// Check for an already-committed transaction under the given key
    ///
    /// Called with the account lock(s) held, which makes the check race-free:
    /// any winner committed under the same lock before it was released.
    fn replayed(&self, idempotency_key: &str) -> Option<Transaction> {
        let existing = self.log.find_by_idempotency_key(idempotency_key)?;
        debug!(
            idempotency_key,
            tx_id = existing.id,
            "idempotent replay resolved under lock, returning original transaction"
        );
        Some(existing)
    }

    fn load(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Persist the draft and, if it wins, the mutated accounts
    ///
    /// Must be called while the relevant account locks are held. The insert
    /// arbitrates the idempotency key: on a lost race the computed balances
    /// are discarded and the winning record is returned, per the contract
    /// that repeating a key is never an error.
    fn commit(
        &self,
        draft: TransactionDraft,
        updated: &[Account],
    ) -> Result<Transaction, LedgerError> {
        match self.log.insert(draft) {
            Ok(tx) => {
                for account in updated {
                    self.accounts.upsert(account.clone());
                }
                info!(
                    tx_id = tx.id,
                    tx_type = ?tx.tx_type,
                    from = ?tx.from_account_id,
                    to = ?tx.to_account_id,
                    amount = %tx.amount,
                    "transaction committed"
                );
                Ok(tx)
            }
            Err(LedgerError::DuplicateIdempotencyKey { key }) => {
                debug!(idempotency_key = %key, "lost idempotency race, returning winner");
                self.log
                    .find_by_idempotency_key(&key)
                    .ok_or(LedgerError::DuplicateIdempotencyKey { key })
            }
            Err(other) => Err(other),
        }
    }
}

fn check_currency(account: &Account, currency: &str) -> Result<(), LedgerError> {
    if !account.currency_matches(currency) {
        return Err(LedgerError::currency_mismatch(
            account.id,
            &account.currency,
            currency,
        ));
    }
    Ok(())
}
