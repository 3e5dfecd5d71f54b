//! Per-account exclusive locks and the global lock ordering policy
//!
//! Balance mutations happen only under an account's exclusive lock. Two
//! concurrent transfers touching the same pair of accounts in opposite
//! "natural" order (A then B; B then A) would deadlock under exclusive
//! acquisition, so every two-account operation acquires its locks in
//! ascending-id order via [`lock_order`]. That makes lock acquisition a
//! strict total order across all operations and eliminates cyclic wait.
//!
//! Acquisition blocks the calling task until the lock is free; there is no
//! timeout. Any future operation touching more than one account must go
//! through [`lock_order`] or deadlock freedom is lost.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::AccountId;

/// Exclusive hold on one account, released on drop
pub type AccountGuard = OwnedMutexGuard<()>;

/// Return the pair `(a, b)` in ascending order
///
/// Pure function; both ids must refer to distinct accounts (request
/// validation rejects `from == to` before this is reached).
pub fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Keyed registry of per-account exclusive locks
///
/// One `tokio::sync::Mutex` per account id, created on first use and never
/// removed. Owned guards keep the hold alive independent of the registry
/// borrow, so the engine can carry them across await points and release on
/// any exit path by dropping them.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, id: AccountId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire the exclusive lock for one account
    ///
    /// Blocks the calling task until the lock is free.
    pub async fn acquire(&self, id: AccountId) -> AccountGuard {
        self.mutex_for(id).lock_owned().await
    }

    /// Acquire the exclusive locks for two distinct accounts
    ///
    /// Locks are taken in [`lock_order`] order regardless of argument order,
    /// which is what makes concurrent two-account operations deadlock-free.
    /// Guards are returned as `(lower-id, higher-id)`.
    pub async fn acquire_pair(&self, a: AccountId, b: AccountId) -> (AccountGuard, AccountGuard) {
        let (first, second) = lock_order(a, b);
        let first_guard = self.acquire(first).await;
        let second_guard = self.acquire(second).await;
        (first_guard, second_guard)
    }
}
