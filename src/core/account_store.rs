//! Thread-safe in-memory account storage
//!
//! This module provides `InMemoryAccountStore`, the reference implementation
//! of the [`AccountStore`] collaborator trait.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by account id, giving fine-grained
//! internal locking so lookups and upserts on different accounts never block
//! each other. Account ids are allocated from an atomic counter starting at 1.
//!
//! # Thread Safety
//!
//! All methods take `&self` and are safe to call from multiple threads
//! concurrently. Balance consistency is NOT this store's job: the engine
//! serializes balance mutations per account through its lock registry and
//! only calls `upsert` while holding the account's lock.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId};

/// In-memory account store backed by `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    /// Account records keyed by id
    accounts: DashMap<AccountId, Account>,

    /// Last allocated account id
    next_id: AtomicU64,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn allocate_id(&self) -> AccountId {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|entry| entry.value().clone())
    }

    fn upsert(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }
}
