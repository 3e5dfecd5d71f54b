//! Account opening and balance reads
//!
//! Account creation is the only write path outside the transaction engine;
//! after creation an account's balance changes exclusively through the
//! engine, under that account's lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, AccountStatus, CreateAccountRequest, LedgerError};

/// Point-in-time balance view of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// The account queried
    pub account_id: AccountId,
    /// Balance at `as_of`
    pub balance: Decimal,
    /// The account's currency
    pub currency: String,
    /// When the balance was read
    pub as_of: DateTime<Utc>,
}

/// Account opening and balance lookup service
#[derive(Debug)]
pub struct AccountService<A> {
    accounts: Arc<A>,
}

impl<A> Clone for AccountService<A> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
        }
    }
}

impl<A> AccountService<A>
where
    A: AccountStore,
{
    /// Create a service over the given account store
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    /// Open a new account
    ///
    /// The account starts `Active` with the requested opening balance. The
    /// currency is stored uppercased; matching stays case-insensitive either
    /// way.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] for a blank merchant id,
    /// malformed currency, or negative opening balance.
    pub fn open(&self, request: CreateAccountRequest) -> Result<Account, LedgerError> {
        request.validate()?;

        let account = Account {
            id: self.accounts.allocate_id(),
            merchant_id: request.merchant_id,
            balance: request.initial_balance,
            currency: request.currency.to_ascii_uppercase(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        self.accounts.upsert(account.clone());

        info!(
            account_id = account.id,
            merchant_id = %account.merchant_id,
            currency = %account.currency,
            "account opened"
        );
        Ok(account)
    }

    /// Read an account's current balance
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the id does not resolve.
    pub fn balance(&self, id: AccountId) -> Result<BalanceSummary, LedgerError> {
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        Ok(BalanceSummary {
            account_id: account.id,
            balance: account.balance,
            currency: account.currency,
            as_of: Utc::now(),
        })
    }
}
