//! Statement projection over the transaction log
//!
//! A statement is a read-only view of the ledger restricted to one account
//! and an optional date range: every transaction the account participates
//! in, signed from that account's perspective and annotated with the
//! before/after balance snapshots captured at commit time. Because the log
//! is append-only and snapshots are immutable, the projection needs no
//! locking and never mutates state.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::traits::{AccountStore, TransactionLog};
use crate::types::{AccountId, LedgerError, Transaction, TransactionId, TransactionType};

/// One signed, balance-annotated statement line
///
/// `amount` is negative when the account is the debited side and positive
/// when it is the credited side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementEntry {
    /// The underlying log record
    pub transaction_id: TransactionId,
    /// Transaction type of the record
    pub tx_type: TransactionType,
    /// Signed amount from this account's perspective
    pub amount: Decimal,
    /// This account's balance before the transaction
    pub balance_before: Decimal,
    /// This account's balance after the transaction
    pub balance_after: Decimal,
    /// Caller annotation carried from the request
    pub reference: Option<String>,
    /// Commit timestamp of the record
    pub created_at: DateTime<Utc>,
}

/// Statement for one account over an optional date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// The account the statement describes
    pub account_id: AccountId,
    /// The account's current balance (not the range-end balance)
    pub balance: Decimal,
    /// The account's currency
    pub currency: String,
    /// Entries in ascending creation-time order
    pub entries: Vec<StatementEntry>,
}

/// Projects the transaction log into per-account statements
#[derive(Debug)]
pub struct StatementBuilder<A, L> {
    accounts: Arc<A>,
    log: Arc<L>,
}

impl<A, L> Clone for StatementBuilder<A, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            log: Arc::clone(&self.log),
        }
    }
}

impl<A, L> StatementBuilder<A, L>
where
    A: AccountStore,
    L: TransactionLog,
{
    /// Create a builder over the given stores
    pub fn new(accounts: Arc<A>, log: Arc<L>) -> Self {
        Self { accounts, log }
    }

    /// Build the statement for one account
    ///
    /// `from` and `to` are inclusive calendar days; they are widened to the
    /// half-open timestamp window `[from 00:00, to + 1 day 00:00)` in UTC
    /// before querying the log. Either bound may be omitted.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the account does not
    /// exist.
    pub fn build(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Statement, LedgerError> {
        let account = self
            .accounts
            .get(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        let from_ts = from.map(start_of_day);
        let to_ts = to
            .and_then(|date| date.checked_add_days(Days::new(1)))
            .map(start_of_day);

        let entries = self
            .log
            .find_by_account(account_id, from_ts, to_ts)
            .iter()
            .filter_map(|tx| entry_for(account_id, tx))
            .collect();

        Ok(Statement {
            account_id,
            balance: account.balance,
            currency: account.currency,
            entries,
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Project one log record from `account_id`'s perspective
///
/// The range query is already scoped to the account, so a record matching
/// neither side (or missing its snapshots) cannot occur; such a record is
/// dropped rather than given a fabricated entry.
fn entry_for(account_id: AccountId, tx: &Transaction) -> Option<StatementEntry> {
    if tx.from_account_id == Some(account_id) {
        Some(StatementEntry {
            transaction_id: tx.id,
            tx_type: tx.tx_type,
            amount: -tx.amount,
            balance_before: tx.from_balance_before?,
            balance_after: tx.from_balance_after?,
            reference: tx.reference.clone(),
            created_at: tx.created_at,
        })
    } else if tx.to_account_id == Some(account_id) {
        Some(StatementEntry {
            transaction_id: tx.id,
            tx_type: tx.tx_type,
            amount: tx.amount,
            balance_before: tx.to_balance_before?,
            balance_after: tx.to_balance_after?,
            reference: tx.reference.clone(),
            created_at: tx.created_at,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_store::InMemoryAccountStore;
    use crate::core::transaction_log::InMemoryTransactionLog;
    use crate::types::{
        Account, AccountStatus, TransactionDraft, TransactionStatus,
    };
    use rust_decimal_macros::dec;

    fn fixture() -> (
        StatementBuilder<InMemoryAccountStore, InMemoryTransactionLog>,
        Arc<InMemoryAccountStore>,
        Arc<InMemoryTransactionLog>,
    ) {
        let accounts = Arc::new(InMemoryAccountStore::new());
        let log = Arc::new(InMemoryTransactionLog::new());
        let builder = StatementBuilder::new(Arc::clone(&accounts), Arc::clone(&log));
        (builder, accounts, log)
    }

    fn seed_account(store: &InMemoryAccountStore, balance: Decimal) -> AccountId {
        let id = store.allocate_id();
        store.upsert(Account {
            id,
            merchant_id: "merchant-001".to_string(),
            balance,
            currency: "USD".to_string(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        });
        id
    }

    #[test]
    fn test_unknown_account_fails_with_not_found() {
        let (builder, _, _) = fixture();

        assert_eq!(
            builder.build(9, None, None).unwrap_err(),
            LedgerError::account_not_found(9)
        );
    }

    #[test]
    fn test_statement_signs_entries_from_the_accounts_perspective() {
        let (builder, accounts, log) = fixture();
        let id = seed_account(&accounts, dec!(60.0000));

        log.insert(TransactionDraft {
            idempotency_key: "k-dep".to_string(),
            tx_type: TransactionType::Deposit,
            from_account_id: None,
            to_account_id: Some(id),
            amount: dec!(100.0000),
            currency: "USD".to_string(),
            from_balance_before: None,
            from_balance_after: None,
            to_balance_before: Some(dec!(0.0000)),
            to_balance_after: Some(dec!(100.0000)),
            reference: None,
        })
        .unwrap();
        log.insert(TransactionDraft {
            idempotency_key: "k-wd".to_string(),
            tx_type: TransactionType::Withdrawal,
            from_account_id: Some(id),
            to_account_id: None,
            amount: dec!(40.0000),
            currency: "USD".to_string(),
            from_balance_before: Some(dec!(100.0000)),
            from_balance_after: Some(dec!(60.0000)),
            to_balance_before: None,
            to_balance_after: None,
            reference: None,
        })
        .unwrap();

        let statement = builder.build(id, None, None).unwrap();

        assert_eq!(statement.balance, dec!(60.0000));
        assert_eq!(statement.entries.len(), 2);

        let deposit = &statement.entries[0];
        assert_eq!(deposit.amount, dec!(100.0000));
        assert_eq!(deposit.balance_before, dec!(0.0000));
        assert_eq!(deposit.balance_after, dec!(100.0000));

        let withdrawal = &statement.entries[1];
        assert_eq!(withdrawal.amount, dec!(-40.0000));
        assert_eq!(withdrawal.balance_before, dec!(100.0000));
        assert_eq!(withdrawal.balance_after, dec!(60.0000));
    }

    #[test]
    fn test_transfer_appears_with_opposite_signs_on_each_side() {
        let (builder, accounts, log) = fixture();
        let from = seed_account(&accounts, dec!(0.0000));
        let to = seed_account(&accounts, dec!(300.0000));

        let tx = log
            .insert(TransactionDraft {
                idempotency_key: "k-tr".to_string(),
                tx_type: TransactionType::Transfer,
                from_account_id: Some(from),
                to_account_id: Some(to),
                amount: dec!(300.0000),
                currency: "USD".to_string(),
                from_balance_before: Some(dec!(300.0000)),
                from_balance_after: Some(dec!(0.0000)),
                to_balance_before: Some(dec!(0.0000)),
                to_balance_after: Some(dec!(300.0000)),
                reference: Some("invoice 17".to_string()),
            })
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);

        let from_side = builder.build(from, None, None).unwrap();
        let to_side = builder.build(to, None, None).unwrap();

        assert_eq!(from_side.entries[0].amount, dec!(-300.0000));
        assert_eq!(from_side.entries[0].balance_after, dec!(0.0000));
        assert_eq!(to_side.entries[0].amount, dec!(300.0000));
        assert_eq!(to_side.entries[0].balance_after, dec!(300.0000));
        assert_eq!(to_side.entries[0].reference.as_deref(), Some("invoice 17"));
    }

    #[test]
    fn test_date_bounds_are_inclusive_days() {
        let (builder, accounts, log) = fixture();
        let id = seed_account(&accounts, dec!(10.0000));

        let tx = log
            .insert(TransactionDraft {
                idempotency_key: "k-dep".to_string(),
                tx_type: TransactionType::Deposit,
                from_account_id: None,
                to_account_id: Some(id),
                amount: dec!(10.0000),
                currency: "USD".to_string(),
                from_balance_before: None,
                from_balance_after: None,
                to_balance_before: Some(dec!(0.0000)),
                to_balance_after: Some(dec!(10.0000)),
                reference: None,
            })
            .unwrap();

        let today = tx.created_at.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();

        let covering = builder.build(id, Some(today), Some(today)).unwrap();
        let future = builder.build(id, Some(tomorrow), None).unwrap();

        assert_eq!(covering.entries.len(), 1);
        assert!(future.entries.is_empty());
    }

    #[test]
    fn test_empty_range_yields_empty_statement_with_current_balance() {
        let (builder, accounts, _) = fixture();
        let id = seed_account(&accounts, dec!(12.3400));

        let statement = builder.build(id, None, None).unwrap();

        assert_eq!(statement.balance, dec!(12.3400));
        assert_eq!(statement.currency, "USD");
        assert!(statement.entries.is_empty());
    }
}
