//! Account-related types for the merchant ledger
//!
//! This module defines the Account value type and the pure balance
//! operations the engine applies to it. An account is never mutated in
//! place: `credited` and `debited` return a new value, and the engine
//! decides when (and whether) the new value is persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::AccountId;

/// Lifecycle status of an account
///
/// Only `Active` accounts should be debited or credited; enforcing that is
/// the responsibility of the layer that admits requests, not the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Account accepts debits and credits
    Active,
    /// Account is closed to further activity
    Closed,
}

/// A merchant account with its current balance
///
/// The balance is an exact decimal with 4 fractional digits of scale and is
/// never negative at any observable point. `merchant_id`, `currency`, and
/// `created_at` are immutable after creation; `balance` changes only through
/// the transaction engine, under that account's exclusive lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable unique identifier, assigned at creation
    pub id: AccountId,

    /// Opaque owner tag
    pub merchant_id: String,

    /// Current balance, scale 4, `>= 0` at all observable times
    pub balance: Decimal,

    /// 3-letter currency code
    pub currency: String,

    /// Lifecycle status
    pub status: AccountStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Return a copy of this account with `amount` added to the balance
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ArithmeticOverflow`] if the addition would
    /// overflow the decimal representation. The original account is
    /// untouched on failure.
    pub fn credited(&self, amount: Decimal) -> Result<Account, LedgerError> {
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", self.id))?;

        Ok(Account {
            balance,
            ..self.clone()
        })
    }

    /// Return a copy of this account with `amount` subtracted from the balance
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if the debit would make the
    /// balance negative. The original account is untouched on failure.
    pub fn debited(&self, amount: Decimal) -> Result<Account, LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::insufficient_funds(
                self.id,
                self.balance,
                amount,
            ));
        }

        Ok(Account {
            balance: self.balance - amount,
            ..self.clone()
        })
    }

    /// Whether this account's currency matches `currency`, ignoring case
    pub fn currency_matches(&self, currency: &str) -> bool {
        self.currency.eq_ignore_ascii_case(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal) -> Account {
        Account {
            id: 1,
            merchant_id: "merchant-001".to_string(),
            balance,
            currency: "USD".to_string(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_credited_returns_new_value_and_leaves_original_unchanged() {
        let acc = account(dec!(10.0000));

        let credited = acc.credited(dec!(2.5000)).unwrap();

        assert_eq!(credited.balance, dec!(12.5000));
        assert_eq!(acc.balance, dec!(10.0000));
        assert_eq!(credited.id, acc.id);
        assert_eq!(credited.currency, acc.currency);
    }

    #[test]
    fn test_debited_subtracts_amount() {
        let acc = account(dec!(10.0000));

        let debited = acc.debited(dec!(4.0000)).unwrap();

        assert_eq!(debited.balance, dec!(6.0000));
        assert_eq!(acc.balance, dec!(10.0000));
    }

    #[test]
    fn test_debited_to_exactly_zero_is_allowed() {
        let acc = account(dec!(300.0000));

        let debited = acc.debited(dec!(300.0000)).unwrap();

        assert_eq!(debited.balance, Decimal::ZERO);
    }

    #[test]
    fn test_debited_below_zero_fails_with_insufficient_funds() {
        let acc = account(dec!(50.0000));

        let result = acc.debited(dec!(50.0001));

        assert_eq!(
            result.unwrap_err(),
            LedgerError::insufficient_funds(1, dec!(50.0000), dec!(50.0001))
        );
    }

    #[test]
    fn test_credited_overflow_is_rejected() {
        let acc = account(Decimal::MAX);

        let result = acc.credited(Decimal::MAX);

        assert!(matches!(
            result,
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_currency_match_is_case_insensitive() {
        let acc = account(dec!(1.0000));

        assert!(acc.currency_matches("usd"));
        assert!(acc.currency_matches("USD"));
        assert!(!acc.currency_matches("EUR"));
    }
}
