//! Request types accepted by the ledger
//!
//! Requests arrive already deserialized but not yet validated. Validation
//! lives here, next to the types, so the engine only ever sees well-formed
//! shapes: a [`TransactionRequest`] validates down to a [`Posting`] and the
//! engine never branches on the five transaction types again.
//!
//! Field names in validation messages use the wire (camelCase) spelling so
//! the transport layer can map them straight into a field-error body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::transaction::{Posting, TransactionType};
use super::AccountId;

/// Maximum fractional digits carried by any monetary amount
pub const AMOUNT_SCALE: u32 = 4;

/// Request to open a new merchant account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Owner tag for the new account
    pub merchant_id: String,
    /// 3-letter currency code
    pub currency: String,
    /// Opening balance, `>= 0`, scale 4
    pub initial_balance: Decimal,
}

impl CreateAccountRequest {
    /// Validate the request fields
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] naming the first offending
    /// field: blank merchant id, malformed currency, negative or
    /// over-scaled initial balance.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.merchant_id.trim().is_empty() {
            return Err(LedgerError::invalid_request("merchantId", "is required"));
        }
        validate_currency(&self.currency)?;
        if self.initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_request(
                "initialBalance",
                "must not be negative",
            ));
        }
        if self.initial_balance.scale() > AMOUNT_SCALE {
            return Err(LedgerError::invalid_request(
                "initialBalance",
                "must have at most 4 decimal places",
            ));
        }
        Ok(())
    }
}

/// Request to apply a transaction against the ledger
///
/// `from_account_id`/`to_account_id` requirements depend on `tx_type`; see
/// [`TransactionRequest::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Caller-supplied deduplication key; repeating it is always safe
    pub idempotency_key: String,
    /// Requested transaction type
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Debited account; required for WITHDRAWAL/FEE/TRANSFER, forbidden otherwise
    pub from_account_id: Option<AccountId>,
    /// Credited account; required for DEPOSIT/REFUND/TRANSFER, forbidden otherwise
    pub to_account_id: Option<AccountId>,
    /// Strictly positive amount, scale 4
    pub amount: Decimal,
    /// 3-letter currency code
    pub currency: String,
    /// Free-text annotation carried into the log
    pub reference: Option<String>,
}

impl TransactionRequest {
    /// Validate the request shape and collapse it to its [`Posting`]
    ///
    /// DEPOSIT and REFUND require `toAccountId` and forbid `fromAccountId`;
    /// WITHDRAWAL and FEE require `fromAccountId` and forbid `toAccountId`;
    /// TRANSFER requires both and they must differ.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] naming the offending field.
    pub fn validate(&self) -> Result<Posting, LedgerError> {
        if self.idempotency_key.trim().is_empty() {
            return Err(LedgerError::invalid_request("idempotencyKey", "is required"));
        }
        validate_currency(&self.currency)?;
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_request("amount", "must be positive"));
        }
        if self.amount.scale() > AMOUNT_SCALE {
            return Err(LedgerError::invalid_request(
                "amount",
                "must have at most 4 decimal places",
            ));
        }

        match self.tx_type {
            TransactionType::Deposit | TransactionType::Refund => {
                let account = require_account(self.to_account_id, "toAccountId")?;
                forbid_account(self.from_account_id, "fromAccountId")?;
                Ok(Posting::Credit { account })
            }
            TransactionType::Withdrawal | TransactionType::Fee => {
                let account = require_account(self.from_account_id, "fromAccountId")?;
                forbid_account(self.to_account_id, "toAccountId")?;
                Ok(Posting::Debit { account })
            }
            TransactionType::Transfer => {
                let from = require_account(self.from_account_id, "fromAccountId")?;
                let to = require_account(self.to_account_id, "toAccountId")?;
                if from == to {
                    return Err(LedgerError::invalid_request(
                        "toAccountId",
                        "fromAccountId and toAccountId must differ",
                    ));
                }
                Ok(Posting::Transfer { from, to })
            }
        }
    }
}

fn require_account(id: Option<AccountId>, field: &str) -> Result<AccountId, LedgerError> {
    id.ok_or_else(|| LedgerError::invalid_request(field, "is required"))
}

fn forbid_account(id: Option<AccountId>, field: &str) -> Result<(), LedgerError> {
    if id.is_some() {
        return Err(LedgerError::invalid_request(field, "must not be set"));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<(), LedgerError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::invalid_request(
            "currency",
            "must be a 3-letter code",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn request(
        tx_type: TransactionType,
        from: Option<AccountId>,
        to: Option<AccountId>,
    ) -> TransactionRequest {
        TransactionRequest {
            idempotency_key: "key-1".to_string(),
            tx_type,
            from_account_id: from,
            to_account_id: to,
            amount: dec!(10.0000),
            currency: "USD".to_string(),
            reference: None,
        }
    }

    #[rstest]
    #[case::deposit(TransactionType::Deposit, None, Some(2), Posting::Credit { account: 2 })]
    #[case::refund(TransactionType::Refund, None, Some(2), Posting::Credit { account: 2 })]
    #[case::withdrawal(TransactionType::Withdrawal, Some(1), None, Posting::Debit { account: 1 })]
    #[case::fee(TransactionType::Fee, Some(1), None, Posting::Debit { account: 1 })]
    #[case::transfer(TransactionType::Transfer, Some(1), Some(2), Posting::Transfer { from: 1, to: 2 })]
    fn test_valid_shapes_collapse_to_postings(
        #[case] tx_type: TransactionType,
        #[case] from: Option<AccountId>,
        #[case] to: Option<AccountId>,
        #[case] expected: Posting,
    ) {
        assert_eq!(request(tx_type, from, to).validate().unwrap(), expected);
    }

    #[rstest]
    #[case::deposit_missing_to(TransactionType::Deposit, None, None, "toAccountId")]
    #[case::deposit_with_from(TransactionType::Deposit, Some(1), Some(2), "fromAccountId")]
    #[case::refund_with_from(TransactionType::Refund, Some(1), Some(2), "fromAccountId")]
    #[case::withdrawal_missing_from(TransactionType::Withdrawal, None, None, "fromAccountId")]
    #[case::withdrawal_with_to(TransactionType::Withdrawal, Some(1), Some(2), "toAccountId")]
    #[case::fee_with_to(TransactionType::Fee, Some(1), Some(2), "toAccountId")]
    #[case::transfer_missing_from(TransactionType::Transfer, None, Some(2), "fromAccountId")]
    #[case::transfer_missing_to(TransactionType::Transfer, Some(1), None, "toAccountId")]
    #[case::transfer_same_account(TransactionType::Transfer, Some(1), Some(1), "toAccountId")]
    fn test_invalid_shapes_name_the_offending_field(
        #[case] tx_type: TransactionType,
        #[case] from: Option<AccountId>,
        #[case] to: Option<AccountId>,
        #[case] field: &str,
    ) {
        let err = request(tx_type, from, to).validate().unwrap_err();
        match err {
            LedgerError::InvalidRequest { field: f, .. } => assert_eq!(f, field),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-5.0000))]
    fn test_non_positive_amount_is_rejected(#[case] amount: Decimal) {
        let mut r = request(TransactionType::Deposit, None, Some(2));
        r.amount = amount;

        let err = r.validate().unwrap_err();
        assert_eq!(err, LedgerError::invalid_request("amount", "must be positive"));
    }

    #[test]
    fn test_over_scaled_amount_is_rejected() {
        let mut r = request(TransactionType::Deposit, None, Some(2));
        r.amount = dec!(1.00001);

        assert!(matches!(
            r.validate(),
            Err(LedgerError::InvalidRequest { field, .. }) if field == "amount"
        ));
    }

    #[test]
    fn test_blank_idempotency_key_is_rejected() {
        let mut r = request(TransactionType::Deposit, None, Some(2));
        r.idempotency_key = "  ".to_string();

        assert!(matches!(
            r.validate(),
            Err(LedgerError::InvalidRequest { field, .. }) if field == "idempotencyKey"
        ));
    }

    #[rstest]
    #[case::too_short("US")]
    #[case::too_long("USDX")]
    #[case::digits("U5D")]
    fn test_malformed_currency_is_rejected(#[case] currency: &str) {
        let mut r = request(TransactionType::Deposit, None, Some(2));
        r.currency = currency.to_string();

        assert!(matches!(
            r.validate(),
            Err(LedgerError::InvalidRequest { field, .. }) if field == "currency"
        ));
    }

    #[test]
    fn test_create_account_rejects_negative_opening_balance() {
        let r = CreateAccountRequest {
            merchant_id: "merchant-001".to_string(),
            currency: "USD".to_string(),
            initial_balance: dec!(-1.0000),
        };

        assert!(matches!(
            r.validate(),
            Err(LedgerError::InvalidRequest { field, .. }) if field == "initialBalance"
        ));
    }

    #[test]
    fn test_create_account_accepts_zero_opening_balance() {
        let r = CreateAccountRequest {
            merchant_id: "merchant-001".to_string(),
            currency: "USD".to_string(),
            initial_balance: dec!(0.0000),
        };

        assert!(r.validate().is_ok());
    }
}
