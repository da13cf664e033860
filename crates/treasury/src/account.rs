//! Disbursement account - contractor balance and outgoing payments
//!
//! One account per project, credited by milestone releases and debited
//! by approved payouts. The balance can never go negative: a debit that
//! would overdraw fails before any state changes.

use crate::error::TreasuryError;
use fundtrace_core::{Amount, PaymentRecord, ProjectId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Contractor account holding released project funds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Keyed by the project the contractor is engaged on
    pub id: ProjectId,
    /// Contractor display name, carried into payment records
    pub name: String,
    balance: Amount,
}

impl Account {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Amount::ZERO,
        }
    }

    /// Current balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Receive released funds. Always succeeds; saturates rather than
    /// overflowing on absurd balances.
    pub fn credit(&mut self, amount: Amount) {
        self.balance = self.balance.saturating_add(&amount);
        info!(account = %self.id, amount = %amount, balance = %self.balance, "account credited");
    }

    /// Pay out to a recipient.
    ///
    /// Fails with `InsufficientFunds` when the amount exceeds the
    /// balance, leaving the balance untouched.
    pub fn debit(
        &mut self,
        recipient: impl Into<String>,
        amount: Amount,
    ) -> Result<PaymentRecord, TreasuryError> {
        let balance = self
            .balance
            .checked_sub(&amount)
            .ok_or(TreasuryError::InsufficientFunds {
                requested: amount.value(),
                available: self.balance.value(),
            })?;

        self.balance = balance;
        let record = PaymentRecord {
            from: self.name.clone(),
            to: recipient.into(),
            amount,
        };
        info!(account = %self.id, to = %record.to, amount = %amount, balance = %self.balance, "account debited");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(v: rust_decimal::Decimal) -> Amount {
        Amount::new(v).unwrap()
    }

    fn account() -> Account {
        Account::new(ProjectId::new("P1"), "Acme Infra Pvt Ltd")
    }

    #[test]
    fn test_starts_empty() {
        assert!(account().balance().is_zero());
    }

    #[test]
    fn test_credit_accumulates() {
        let mut acct = account();
        acct.credit(amount(dec!(300)));
        acct.credit(amount(dec!(400)));
        assert_eq!(acct.balance().value(), dec!(700));
    }

    #[test]
    fn test_credit_saturates_at_decimal_max() {
        let mut acct = account();
        acct.credit(Amount::new_unchecked(rust_decimal::Decimal::MAX));
        acct.credit(amount(dec!(1)));
        assert_eq!(acct.balance().value(), rust_decimal::Decimal::MAX);
    }

    #[test]
    fn test_debit_returns_record() {
        let mut acct = account();
        acct.credit(amount(dec!(500)));

        let record = acct.debit("Steel Supplier", amount(dec!(200))).unwrap();
        assert_eq!(record.from, "Acme Infra Pvt Ltd");
        assert_eq!(record.to, "Steel Supplier");
        assert_eq!(record.amount.value(), dec!(200));
        assert_eq!(acct.balance().value(), dec!(300));
    }

    #[test]
    fn test_overdraw_rejected_without_mutation() {
        let mut acct = account();
        acct.credit(amount(dec!(100)));

        let err = acct.debit("Anyone", amount(dec!(100.01))).unwrap_err();
        assert!(matches!(err, TreasuryError::InsufficientFunds { .. }));
        assert_eq!(acct.balance().value(), dec!(100));
    }

    #[test]
    fn test_debit_to_exactly_zero() {
        let mut acct = account();
        acct.credit(amount(dec!(100)));
        acct.debit("Anyone", amount(dec!(100))).unwrap();
        assert!(acct.balance().is_zero());

        // And nothing further comes out.
        assert!(acct.debit("Anyone", amount(dec!(0.01))).is_err());
    }
}
