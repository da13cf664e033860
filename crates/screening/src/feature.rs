//! Payment attempt feature vectors
//!
//! Each payout attempt is described by a fixed-length numeric tuple and
//! appended (only for attempts that actually paid out) to the owning
//! project's history. History is append-only and used solely as
//! classifier training data.

use fundtrace_core::Amount;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Numeric description of one payment attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Attempted payout amount
    pub amount: f64,
    /// Account balance before the attempt
    pub prior_balance: f64,
    /// Attempted amount as a fraction of the project budget
    pub budget_ratio: f64,
}

impl FeatureVector {
    /// Describe an attempt against the account and project it targets.
    ///
    /// The budget ratio falls back to 0 for a zero budget, matching the
    /// display-layer convention rather than erroring on it.
    pub fn describe(amount: Amount, prior_balance: Amount, total_budget: Amount) -> Self {
        let amount_f = amount.value().to_f64().unwrap_or(0.0);
        let budget_f = total_budget.value().to_f64().unwrap_or(0.0);
        Self {
            amount: amount_f,
            prior_balance: prior_balance.value().to_f64().unwrap_or(0.0),
            budget_ratio: if budget_f > 0.0 { amount_f / budget_f } else { 0.0 },
        }
    }

    /// Fixed-length array form consumed by classifiers
    pub fn as_array(&self) -> [f64; 3] {
        [self.amount, self.prior_balance, self.budget_ratio]
    }
}

/// Mean of the historical attempt amounts; None for empty history
pub fn mean_amount(history: &[FeatureVector]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    Some(history.iter().map(|f| f.amount).sum::<f64>() / history.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amt(v: rust_decimal::Decimal) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_describe_attempt() {
        let fv = FeatureVector::describe(amt(dec!(250)), amt(dec!(1000)), amt(dec!(5000)));
        assert_eq!(fv.amount, 250.0);
        assert_eq!(fv.prior_balance, 1000.0);
        assert_eq!(fv.budget_ratio, 0.05);
        assert_eq!(fv.as_array(), [250.0, 1000.0, 0.05]);
    }

    #[test]
    fn test_mean_amount() {
        let history = vec![
            FeatureVector::describe(amt(dec!(100)), amt(dec!(500)), amt(dec!(1000))),
            FeatureVector::describe(amt(dec!(300)), amt(dec!(400)), amt(dec!(1000))),
        ];
        assert_eq!(mean_amount(&history), Some(200.0));
        assert_eq!(mean_amount(&[]), None);
    }
}
