//! Outgoing payment record

use crate::Amount;
use serde::{Deserialize, Serialize};

/// Record of one completed outgoing payment from a disbursement account.
///
/// Produced by a successful debit and embedded verbatim in the audit
/// ledger, so it carries display names rather than internal keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Paying account name
    pub from: String,
    /// Recipient name or account
    pub to: String,
    /// Amount paid out
    pub amount: Amount,
}
