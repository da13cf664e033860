//! FundTrace core domain types
//!
//! # Key Types
//! - `Amount`: Non-negative decimal, used for every budget and balance
//! - `ProjectId`: Opaque project identifier
//! - `PaymentRecord`: One completed outgoing payment

pub mod amount;
pub mod id;
pub mod payment;

pub use amount::{Amount, AmountError};
pub use id::ProjectId;
pub use payment::PaymentRecord;
