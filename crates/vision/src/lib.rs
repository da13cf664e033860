//! FundTrace vision - before/after progress verification
//!
//! # Key Types
//! - `ProgressGate`: pass/fail verdict on an evidence image pair
//! - `ImageComparator` / `PixelDiff` / `FileSizeDelta`: the injected
//!   comparison capability and its implementations

pub mod compare;
pub mod error;
pub mod gate;

pub use compare::{FileSizeDelta, FixedScore, ImageComparator, PixelDiff};
pub use error::VisionError;
pub use gate::{ProgressGate, ProgressReport, DEFAULT_THRESHOLD};
