//! Incremental technical indicator primitives.
//!
//! Every primitive is a small state machine advanced exactly once per bar.
//! Output at bar i depends only on bars <= i.

pub mod ema;
pub mod sma;
pub mod kdj;
pub mod double_line;
