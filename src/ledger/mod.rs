//! Ledger module: balance aggregation and chart-of-accounts hierarchy

pub mod balance;
pub mod hierarchy;

pub use balance::*;
pub use hierarchy::*;
