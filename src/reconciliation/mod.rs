//! Bank reconciliation
//!
//! Statement import, payment auto-matching, manual matching, and
//! reconciliation over bank transaction rows. Every status change is a
//! conditional update guarded by the expected prior state, so concurrent
//! operators cannot double-process a row.

pub mod engine;
pub mod types;

pub use engine::*;
pub use types::*;
