//! # Finance Core
//!
//! A financial reporting and bank reconciliation library built on
//! double-entry ledger data owned by external subsystems.
//!
//! ## Features
//!
//! - **Balance aggregation**: One signed balance per account from posted journal lines
//! - **Financial statements**: Trial balance, balance sheet, profit & loss, and cash flow (direct and indirect)
//! - **Management reports**: Budget vs actual, period-over-period variance, cost center and project breakdowns
//! - **Bank reconciliation**: Statement import, payment auto-matching, manual matching, and reconciliation
//! - **Storage abstraction**: Database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use finance_core::{Reports, BalanceQuery, Account, AccountType};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! // This example shows basic usage - you need to implement the storage traits
//! // let storage = YourStorageImplementation::new();
//! // let reports = Reports::new(storage);
//! ```

pub mod ledger;
pub mod reconciliation;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use reconciliation::*;
pub use reports::*;
pub use traits::*;
pub use types::*;
pub use utils::MemoryStorage;
