//! Core types and data structures for the finance core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Receivables, Equipment, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, Accounts Payable, etc.)
    Liability,
    /// Equity - owner's interest in the business (Capital, Retained Earnings, etc.)
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Income normally carry credit balances.
    pub fn normal_balance(&self) -> EntryType {
        match self {
            AccountType::Asset | AccountType::Expense => EntryType::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => EntryType::Credit,
        }
    }

    /// Converts raw debit/credit totals into a signed balance using the
    /// normal-balance convention. This is the only place in the crate where
    /// debit/credit polarity is decided; every report goes through it.
    pub fn signed_balance(&self, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
        match self.normal_balance() {
            EntryType::Debit => debit - credit,
            EntryType::Credit => credit - debit,
        }
    }
}

/// Account sub-classification used by the balance sheet and the indirect
/// cash flow method (working-capital deltas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountSubType {
    CurrentAsset,
    FixedAsset,
    OtherAsset,
    CurrentLiability,
    LongTermLiability,
    Capital,
    OperatingIncome,
    OtherIncome,
    OperatingExpense,
    OtherExpense,
}

/// Cash flow activity buckets for the cash flow statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowActivity {
    Operating,
    Investing,
    Financing,
}

/// Types of entries in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// Debit entry - increases Assets and Expenses, decreases Liabilities, Equity, and Income
    Debit,
    /// Credit entry - increases Liabilities, Equity, and Income, decreases Assets and Expenses
    Credit,
}

/// Chart-of-accounts record. Created and maintained by an external master-data
/// subsystem; this core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Account code used for ordering and the cash-account fallback prefix
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.); fixed after creation
    pub account_type: AccountType,
    /// Optional sub-classification
    pub sub_type: Option<AccountSubType>,
    /// Optional parent account for hierarchical chart of accounts
    pub parent_id: Option<String>,
    /// Default cash flow bucket for this account, if configured
    pub cash_flow_category: Option<CashFlowActivity>,
    /// Whether movements on this account represent actual cash
    pub is_cash_flow_relevant: bool,
    /// Inactive accounts are excluded from balance aggregation
    pub is_active: bool,
}

impl Account {
    /// Create a new active account with no sub-type, parent, or cash flow settings
    pub fn new(id: String, code: String, name: String, account_type: AccountType) -> Self {
        Self {
            id,
            code,
            name,
            account_type,
            sub_type: None,
            parent_id: None,
            cash_flow_category: None,
            is_cash_flow_relevant: false,
            is_active: true,
        }
    }

    /// Set the sub-type
    pub fn with_sub_type(mut self, sub_type: AccountSubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    /// Set the parent account
    pub fn with_parent(mut self, parent_id: String) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Mark the account as a cash account for the direct cash flow method
    pub fn cash_relevant(mut self) -> Self {
        self.is_cash_flow_relevant = true;
        self
    }
}

/// Journal entry lifecycle. Posting happens in an external subsystem;
/// this core only ever reads Posted entries into reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Draft,
    Posted,
}

/// One line of a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Account being affected
    pub account_id: String,
    /// Debit amount (zero when the line is a credit)
    pub debit: BigDecimal,
    /// Credit amount (zero when the line is a debit)
    pub credit: BigDecimal,
    /// Optional cost center dimension
    pub cost_center_id: Option<String>,
    /// Optional project dimension
    pub project_id: Option<String>,
}

impl JournalEntryLine {
    /// Create a debit line
    pub fn debit(account_id: String, amount: BigDecimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: BigDecimal::from(0),
            cost_center_id: None,
            project_id: None,
        }
    }

    /// Create a credit line
    pub fn credit(account_id: String, amount: BigDecimal) -> Self {
        Self {
            account_id,
            debit: BigDecimal::from(0),
            credit: amount,
            cost_center_id: None,
            project_id: None,
        }
    }

    /// Tag the line with a cost center
    pub fn with_cost_center(mut self, cost_center_id: String) -> Self {
        self.cost_center_id = Some(cost_center_id);
        self
    }

    /// Tag the line with a project
    pub fn with_project(mut self, project_id: String) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Complete journal entry with multiple lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for the entry
    pub id: String,
    /// Date the entry takes effect
    pub date: NaiveDate,
    /// Description of the entry
    pub description: String,
    /// Draft entries are invisible to every report in this core
    pub status: EntryStatus,
    /// Source document tag (invoice, payment, payroll run, ...) used by the
    /// direct cash flow method to bucket activity
    pub source_document: Option<String>,
    /// Lines making up this entry
    pub lines: Vec<JournalEntryLine>,
}

impl JournalEntry {
    /// Create a new posted entry with no lines
    pub fn posted(id: String, date: NaiveDate, description: String) -> Self {
        Self {
            id,
            date,
            description,
            status: EntryStatus::Posted,
            source_document: None,
            lines: Vec::new(),
        }
    }

    /// Set the source document tag
    pub fn with_source(mut self, source_document: String) -> Self {
        self.source_document = Some(source_document);
        self
    }

    /// Add a line to the entry
    pub fn with_line(mut self, line: JournalEntryLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Calculate total debits
    pub fn total_debits(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.debit).sum()
    }

    /// Calculate total credits
    pub fn total_credits(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.credit).sum()
    }

    /// Check if the entry is balanced (debits = credits)
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

/// Read view of one posted journal line joined with its entry's date and
/// source document tag. This is the unit the balance aggregator and the
/// dimension/cash-flow reports consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedLine {
    pub entry_id: String,
    pub date: NaiveDate,
    pub source_document: Option<String>,
    pub account_id: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    pub cost_center_id: Option<String>,
    pub project_id: Option<String>,
}

/// Date/dimension filter applied when fetching posted lines from storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineFilter {
    /// Inclusive lower bound on entry date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on entry date
    pub to: Option<NaiveDate>,
    /// Restrict to lines carrying this cost center
    pub cost_center_id: Option<String>,
    /// Restrict to lines carrying this project
    pub project_id: Option<String>,
}

impl LineFilter {
    /// Filter for everything up to and including a date
    pub fn up_to(date: NaiveDate) -> Self {
        Self {
            to: Some(date),
            ..Self::default()
        }
    }

    /// Filter for an inclusive date range
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Check whether a posted line passes this filter
    pub fn matches(&self, line: &PostedLine) -> bool {
        if let Some(from) = self.from {
            if line.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if line.date > to {
                return false;
            }
        }
        if let Some(ref cc) = self.cost_center_id {
            if line.cost_center_id.as_ref() != Some(cc) {
                return false;
            }
        }
        if let Some(ref project) = self.project_id {
            if line.project_id.as_ref() != Some(project) {
                return false;
            }
        }
        true
    }
}

/// Cost center master record (external, read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: String,
    pub name: String,
}

/// Project master record (external, read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// One budgeted amount for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub account_id: String,
    pub total_amount: BigDecimal,
}

/// Budget master record (external, read-only). The budget's own period
/// bounds the actuals it is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lines: Vec<BudgetLine>,
}

/// Errors that can occur in the finance core
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(uuid::Uuid),
    #[error("Bank transaction not found: {0}")]
    BankTransactionNotFound(uuid::Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

/// Result type for finance core operations
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Activity threshold: totals at or below this are treated as no activity
/// when filtering report rows.
pub(crate) fn activity_epsilon() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(1000)
}

/// Tolerance for balance identities (trial balance, balance sheet) and for
/// auto-match amount comparison.
pub(crate) fn balance_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}
