//! Storage abstraction traits
//!
//! The finance core does not own its data. Accounts, journal entries,
//! budgets, dimensions, and payments are produced by external subsystems;
//! these traits let the core run against any backend (PostgreSQL, SQLite,
//! in-memory, ...) by implementing the methods below.

use async_trait::async_trait;
use uuid::Uuid;

use crate::reconciliation::types::*;
use crate::types::*;

/// Read-only view of the posted ledger: the chart of accounts and posted
/// journal lines. Draft entries must never surface through this trait.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// List every account in the chart, active or not
    async fn list_accounts(&self) -> FinanceResult<Vec<Account>>;

    /// Get an account by id
    async fn get_account(&self, account_id: &str) -> FinanceResult<Option<Account>>;

    /// Posted journal lines matching the filter, joined with their entry's
    /// date and source document tag
    async fn posted_lines(&self, filter: &LineFilter) -> FinanceResult<Vec<PostedLine>>;
}

/// Read-only auxiliary masters: budgets, cost centers, projects
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Get a budget with its lines
    async fn get_budget(&self, budget_id: &str) -> FinanceResult<Option<Budget>>;

    /// List all cost centers
    async fn list_cost_centers(&self) -> FinanceResult<Vec<CostCenter>>;

    /// List all projects
    async fn list_projects(&self) -> FinanceResult<Vec<Project>>;
}

/// Storage surface for the bank reconciliation engine. Statements and
/// transactions are created here; bank accounts and payments are read-only.
#[async_trait]
pub trait ReconciliationStore: Send + Sync {
    /// Get a bank account by id
    async fn get_bank_account(&self, bank_account_id: Uuid) -> FinanceResult<Option<BankAccount>>;

    /// Persist a statement header and all of its transaction rows in one
    /// atomic operation. Either everything lands or nothing does; a failure
    /// must leave no orphaned statement or partial transaction set behind.
    async fn insert_statement_with_transactions(
        &mut self,
        statement: &BankStatement,
        transactions: &[BankTransaction],
    ) -> FinanceResult<()>;

    /// Get a bank transaction by id
    async fn get_bank_transaction(
        &self,
        transaction_id: Uuid,
    ) -> FinanceResult<Option<BankTransaction>>;

    /// List transactions for a bank account, optionally restricted to one statement
    async fn list_bank_transactions(
        &self,
        bank_account_id: Uuid,
        statement_id: Option<Uuid>,
    ) -> FinanceResult<Vec<BankTransaction>>;

    /// Conditionally update a transaction: the update is applied only if the
    /// row's status still equals `expected` at update time. Returns the
    /// updated row, or `None` when the status had already advanced. This is
    /// the compare-and-swap primitive every state transition goes through.
    async fn update_transaction_if(
        &mut self,
        transaction_id: Uuid,
        expected: TransactionStatus,
        update: TransactionUpdate,
    ) -> FinanceResult<Option<BankTransaction>>;

    /// Confirmed payments on a bank account, the candidate pool for auto-matching
    async fn confirmed_payments(&self, bank_account_id: Uuid) -> FinanceResult<Vec<Payment>>;
}
