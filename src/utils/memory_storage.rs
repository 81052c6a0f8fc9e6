//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::reconciliation::types::*;
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    entries: Arc<RwLock<HashMap<String, JournalEntry>>>,
    cost_centers: Arc<RwLock<HashMap<String, CostCenter>>>,
    projects: Arc<RwLock<HashMap<String, Project>>>,
    budgets: Arc<RwLock<HashMap<String, Budget>>>,
    bank_accounts: Arc<RwLock<HashMap<Uuid, BankAccount>>>,
    bank_statements: Arc<RwLock<HashMap<Uuid, BankStatement>>>,
    bank_transactions: Arc<RwLock<HashMap<Uuid, BankTransaction>>>,
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account into the chart
    pub fn insert_account(&self, account: Account) {
        self.accounts
            .write()
            .unwrap()
            .insert(account.id.clone(), account);
    }

    /// Seed a journal entry
    pub fn insert_entry(&self, entry: JournalEntry) {
        self.entries.write().unwrap().insert(entry.id.clone(), entry);
    }

    /// Seed a cost center
    pub fn insert_cost_center(&self, cost_center: CostCenter) {
        self.cost_centers
            .write()
            .unwrap()
            .insert(cost_center.id.clone(), cost_center);
    }

    /// Seed a project
    pub fn insert_project(&self, project: Project) {
        self.projects
            .write()
            .unwrap()
            .insert(project.id.clone(), project);
    }

    /// Seed a budget
    pub fn insert_budget(&self, budget: Budget) {
        self.budgets
            .write()
            .unwrap()
            .insert(budget.id.clone(), budget);
    }

    /// Seed a bank account
    pub fn insert_bank_account(&self, bank_account: BankAccount) {
        self.bank_accounts
            .write()
            .unwrap()
            .insert(bank_account.id, bank_account);
    }

    /// Seed a payment
    pub fn insert_payment(&self, payment: Payment) {
        self.payments.write().unwrap().insert(payment.id, payment);
    }

    /// Number of stored bank statements
    pub fn statement_count(&self) -> usize {
        self.bank_statements.read().unwrap().len()
    }

    /// Number of stored bank transactions
    pub fn bank_transaction_count(&self) -> usize {
        self.bank_transactions.read().unwrap().len()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.accounts.write().unwrap().clear();
        self.entries.write().unwrap().clear();
        self.cost_centers.write().unwrap().clear();
        self.projects.write().unwrap().clear();
        self.budgets.write().unwrap().clear();
        self.bank_accounts.write().unwrap().clear();
        self.bank_statements.write().unwrap().clear();
        self.bank_transactions.write().unwrap().clear();
        self.payments.write().unwrap().clear();
    }
}

#[async_trait]
impl LedgerStore for MemoryStorage {
    async fn list_accounts(&self) -> FinanceResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().unwrap().values().cloned().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn get_account(&self, account_id: &str) -> FinanceResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(account_id).cloned())
    }

    async fn posted_lines(&self, filter: &LineFilter) -> FinanceResult<Vec<PostedLine>> {
        let entries = self.entries.read().unwrap();
        let mut lines: Vec<PostedLine> = entries
            .values()
            .filter(|entry| entry.status == EntryStatus::Posted)
            .flat_map(|entry| {
                entry.lines.iter().map(|line| PostedLine {
                    entry_id: entry.id.clone(),
                    date: entry.date,
                    source_document: entry.source_document.clone(),
                    account_id: line.account_id.clone(),
                    debit: line.debit.clone(),
                    credit: line.credit.clone(),
                    cost_center_id: line.cost_center_id.clone(),
                    project_id: line.project_id.clone(),
                })
            })
            .filter(|line| filter.matches(line))
            .collect();
        lines.sort_by(|a, b| (a.date, &a.entry_id).cmp(&(b.date, &b.entry_id)));
        Ok(lines)
    }
}

#[async_trait]
impl ReferenceStore for MemoryStorage {
    async fn get_budget(&self, budget_id: &str) -> FinanceResult<Option<Budget>> {
        Ok(self.budgets.read().unwrap().get(budget_id).cloned())
    }

    async fn list_cost_centers(&self) -> FinanceResult<Vec<CostCenter>> {
        let mut cost_centers: Vec<CostCenter> =
            self.cost_centers.read().unwrap().values().cloned().collect();
        cost_centers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(cost_centers)
    }

    async fn list_projects(&self) -> FinanceResult<Vec<Project>> {
        let mut projects: Vec<Project> =
            self.projects.read().unwrap().values().cloned().collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(projects)
    }
}

#[async_trait]
impl ReconciliationStore for MemoryStorage {
    async fn get_bank_account(&self, bank_account_id: Uuid) -> FinanceResult<Option<BankAccount>> {
        Ok(self
            .bank_accounts
            .read()
            .unwrap()
            .get(&bank_account_id)
            .cloned())
    }

    async fn insert_statement_with_transactions(
        &mut self,
        statement: &BankStatement,
        transactions: &[BankTransaction],
    ) -> FinanceResult<()> {
        // Both maps are written while holding both locks so a concurrent
        // reader never observes the statement without its rows.
        let mut statements = self.bank_statements.write().unwrap();
        let mut rows = self.bank_transactions.write().unwrap();
        statements.insert(statement.id, statement.clone());
        for transaction in transactions {
            rows.insert(transaction.id, transaction.clone());
        }
        Ok(())
    }

    async fn get_bank_transaction(
        &self,
        transaction_id: Uuid,
    ) -> FinanceResult<Option<BankTransaction>> {
        Ok(self
            .bank_transactions
            .read()
            .unwrap()
            .get(&transaction_id)
            .cloned())
    }

    async fn list_bank_transactions(
        &self,
        bank_account_id: Uuid,
        statement_id: Option<Uuid>,
    ) -> FinanceResult<Vec<BankTransaction>> {
        let mut transactions: Vec<BankTransaction> = self
            .bank_transactions
            .read()
            .unwrap()
            .values()
            .filter(|t| t.bank_account_id == bank_account_id)
            .filter(|t| statement_id.is_none_or(|s| t.statement_id == s))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
        Ok(transactions)
    }

    async fn update_transaction_if(
        &mut self,
        transaction_id: Uuid,
        expected: TransactionStatus,
        update: TransactionUpdate,
    ) -> FinanceResult<Option<BankTransaction>> {
        let mut transactions = self.bank_transactions.write().unwrap();
        match transactions.get_mut(&transaction_id) {
            Some(transaction) if transaction.status == expected => {
                update.apply(transaction);
                Ok(Some(transaction.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn confirmed_payments(&self, bank_account_id: Uuid) -> FinanceResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .read()
            .unwrap()
            .values()
            .filter(|p| p.bank_account_id == bank_account_id && p.status == PaymentStatus::Confirmed)
            .cloned()
            .collect();
        payments.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
        Ok(payments)
    }
}
