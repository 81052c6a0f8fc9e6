//! Bank reconciliation data types

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bank account record linking a physical bank account to a ledger account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub name: String,
    /// Balance per the books
    pub current_balance: BigDecimal,
    /// Balance per the bank's last statement
    pub bank_balance: BigDecimal,
    /// Ledger account this bank account maps to, if linked
    pub ledger_account_id: Option<String>,
}

/// Imported bank statement header. Created once per import, immutable;
/// totals always equal the sum of its transaction rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankStatement {
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub statement_date: NaiveDate,
    pub file_name: Option<String>,
    pub opening_balance: BigDecimal,
    pub closing_balance: BigDecimal,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    pub transaction_count: usize,
}

/// Match/reconciliation lifecycle of a bank transaction.
/// Status only ever advances: Unmatched -> Matched -> Reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Unmatched,
    Matched,
    Reconciled,
}

/// How a transaction was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Auto,
    Manual,
}

/// One imported bank transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub statement_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<String>,
    /// Money out, from the bank's perspective
    pub debit: BigDecimal,
    /// Money in, from the bank's perspective
    pub credit: BigDecimal,
    pub running_balance: Option<BigDecimal>,
    pub status: TransactionStatus,
    pub match_type: Option<MatchType>,
    pub matched_payment_id: Option<Uuid>,
    pub matched_journal_entry_id: Option<String>,
    /// Expense/income account picked during manual categorization
    pub category_account_id: Option<String>,
    pub is_reconciled: bool,
    pub reconciled_at: Option<NaiveDateTime>,
    pub reconciled_by: Option<String>,
}

impl BankTransaction {
    /// The single nonzero leg of the row. Bank rows carry either a debit
    /// or a credit, never both.
    pub fn amount(&self) -> BigDecimal {
        if self.debit > BigDecimal::from(0) {
            self.debit.clone()
        } else {
            self.credit.clone()
        }
    }

    /// Signed movement from the bank's perspective (credit - debit)
    pub fn net_movement(&self) -> BigDecimal {
        &self.credit - &self.debit
    }
}

/// External payment feed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Payment record from the external payments subsystem (read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    pub journal_entry_id: Option<String>,
}

/// One raw row of a statement import payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRow {
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<String>,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    pub balance: Option<BigDecimal>,
}

/// Statement import payload: header metadata plus raw rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementImport {
    pub statement_date: NaiveDate,
    pub file_name: Option<String>,
    pub opening_balance: BigDecimal,
    pub closing_balance: BigDecimal,
    pub transactions: Vec<ImportedRow>,
}

/// Result of a statement import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub statement: BankStatement,
    pub imported: usize,
}

/// Caller-supplied identifiers for a manual match. At least one of the
/// three must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualMatch {
    pub payment_id: Option<Uuid>,
    pub journal_entry_id: Option<String>,
    pub category_account_id: Option<String>,
}

impl ManualMatch {
    /// True when no identifier was supplied at all
    pub fn is_empty(&self) -> bool {
        self.payment_id.is_none()
            && self.journal_entry_id.is_none()
            && self.category_account_id.is_none()
    }
}

/// Result of an auto-match pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchOutcome {
    /// Rows advanced to Matched
    pub matched: usize,
    /// Rows left Unmatched because more than one candidate payment fit
    pub ambiguous: usize,
    /// Rows still Unmatched after the pass
    pub remaining: usize,
}

/// Result of a bulk reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReconcileOutcome {
    /// Rows advanced to Reconciled by this call
    pub reconciled: usize,
    /// Rows skipped because they were not in Matched state at update time
    pub skipped: usize,
}

/// Reconciliation progress for one bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub bank_account_id: Uuid,
    pub total: usize,
    pub unmatched: usize,
    pub matched: usize,
    pub reconciled: usize,
    /// Sum of (credit - debit) over reconciled rows
    pub cleared_balance: BigDecimal,
    /// Sum of (credit - debit) over all rows, minus cleared
    pub uncleared_balance: BigDecimal,
    /// bank_balance - cleared_balance; trends toward zero as the period completes
    pub difference: BigDecimal,
}

/// Field changes applied to a bank transaction through a conditional update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
    pub match_type: Option<MatchType>,
    pub matched_payment_id: Option<Uuid>,
    pub matched_journal_entry_id: Option<String>,
    pub category_account_id: Option<String>,
    pub is_reconciled: Option<bool>,
    pub reconciled_at: Option<NaiveDateTime>,
    pub reconciled_by: Option<String>,
}

impl TransactionUpdate {
    /// Update that advances a row to Matched
    pub fn matched(
        match_type: MatchType,
        payment_id: Option<Uuid>,
        journal_entry_id: Option<String>,
    ) -> Self {
        Self {
            status: Some(TransactionStatus::Matched),
            match_type: Some(match_type),
            matched_payment_id: payment_id,
            matched_journal_entry_id: journal_entry_id,
            ..Self::default()
        }
    }

    /// Update that advances a row to Reconciled
    pub fn reconciled(at: NaiveDateTime, by: String) -> Self {
        Self {
            status: Some(TransactionStatus::Reconciled),
            is_reconciled: Some(true),
            reconciled_at: Some(at),
            reconciled_by: Some(by),
            ..Self::default()
        }
    }

    /// Apply this update to a transaction row
    pub fn apply(&self, transaction: &mut BankTransaction) {
        if let Some(status) = self.status {
            transaction.status = status;
        }
        if let Some(match_type) = self.match_type {
            transaction.match_type = Some(match_type);
        }
        if let Some(payment_id) = self.matched_payment_id {
            transaction.matched_payment_id = Some(payment_id);
        }
        if let Some(ref entry_id) = self.matched_journal_entry_id {
            transaction.matched_journal_entry_id = Some(entry_id.clone());
        }
        if let Some(ref account_id) = self.category_account_id {
            transaction.category_account_id = Some(account_id.clone());
        }
        if let Some(reconciled) = self.is_reconciled {
            transaction.is_reconciled = reconciled;
        }
        if let Some(at) = self.reconciled_at {
            transaction.reconciled_at = Some(at);
        }
        if let Some(ref by) = self.reconciled_by {
            transaction.reconciled_by = Some(by.clone());
        }
    }
}
