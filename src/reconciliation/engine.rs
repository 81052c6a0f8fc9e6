//! Reconciliation engine: import, matching, reconcile, summary

use bigdecimal::BigDecimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::reconciliation::types::*;
use crate::traits::ReconciliationStore;
use crate::types::*;
use crate::utils::validation::validate_import_rows;

/// Auto-match date window: a candidate payment may be dated up to this
/// many days before or after the bank transaction.
pub const MATCH_WINDOW_DAYS: i64 = 5;

/// Bank reconciliation engine over a reconciliation store
pub struct ReconciliationEngine<S: ReconciliationStore> {
    store: S,
}

impl<S: ReconciliationStore> ReconciliationEngine<S> {
    /// Create an engine backed by the given storage
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn require_bank_account(&self, bank_account_id: Uuid) -> FinanceResult<BankAccount> {
        self.store
            .get_bank_account(bank_account_id)
            .await?
            .ok_or(FinanceError::BankAccountNotFound(bank_account_id))
    }

    /// Import a bank statement: one header plus its transaction rows, all
    /// created Unmatched, all-or-nothing. Any invalid row aborts the whole
    /// import before anything is persisted.
    pub async fn import_statement(
        &mut self,
        bank_account_id: Uuid,
        import: StatementImport,
    ) -> FinanceResult<ImportOutcome> {
        self.require_bank_account(bank_account_id).await?;
        validate_import_rows(&import.transactions)?;

        let total_debit: BigDecimal = import.transactions.iter().map(|r| r.debit.clone()).sum();
        let total_credit: BigDecimal = import.transactions.iter().map(|r| r.credit.clone()).sum();

        let expected_closing = &import.opening_balance + &total_credit - &total_debit;
        if expected_closing != import.closing_balance {
            warn!(
                %bank_account_id,
                expected = %expected_closing,
                declared = %import.closing_balance,
                "statement closing balance does not match imported rows"
            );
        }

        let statement = BankStatement {
            id: Uuid::new_v4(),
            bank_account_id,
            statement_date: import.statement_date,
            file_name: import.file_name,
            opening_balance: import.opening_balance,
            closing_balance: import.closing_balance,
            total_debit,
            total_credit,
            transaction_count: import.transactions.len(),
        };

        let transactions: Vec<BankTransaction> = import
            .transactions
            .into_iter()
            .map(|row| BankTransaction {
                id: Uuid::new_v4(),
                bank_account_id,
                statement_id: statement.id,
                date: row.date,
                description: row.description,
                reference: row.reference,
                debit: row.debit,
                credit: row.credit,
                running_balance: row.balance,
                status: TransactionStatus::Unmatched,
                match_type: None,
                matched_payment_id: None,
                matched_journal_entry_id: None,
                category_account_id: None,
                is_reconciled: false,
                reconciled_at: None,
                reconciled_by: None,
            })
            .collect();

        self.store
            .insert_statement_with_transactions(&statement, &transactions)
            .await?;

        info!(
            statement_id = %statement.id,
            %bank_account_id,
            rows = transactions.len(),
            "bank statement imported"
        );

        Ok(ImportOutcome {
            imported: transactions.len(),
            statement,
        })
    }

    /// Match unmatched transactions against the confirmed payment feed.
    /// A row is matched only when exactly one payment lands within the
    /// amount tolerance and date window; zero or several candidates leave
    /// it Unmatched. Precision over recall.
    pub async fn auto_match(
        &mut self,
        bank_account_id: Uuid,
        statement_id: Option<Uuid>,
    ) -> FinanceResult<AutoMatchOutcome> {
        self.require_bank_account(bank_account_id).await?;
        let transactions = self
            .store
            .list_bank_transactions(bank_account_id, statement_id)
            .await?;
        let payments = self.store.confirmed_payments(bank_account_id).await?;
        let tolerance = balance_tolerance();
        let zero = BigDecimal::from(0);

        let mut outcome = AutoMatchOutcome::default();
        for transaction in transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Unmatched)
        {
            let amount = transaction.amount();
            if amount == zero {
                outcome.remaining += 1;
                continue;
            }

            let candidates: Vec<&Payment> = payments
                .iter()
                .filter(|p| {
                    p.status == PaymentStatus::Confirmed
                        && (&p.amount - &amount).abs() <= tolerance
                        && (p.date - transaction.date).num_days().abs() <= MATCH_WINDOW_DAYS
                })
                .collect();

            match candidates.as_slice() {
                [payment] => {
                    let update = TransactionUpdate::matched(
                        MatchType::Auto,
                        Some(payment.id),
                        payment.journal_entry_id.clone(),
                    );
                    let applied = self
                        .store
                        .update_transaction_if(transaction.id, TransactionStatus::Unmatched, update)
                        .await?;
                    if applied.is_some() {
                        debug!(
                            transaction_id = %transaction.id,
                            payment_id = %payment.id,
                            "auto-matched bank transaction"
                        );
                        outcome.matched += 1;
                    } else {
                        // Row advanced under us; nothing to do.
                        outcome.remaining += 1;
                    }
                }
                [] => {
                    outcome.remaining += 1;
                }
                _ => {
                    debug!(
                        transaction_id = %transaction.id,
                        candidates = candidates.len(),
                        "ambiguous auto-match left unmatched"
                    );
                    outcome.ambiguous += 1;
                    outcome.remaining += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Manually match an unmatched transaction to caller-supplied records.
    /// Matching a row that is already Matched or Reconciled is rejected;
    /// the state machine never moves backwards.
    pub async fn manual_match(
        &mut self,
        transaction_id: Uuid,
        manual: ManualMatch,
    ) -> FinanceResult<BankTransaction> {
        if manual.is_empty() {
            return Err(FinanceError::InvalidQuery(
                "manual match requires a payment, journal entry, or category account".to_string(),
            ));
        }

        let update = TransactionUpdate {
            status: Some(TransactionStatus::Matched),
            match_type: Some(MatchType::Manual),
            matched_payment_id: manual.payment_id,
            matched_journal_entry_id: manual.journal_entry_id,
            category_account_id: manual.category_account_id,
            ..TransactionUpdate::default()
        };

        match self
            .store
            .update_transaction_if(transaction_id, TransactionStatus::Unmatched, update)
            .await?
        {
            Some(updated) => Ok(updated),
            None => Err(self.transition_error(transaction_id, "manual match").await?),
        }
    }

    /// Reconcile a single matched transaction. Rejects rows that are not
    /// currently Matched.
    pub async fn reconcile(
        &mut self,
        transaction_id: Uuid,
        reconciled_by: &str,
    ) -> FinanceResult<BankTransaction> {
        let update = TransactionUpdate::reconciled(
            chrono::Utc::now().naive_utc(),
            reconciled_by.to_string(),
        );
        match self
            .store
            .update_transaction_if(transaction_id, TransactionStatus::Matched, update)
            .await?
        {
            Some(updated) => Ok(updated),
            None => Err(self.transition_error(transaction_id, "reconcile").await?),
        }
    }

    /// Reconcile many transactions. Each row's status is re-checked at
    /// update time, so rows already advanced by another actor are silently
    /// skipped; retrying the same id set is harmless.
    pub async fn reconcile_bulk(
        &mut self,
        transaction_ids: &[Uuid],
        reconciled_by: &str,
    ) -> FinanceResult<BulkReconcileOutcome> {
        let mut outcome = BulkReconcileOutcome::default();
        for &transaction_id in transaction_ids {
            let update = TransactionUpdate::reconciled(
                chrono::Utc::now().naive_utc(),
                reconciled_by.to_string(),
            );
            let applied = self
                .store
                .update_transaction_if(transaction_id, TransactionStatus::Matched, update)
                .await?;
            if applied.is_some() {
                outcome.reconciled += 1;
            } else {
                outcome.skipped += 1;
            }
        }
        Ok(outcome)
    }

    /// Reconciliation progress for a bank account. The difference between
    /// the bank balance and the cleared balance is the key correctness
    /// signal; it trends toward zero as the period completes.
    pub async fn summary(&self, bank_account_id: Uuid) -> FinanceResult<ReconciliationSummary> {
        let bank_account = self.require_bank_account(bank_account_id).await?;
        let transactions = self
            .store
            .list_bank_transactions(bank_account_id, None)
            .await?;

        let mut unmatched = 0;
        let mut matched = 0;
        let mut reconciled = 0;
        let mut cleared_balance = BigDecimal::from(0);
        let mut total_movement = BigDecimal::from(0);

        for transaction in &transactions {
            match transaction.status {
                TransactionStatus::Unmatched => unmatched += 1,
                TransactionStatus::Matched => matched += 1,
                TransactionStatus::Reconciled => reconciled += 1,
            }
            let movement = transaction.net_movement();
            if transaction.is_reconciled {
                cleared_balance += &movement;
            }
            total_movement += &movement;
        }

        let uncleared_balance = &total_movement - &cleared_balance;
        let difference = &bank_account.bank_balance - &cleared_balance;

        Ok(ReconciliationSummary {
            bank_account_id,
            total: transactions.len(),
            unmatched,
            matched,
            reconciled,
            cleared_balance,
            uncleared_balance,
            difference,
        })
    }

    /// Build the right error for a conditional update that did not apply:
    /// either the row does not exist, or its status was not the expected one.
    async fn transition_error(
        &self,
        transaction_id: Uuid,
        operation: &str,
    ) -> FinanceResult<FinanceError> {
        match self.store.get_bank_transaction(transaction_id).await? {
            Some(row) => Ok(FinanceError::InvalidTransition(format!(
                "{operation} requires a different prior state, transaction {transaction_id} is {:?}",
                row.status
            ))),
            None => Ok(FinanceError::BankTransactionNotFound(transaction_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn bank_account() -> BankAccount {
        BankAccount {
            id: Uuid::new_v4(),
            name: "Operating".to_string(),
            current_balance: BigDecimal::from(0),
            bank_balance: BigDecimal::from(0),
            ledger_account_id: Some("bank".to_string()),
        }
    }

    fn row(day: u32, debit: i64, credit: i64) -> ImportedRow {
        ImportedRow {
            date: date(day),
            description: format!("row {day}"),
            reference: None,
            debit: BigDecimal::from(debit),
            credit: BigDecimal::from(credit),
            balance: None,
        }
    }

    fn import(rows: Vec<ImportedRow>) -> StatementImport {
        let debits: BigDecimal = rows.iter().map(|r| r.debit.clone()).sum();
        let credits: BigDecimal = rows.iter().map(|r| r.credit.clone()).sum();
        StatementImport {
            statement_date: date(30),
            file_name: Some("june.csv".to_string()),
            opening_balance: BigDecimal::from(0),
            closing_balance: credits - debits,
            transactions: rows,
        }
    }

    fn payment(bank_account_id: Uuid, day: u32, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            bank_account_id,
            amount: BigDecimal::from(amount),
            date: date(day),
            status,
            journal_entry_id: Some("je1".to_string()),
        }
    }

    async fn engine_with_account() -> (ReconciliationEngine<MemoryStorage>, MemoryStorage, Uuid) {
        let storage = MemoryStorage::new();
        let account = bank_account();
        let account_id = account.id;
        storage.insert_bank_account(account);
        (ReconciliationEngine::new(storage.clone()), storage, account_id)
    }

    #[tokio::test]
    async fn import_creates_statement_and_unmatched_rows() {
        let (mut engine, _storage, account_id) = engine_with_account().await;
        let outcome = engine
            .import_statement(account_id, import(vec![row(1, 0, 500), row(2, 120, 0)]))
            .await
            .unwrap();

        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.statement.transaction_count, 2);
        assert_eq!(outcome.statement.total_debit, BigDecimal::from(120));
        assert_eq!(outcome.statement.total_credit, BigDecimal::from(500));

        let rows = engine
            .store
            .list_bank_transactions(account_id, Some(outcome.statement.id))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.status == TransactionStatus::Unmatched));
    }

    #[tokio::test]
    async fn import_with_invalid_row_persists_nothing() {
        let (mut engine, storage, account_id) = engine_with_account().await;
        let result = engine
            .import_statement(account_id, import(vec![row(1, 0, 500), row(2, 50, 50)]))
            .await;

        assert!(matches!(result, Err(FinanceError::InvalidImport(_))));
        assert_eq!(storage.statement_count(), 0);
        assert_eq!(storage.bank_transaction_count(), 0);
    }

    #[tokio::test]
    async fn import_rejects_unknown_bank_account() {
        let storage = MemoryStorage::new();
        let mut engine = ReconciliationEngine::new(storage);
        let missing = Uuid::new_v4();
        let result = engine.import_statement(missing, import(vec![row(1, 0, 10)])).await;
        assert!(matches!(
            result,
            Err(FinanceError::BankAccountNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn auto_match_links_single_candidate() {
        let (mut engine, storage, account_id) = engine_with_account().await;
        let pay = payment(account_id, 3, 500, PaymentStatus::Confirmed);
        let payment_id = pay.id;
        storage.insert_payment(pay);
        engine
            .import_statement(account_id, import(vec![row(1, 500, 0)]))
            .await
            .unwrap();

        let outcome = engine.auto_match(account_id, None).await.unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.ambiguous, 0);
        assert_eq!(outcome.remaining, 0);

        let rows = engine
            .store
            .list_bank_transactions(account_id, None)
            .await
            .unwrap();
        assert_eq!(rows[0].status, TransactionStatus::Matched);
        assert_eq!(rows[0].match_type, Some(MatchType::Auto));
        assert_eq!(rows[0].matched_payment_id, Some(payment_id));
        assert_eq!(rows[0].matched_journal_entry_id.as_deref(), Some("je1"));
    }

    #[tokio::test]
    async fn auto_match_leaves_ambiguous_rows_unmatched() {
        let (mut engine, storage, account_id) = engine_with_account().await;
        storage.insert_payment(payment(account_id, 2, 500, PaymentStatus::Confirmed));
        storage.insert_payment(payment(account_id, 4, 500, PaymentStatus::Confirmed));
        engine
            .import_statement(account_id, import(vec![row(3, 500, 0)]))
            .await
            .unwrap();

        let outcome = engine.auto_match(account_id, None).await.unwrap();
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.ambiguous, 1);
        assert_eq!(outcome.remaining, 1);

        let rows = engine
            .store
            .list_bank_transactions(account_id, None)
            .await
            .unwrap();
        assert_eq!(rows[0].status, TransactionStatus::Unmatched);
    }

    #[tokio::test]
    async fn auto_match_ignores_payments_outside_window() {
        let (mut engine, storage, account_id) = engine_with_account().await;
        // 9 days away, outside the 5-day window.
        storage.insert_payment(payment(account_id, 12, 500, PaymentStatus::Confirmed));
        // Right amount and date but not confirmed.
        storage.insert_payment(payment(account_id, 3, 500, PaymentStatus::Pending));
        engine
            .import_statement(account_id, import(vec![row(3, 500, 0)]))
            .await
            .unwrap();

        let outcome = engine.auto_match(account_id, None).await.unwrap();
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.remaining, 1);
    }

    #[tokio::test]
    async fn manual_match_requires_unmatched_row_and_some_target() {
        let (mut engine, _storage, account_id) = engine_with_account().await;
        let outcome = engine
            .import_statement(account_id, import(vec![row(5, 80, 0)]))
            .await
            .unwrap();
        let transaction_id = engine
            .store
            .list_bank_transactions(account_id, Some(outcome.statement.id))
            .await
            .unwrap()[0]
            .id;

        let empty = engine.manual_match(transaction_id, ManualMatch::default()).await;
        assert!(matches!(empty, Err(FinanceError::InvalidQuery(_))));

        let matched = engine
            .manual_match(
                transaction_id,
                ManualMatch {
                    category_account_id: Some("office_costs".to_string()),
                    ..ManualMatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(matched.status, TransactionStatus::Matched);
        assert_eq!(matched.match_type, Some(MatchType::Manual));
        assert_eq!(matched.category_account_id.as_deref(), Some("office_costs"));

        // Second manual match on the same row is rejected.
        let again = engine
            .manual_match(
                transaction_id,
                ManualMatch {
                    journal_entry_id: Some("je2".to_string()),
                    ..ManualMatch::default()
                },
            )
            .await;
        assert!(matches!(again, Err(FinanceError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn reconcile_requires_matched_state() {
        let (mut engine, _storage, account_id) = engine_with_account().await;
        let outcome = engine
            .import_statement(account_id, import(vec![row(5, 80, 0)]))
            .await
            .unwrap();
        let transaction_id = engine
            .store
            .list_bank_transactions(account_id, Some(outcome.statement.id))
            .await
            .unwrap()[0]
            .id;

        let premature = engine.reconcile(transaction_id, "ops").await;
        assert!(matches!(premature, Err(FinanceError::InvalidTransition(_))));

        engine
            .manual_match(
                transaction_id,
                ManualMatch {
                    journal_entry_id: Some("je1".to_string()),
                    ..ManualMatch::default()
                },
            )
            .await
            .unwrap();
        let reconciled = engine.reconcile(transaction_id, "ops").await.unwrap();
        assert_eq!(reconciled.status, TransactionStatus::Reconciled);
        assert!(reconciled.is_reconciled);
        assert_eq!(reconciled.reconciled_by.as_deref(), Some("ops"));
        assert!(reconciled.reconciled_at.is_some());
    }

    #[tokio::test]
    async fn reconcile_missing_row_reports_not_found() {
        let (mut engine, _storage, _account_id) = engine_with_account().await;
        let missing = Uuid::new_v4();
        let result = engine.reconcile(missing, "ops").await;
        assert!(matches!(
            result,
            Err(FinanceError::BankTransactionNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn bulk_reconcile_skips_and_is_idempotent() {
        let (mut engine, storage, account_id) = engine_with_account().await;
        storage.insert_payment(payment(account_id, 1, 300, PaymentStatus::Confirmed));
        let outcome = engine
            .import_statement(account_id, import(vec![row(1, 300, 0), row(2, 45, 0)]))
            .await
            .unwrap();
        engine.auto_match(account_id, None).await.unwrap();

        let ids: Vec<Uuid> = engine
            .store
            .list_bank_transactions(account_id, Some(outcome.statement.id))
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        // One row is Matched, the other still Unmatched.
        let first = engine.reconcile_bulk(&ids, "ops").await.unwrap();
        assert_eq!(first.reconciled, 1);
        assert_eq!(first.skipped, 1);

        // Re-running the same id set reconciles nothing further.
        let second = engine.reconcile_bulk(&ids, "ops").await.unwrap();
        assert_eq!(second.reconciled, 0);
        assert_eq!(second.skipped, 2);
    }

    #[tokio::test]
    async fn summary_tracks_cleared_and_difference() {
        let storage = MemoryStorage::new();
        let mut account = bank_account();
        account.bank_balance = BigDecimal::from(-500);
        let account_id = account.id;
        storage.insert_bank_account(account);
        storage.insert_payment(payment(account_id, 1, 500, PaymentStatus::Confirmed));
        let mut engine = ReconciliationEngine::new(storage);

        engine
            .import_statement(account_id, import(vec![row(1, 500, 0), row(2, 0, 200)]))
            .await
            .unwrap();
        engine.auto_match(account_id, None).await.unwrap();
        let ids: Vec<Uuid> = engine
            .store
            .list_bank_transactions(account_id, None)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        engine.reconcile_bulk(&ids, "ops").await.unwrap();

        let summary = engine.summary(account_id).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.reconciled, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.cleared_balance, BigDecimal::from(-500));
        assert_eq!(summary.uncleared_balance, BigDecimal::from(200));
        assert_eq!(summary.difference, BigDecimal::from(0));
    }
}
