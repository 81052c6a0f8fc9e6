//! Bank reconciliation workflow example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use finance_core::utils::MemoryStorage;
use finance_core::{
    BankAccount, ImportedRow, ManualMatch, Payment, PaymentStatus, ReconciliationEngine,
    ReconciliationStore, StatementImport, TransactionStatus,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Finance Core - Bank Reconciliation Example\n");

    let storage = MemoryStorage::new();

    // 1. A bank account and its confirmed payment feed
    let bank_account = BankAccount {
        id: Uuid::new_v4(),
        name: "Operating Account".to_string(),
        current_balance: BigDecimal::from(12_000),
        bank_balance: BigDecimal::from(11_500),
        ledger_account_id: Some("cash".to_string()),
    };
    let bank_account_id = bank_account.id;
    storage.insert_bank_account(bank_account);
    storage.insert_payment(Payment {
        id: Uuid::new_v4(),
        bank_account_id,
        amount: BigDecimal::from(500),
        date: NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(),
        status: PaymentStatus::Confirmed,
        journal_entry_id: Some("je_supplier".to_string()),
    });

    let mut engine = ReconciliationEngine::new(storage.clone());

    // 2. Import the statement
    println!("📥 Importing bank statement...");
    let import = StatementImport {
        statement_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        file_name: Some("may.csv".to_string()),
        opening_balance: BigDecimal::from(12_120),
        closing_balance: BigDecimal::from(11_500),
        transactions: vec![
            ImportedRow {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                description: "Supplier payment".to_string(),
                reference: Some("CHQ-104".to_string()),
                debit: BigDecimal::from(500),
                credit: BigDecimal::from(0),
                balance: Some(BigDecimal::from(11_620)),
            },
            ImportedRow {
                date: NaiveDate::from_ymd_opt(2024, 5, 18).unwrap(),
                description: "Bank charges".to_string(),
                reference: None,
                debit: BigDecimal::from(120),
                credit: BigDecimal::from(0),
                balance: Some(BigDecimal::from(11_500)),
            },
        ],
    };
    let outcome = engine.import_statement(bank_account_id, import).await?;
    println!(
        "  ✓ statement {} with {} rows\n",
        outcome.statement.id, outcome.imported
    );

    // 3. Auto-match against the payment feed
    let matched = engine.auto_match(bank_account_id, None).await?;
    println!(
        "🔍 Auto-match: {} matched, {} ambiguous, {} remaining\n",
        matched.matched, matched.ambiguous, matched.remaining
    );

    // 4. Categorize the leftover bank charge by hand
    let rows = storage.list_bank_transactions(bank_account_id, None).await?;
    for row in &rows {
        if row.status == TransactionStatus::Unmatched {
            println!("✍️  Manually categorizing '{}'...", row.description);
            engine
                .manual_match(
                    row.id,
                    ManualMatch {
                        category_account_id: Some("bank_charges".to_string()),
                        ..ManualMatch::default()
                    },
                )
                .await?;
        }
    }

    // 5. Reconcile everything that is matched
    let ids: Vec<Uuid> = storage
        .list_bank_transactions(bank_account_id, None)
        .await?
        .iter()
        .map(|t| t.id)
        .collect();
    let bulk = engine.reconcile_bulk(&ids, "demo").await?;
    println!(
        "✅ Reconciled {} rows ({} skipped)\n",
        bulk.reconciled, bulk.skipped
    );

    // 6. Summary
    let summary = engine.summary(bank_account_id).await?;
    println!("📊 Reconciliation summary");
    println!("  rows: {} total / {} reconciled", summary.total, summary.reconciled);
    println!("  cleared balance:   {}", summary.cleared_balance);
    println!("  uncleared balance: {}", summary.uncleared_balance);
    println!("  difference vs bank: {}", summary.difference);

    Ok(())
}
