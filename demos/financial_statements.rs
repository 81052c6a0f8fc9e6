//! Financial statement generation example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use finance_core::utils::MemoryStorage;
use finance_core::{
    Account, AccountSubType, AccountType, BalanceQuery, CashFlowMethod, CashFlowReport,
    JournalEntry, JournalEntryLine, Reports,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📊 Finance Core - Financial Statements Example\n");

    let storage = MemoryStorage::new();

    // 1. Seed a small chart of accounts
    println!("🗂  Setting up Chart of Accounts...");
    let chart = [
        Account::new(
            "cash".to_string(),
            "1000".to_string(),
            "Cash at Bank".to_string(),
            AccountType::Asset,
        )
        .with_sub_type(AccountSubType::CurrentAsset)
        .cash_relevant(),
        Account::new(
            "capital".to_string(),
            "3000".to_string(),
            "Owner Capital".to_string(),
            AccountType::Equity,
        )
        .with_sub_type(AccountSubType::Capital),
        Account::new(
            "sales".to_string(),
            "4000".to_string(),
            "Sales Revenue".to_string(),
            AccountType::Income,
        )
        .with_sub_type(AccountSubType::OperatingIncome),
        Account::new(
            "rent".to_string(),
            "5000".to_string(),
            "Office Rent".to_string(),
            AccountType::Expense,
        )
        .with_sub_type(AccountSubType::OperatingExpense),
    ];
    for account in chart {
        println!("  ✓ {} - {}", account.code, account.name);
        storage.insert_account(account);
    }
    println!();

    // 2. Post a month of activity
    println!("💰 Posting January activity...");
    let entries = [
        JournalEntry::posted(
            "je1".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Owner investment".to_string(),
        )
        .with_source("capital_contribution".to_string())
        .with_line(JournalEntryLine::debit("cash".to_string(), BigDecimal::from(50_000)))
        .with_line(JournalEntryLine::credit("capital".to_string(), BigDecimal::from(50_000))),
        JournalEntry::posted(
            "je2".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            "Cash sale".to_string(),
        )
        .with_source("invoice".to_string())
        .with_line(JournalEntryLine::debit("cash".to_string(), BigDecimal::from(10_000)))
        .with_line(JournalEntryLine::credit("sales".to_string(), BigDecimal::from(10_000))),
        JournalEntry::posted(
            "je3".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            "January rent".to_string(),
        )
        .with_source("bill".to_string())
        .with_line(JournalEntryLine::debit("rent".to_string(), BigDecimal::from(2_000)))
        .with_line(JournalEntryLine::credit("cash".to_string(), BigDecimal::from(2_000))),
    ];
    for entry in entries {
        println!("  ✓ {} ({})", entry.description, entry.id);
        storage.insert_entry(entry);
    }
    println!();

    let reports = Reports::new(storage);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

    // 3. Trial balance
    let trial_balance = reports.trial_balance(BalanceQuery::period(start, end)).await?;
    println!("📋 Trial Balance (January)");
    for row in &trial_balance.rows {
        println!(
            "  {:<6} {:<16} debit {:>8}  credit {:>8}",
            row.code, row.name, row.debit, row.credit
        );
    }
    println!(
        "  totals: debit {} / credit {} (balanced: {})\n",
        trial_balance.total_debit, trial_balance.total_credit, trial_balance.is_balanced
    );

    // 4. Profit & loss
    let profit_loss = reports.profit_and_loss(start, end).await?;
    println!("📈 Profit & Loss");
    println!("  income   {}", profit_loss.total_income);
    println!("  expenses {}", profit_loss.total_expenses);
    println!("  net profit {}\n", profit_loss.net_profit);

    // 5. Balance sheet
    let balance_sheet = reports.balance_sheet(end).await?;
    println!("🏦 Balance Sheet as of {end}");
    println!("  assets      {}", balance_sheet.total_assets);
    println!("  liabilities {}", balance_sheet.total_liabilities);
    println!(
        "  equity      {} (incl. retained earnings {})",
        balance_sheet.total_equity, balance_sheet.retained_earnings
    );
    println!("  balanced: {}\n", balance_sheet.balanced);

    // 6. Direct cash flow
    let cash_flow = reports.cash_flow(start, end, CashFlowMethod::Direct).await?;
    if let CashFlowReport::Direct(direct) = &cash_flow {
        println!("💵 Cash Flow (direct method)");
        println!("  operating {}", direct.operating.net);
        println!("  investing {}", direct.investing.net);
        println!("  financing {}", direct.financing.net);
        println!("  net change in cash {}", direct.net_change_in_cash);
    }

    Ok(())
}
