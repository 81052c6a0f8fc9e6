//! Balance sheet generation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;
use crate::types::*;

/// Synthetic account id used for the retained earnings line folded into equity
pub const RETAINED_EARNINGS_ID: &str = "retained_earnings";

/// One balance sheet line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub balance: BigDecimal,
}

/// Balance sheet as of a date. Retained earnings (cumulative income minus
/// cumulative expenses through the date) is folded into equity so the
/// accounting identity can hold without a closing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    pub as_of_date: NaiveDate,
    pub assets: Vec<BalanceSheetLine>,
    pub liabilities: Vec<BalanceSheetLine>,
    pub equity: Vec<BalanceSheetLine>,
    pub total_assets: BigDecimal,
    pub total_liabilities: BigDecimal,
    pub total_equity: BigDecimal,
    pub retained_earnings: BigDecimal,
    /// Raw assets - (liabilities + equity)
    pub difference: BigDecimal,
    pub balanced: bool,
}

fn section_line(balance: &AccountBalance) -> BalanceSheetLine {
    BalanceSheetLine {
        account_id: balance.account.id.clone(),
        code: balance.account.code.clone(),
        name: balance.account.name.clone(),
        balance: balance.balance.clone(),
    }
}

/// Build a balance sheet from cumulative balances as of a date.
pub fn build_balance_sheet(
    as_of_date: NaiveDate,
    balances: &[AccountBalance],
) -> BalanceSheetReport {
    let eps = activity_epsilon();
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut equity = Vec::new();
    let mut total_income = BigDecimal::from(0);
    let mut total_expenses = BigDecimal::from(0);

    for balance in balances {
        match balance.account.account_type {
            AccountType::Asset if balance.balance.abs() > eps => {
                assets.push(section_line(balance));
            }
            AccountType::Liability if balance.balance.abs() > eps => {
                liabilities.push(section_line(balance));
            }
            AccountType::Equity if balance.balance.abs() > eps => {
                equity.push(section_line(balance));
            }
            AccountType::Income => total_income += &balance.balance,
            AccountType::Expense => total_expenses += &balance.balance,
            _ => {}
        }
    }

    let retained_earnings = &total_income - &total_expenses;
    if retained_earnings.abs() > eps {
        equity.push(BalanceSheetLine {
            account_id: RETAINED_EARNINGS_ID.to_string(),
            code: String::new(),
            name: "Retained Earnings".to_string(),
            balance: retained_earnings.clone(),
        });
    }

    let total_assets: BigDecimal = assets.iter().map(|l| l.balance.clone()).sum();
    let total_liabilities: BigDecimal = liabilities.iter().map(|l| l.balance.clone()).sum();
    let total_equity: BigDecimal = equity.iter().map(|l| l.balance.clone()).sum();
    let difference = &total_assets - (&total_liabilities + &total_equity);
    let balanced = difference.abs() < balance_tolerance();

    BalanceSheetReport {
        as_of_date,
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
        retained_earnings,
        difference,
        balanced,
    }
}
