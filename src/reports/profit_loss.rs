//! Profit & loss statement generation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;
use crate::types::*;

/// One P&L line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossLine {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub amount: BigDecimal,
}

/// Period-bounded profit & loss statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub income: Vec<ProfitLossLine>,
    pub expenses: Vec<ProfitLossLine>,
    pub total_income: BigDecimal,
    pub total_expenses: BigDecimal,
    /// total_income - total_expenses, possibly negative
    pub net_profit: BigDecimal,
    /// Positive magnitude of a loss, zero when profitable
    pub net_loss: BigDecimal,
}

/// Build a P&L from period-bounded balances. Only Income and Expense
/// accounts participate; quiet accounts are dropped from the line lists
/// but never affect totals.
pub fn build_profit_and_loss(
    start_date: NaiveDate,
    end_date: NaiveDate,
    balances: &[AccountBalance],
) -> ProfitAndLossReport {
    let mut income = Vec::new();
    let mut expenses = Vec::new();
    let mut total_income = BigDecimal::from(0);
    let mut total_expenses = BigDecimal::from(0);

    for balance in balances {
        let line = ProfitLossLine {
            account_id: balance.account.id.clone(),
            code: balance.account.code.clone(),
            name: balance.account.name.clone(),
            amount: balance.balance.clone(),
        };
        match balance.account.account_type {
            AccountType::Income => {
                total_income += &balance.balance;
                if balance.has_activity() {
                    income.push(line);
                }
            }
            AccountType::Expense => {
                total_expenses += &balance.balance;
                if balance.has_activity() {
                    expenses.push(line);
                }
            }
            _ => {}
        }
    }

    let net_profit = &total_income - &total_expenses;
    let zero = BigDecimal::from(0);
    let net_loss = if net_profit < zero {
        net_profit.abs()
    } else {
        zero
    };

    ProfitAndLossReport {
        start_date,
        end_date,
        income,
        expenses,
        total_income,
        total_expenses,
        net_profit,
        net_loss,
    }
}
