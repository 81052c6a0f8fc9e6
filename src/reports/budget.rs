//! Budget vs actual comparison

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;
use crate::types::*;

/// How an account is tracking against its budget line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// Within 5% of budget either way
    OnTrack,
    /// Expense running above budget
    OverBudget,
    /// Income running below budget
    UnderBudget,
    /// Any other deviation beyond 5%
    Favorable,
}

/// One budget line joined against actuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVsActualRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub budget_amount: BigDecimal,
    pub actual_amount: BigDecimal,
    /// actual - budget
    pub variance: BigDecimal,
    /// variance / budget * 100; zero when the budget amount is zero
    pub variance_percent: BigDecimal,
    pub status: BudgetStatus,
}

/// Budget vs actual report for one budget's own period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVsActualReport {
    pub budget_id: String,
    pub budget_name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub rows: Vec<BudgetVsActualRow>,
    pub total_budget: BigDecimal,
    pub total_actual: BigDecimal,
    pub total_variance: BigDecimal,
}

fn classify(
    account_type: AccountType,
    variance: &BigDecimal,
    variance_percent: &BigDecimal,
) -> BudgetStatus {
    let zero = BigDecimal::from(0);
    if variance_percent.abs() <= BigDecimal::from(5) {
        BudgetStatus::OnTrack
    } else if account_type == AccountType::Expense && *variance > zero {
        BudgetStatus::OverBudget
    } else if account_type == AccountType::Income && *variance < zero {
        BudgetStatus::UnderBudget
    } else {
        BudgetStatus::Favorable
    }
}

/// Join budget lines against aggregated actuals for the budget period.
/// A budget line pointing at an unknown account is a client error.
pub fn build_budget_vs_actual(
    budget: &Budget,
    actuals: &[AccountBalance],
) -> FinanceResult<BudgetVsActualReport> {
    let zero = BigDecimal::from(0);
    let mut rows = Vec::new();
    let mut total_budget = BigDecimal::from(0);
    let mut total_actual = BigDecimal::from(0);

    for line in &budget.lines {
        let actual = actuals
            .iter()
            .find(|b| b.account.id == line.account_id)
            .ok_or_else(|| FinanceError::AccountNotFound(line.account_id.clone()))?;

        let variance = &actual.balance - &line.total_amount;
        let variance_percent = if line.total_amount == zero {
            zero.clone()
        } else {
            &variance / &line.total_amount * BigDecimal::from(100)
        };
        let status = classify(actual.account.account_type, &variance, &variance_percent);

        total_budget += &line.total_amount;
        total_actual += &actual.balance;
        rows.push(BudgetVsActualRow {
            account_id: actual.account.id.clone(),
            code: actual.account.code.clone(),
            name: actual.account.name.clone(),
            account_type: actual.account.account_type,
            budget_amount: line.total_amount.clone(),
            actual_amount: actual.balance.clone(),
            variance,
            variance_percent,
            status,
        });
    }

    let total_variance = &total_actual - &total_budget;
    Ok(BudgetVsActualReport {
        budget_id: budget.id.clone(),
        budget_name: budget.name.clone(),
        start_date: budget.start_date,
        end_date: budget.end_date,
        rows,
        total_budget,
        total_actual,
        total_variance,
    })
}
