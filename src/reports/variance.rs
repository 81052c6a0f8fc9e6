//! Period-over-period variance analysis

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;
use crate::types::*;

/// An inclusive reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    /// Construct a period, rejecting an inverted range
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> FinanceResult<Self> {
        if start_date > end_date {
            return Err(FinanceError::InvalidQuery(format!(
                "period start {start_date} is after end {end_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }
}

/// Direction of movement between the two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceDirection {
    Increase,
    Decrease,
    NoChange,
}

/// One account compared across two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub current_balance: BigDecimal,
    pub prior_balance: BigDecimal,
    /// current - prior
    pub variance: BigDecimal,
    /// variance / prior * 100; when prior is zero, 100 if current is
    /// nonzero, else 0
    pub variance_percent: BigDecimal,
    pub direction: VarianceDirection,
}

/// Variance analysis report across two arbitrary periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceAnalysisReport {
    pub current_period: Period,
    pub prior_period: Period,
    pub rows: Vec<VarianceRow>,
}

/// Compare per-account balances between two periods. Accounts quiet in
/// both periods are dropped.
pub fn build_variance_analysis(
    current_period: Period,
    prior_period: Period,
    current: &[AccountBalance],
    prior: &[AccountBalance],
) -> VarianceAnalysisReport {
    let zero = BigDecimal::from(0);
    let prior_by_id: HashMap<&str, &AccountBalance> = prior
        .iter()
        .map(|b| (b.account.id.as_str(), b))
        .collect();

    let mut rows = Vec::new();
    for current_balance in current {
        let prior_balance = prior_by_id.get(current_balance.account.id.as_str());
        let prior_active = prior_balance.is_some_and(|b| b.has_activity());
        if !current_balance.has_activity() && !prior_active {
            continue;
        }

        let prior_amount = prior_balance
            .map(|b| b.balance.clone())
            .unwrap_or_else(|| zero.clone());
        let variance = &current_balance.balance - &prior_amount;
        let variance_percent = if prior_amount == zero {
            if current_balance.balance != zero {
                BigDecimal::from(100)
            } else {
                zero.clone()
            }
        } else {
            &variance / &prior_amount * BigDecimal::from(100)
        };
        let direction = if variance > zero {
            VarianceDirection::Increase
        } else if variance < zero {
            VarianceDirection::Decrease
        } else {
            VarianceDirection::NoChange
        };

        rows.push(VarianceRow {
            account_id: current_balance.account.id.clone(),
            code: current_balance.account.code.clone(),
            name: current_balance.account.name.clone(),
            account_type: current_balance.account.account_type,
            current_balance: current_balance.balance.clone(),
            prior_balance: prior_amount,
            variance,
            variance_percent,
            direction,
        });
    }

    VarianceAnalysisReport {
        current_period,
        prior_period,
        rows,
    }
}
