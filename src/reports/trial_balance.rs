//! Trial balance generation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountBalance, BalanceQuery};
use crate::types::*;

/// One trial balance row; the balance sits in the debit or credit column
/// according to the account's normal side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
}

/// Trial balance: every account with activity, presented per normal side,
/// with column totals. The difference is a diagnostic signal for the
/// caller, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    pub query: BalanceQuery,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    /// Raw total_debit - total_credit, surfaced as-is
    pub difference: BigDecimal,
    pub is_balanced: bool,
}

/// Build a trial balance from aggregated balances. Accounts with no
/// material activity are dropped; a negative balance flips to the
/// opposite column.
pub fn build_trial_balance(query: BalanceQuery, balances: &[AccountBalance]) -> TrialBalanceReport {
    let zero = BigDecimal::from(0);
    let mut rows = Vec::new();
    let mut total_debit = BigDecimal::from(0);
    let mut total_credit = BigDecimal::from(0);

    for balance in balances.iter().filter(|b| b.has_activity()) {
        let normal_side = balance.account.account_type.normal_balance();
        let (debit, credit) = if balance.balance >= zero {
            match normal_side {
                EntryType::Debit => (balance.balance.clone(), zero.clone()),
                EntryType::Credit => (zero.clone(), balance.balance.clone()),
            }
        } else {
            match normal_side {
                EntryType::Debit => (zero.clone(), balance.balance.abs()),
                EntryType::Credit => (balance.balance.abs(), zero.clone()),
            }
        };

        total_debit += &debit;
        total_credit += &credit;
        rows.push(TrialBalanceRow {
            account_id: balance.account.id.clone(),
            code: balance.account.code.clone(),
            name: balance.account.name.clone(),
            account_type: balance.account.account_type,
            debit,
            credit,
        });
    }

    let difference = &total_debit - &total_credit;
    let is_balanced = difference.abs() < balance_tolerance();

    TrialBalanceReport {
        query,
        rows,
        total_debit,
        total_credit,
        difference,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(id: &str, code: &str, account_type: AccountType, debit: i64, credit: i64) -> AccountBalance {
        let account = Account::new(id.to_string(), code.to_string(), id.to_string(), account_type);
        let total_debit = BigDecimal::from(debit);
        let total_credit = BigDecimal::from(credit);
        let signed = account_type.signed_balance(&total_debit, &total_credit);
        AccountBalance {
            account,
            total_debit,
            total_credit,
            balance: signed,
        }
    }

    #[test]
    fn balanced_postings_produce_zero_difference() {
        let balances = vec![
            balance("cash", "1000", AccountType::Asset, 10_000, 2_000),
            balance("sales", "4000", AccountType::Income, 0, 10_000),
            balance("rent", "6000", AccountType::Expense, 2_000, 0),
        ];

        let report = build_trial_balance(BalanceQuery::default(), &balances);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_debit, BigDecimal::from(10_000));
        assert_eq!(report.total_credit, BigDecimal::from(10_000));
        assert_eq!(report.difference, BigDecimal::from(0));
        assert!(report.is_balanced);
    }

    #[test]
    fn quiet_accounts_are_dropped() {
        let balances = vec![
            balance("cash", "1000", AccountType::Asset, 500, 0),
            balance("unused", "1900", AccountType::Asset, 0, 0),
        ];
        let report = build_trial_balance(BalanceQuery::default(), &balances);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].account_id, "cash");
    }

    #[test]
    fn negative_balance_flips_column() {
        // Asset driven negative (overdrawn) shows up in the credit column.
        let balances = vec![balance("bank", "1010", AccountType::Asset, 100, 400)];
        let report = build_trial_balance(BalanceQuery::default(), &balances);
        assert_eq!(report.rows[0].debit, BigDecimal::from(0));
        assert_eq!(report.rows[0].credit, BigDecimal::from(300));
    }

    #[test]
    fn imbalance_is_surfaced_not_raised() {
        // One-sided data, as seen when upstream bookkeeping is broken.
        let balances = vec![balance("cash", "1000", AccountType::Asset, 750, 0)];
        let report = build_trial_balance(BalanceQuery::default(), &balances);
        assert!(!report.is_balanced);
        assert_eq!(report.difference, BigDecimal::from(750));
    }
}
