//! Financial statement generators
//!
//! Every report here is a pure transformation of balance aggregator output
//! plus at most one or two auxiliary masters. Reports never mutate anything
//! and may run concurrently and repeatedly.

pub mod balance_sheet;
pub mod budget;
pub mod cash_flow;
pub mod dimensions;
pub mod profit_loss;
pub mod trial_balance;
pub mod variance;

pub use balance_sheet::*;
pub use budget::*;
pub use cash_flow::*;
pub use dimensions::*;
pub use profit_loss::*;
pub use trial_balance::*;
pub use variance::*;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::ledger::{aggregate_balances, AccountBalance, AccountHierarchy, BalanceQuery};
use crate::traits::{LedgerStore, ReferenceStore};
use crate::types::*;

/// Report generator over a ledger and reference store
pub struct Reports<S> {
    store: S,
}

impl<S: LedgerStore + ReferenceStore> Reports<S> {
    /// Create a report generator backed by the given storage
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The balance-query contract: one row per active account with
    /// debit/credit totals and a signed balance.
    pub async fn account_balances(
        &self,
        query: &BalanceQuery,
    ) -> FinanceResult<Vec<AccountBalance>> {
        let filter = query.line_filter()?;
        let accounts = self.store.list_accounts().await?;
        let lines = self.store.posted_lines(&filter).await?;
        Ok(aggregate_balances(&accounts, &lines))
    }

    /// Trial balance over an arbitrary balance query
    pub async fn trial_balance(&self, query: BalanceQuery) -> FinanceResult<TrialBalanceReport> {
        let balances = self.account_balances(&query).await?;
        Ok(build_trial_balance(query, &balances))
    }

    /// Balance sheet as of a date, with retained earnings folded into equity
    pub async fn balance_sheet(&self, as_of_date: NaiveDate) -> FinanceResult<BalanceSheetReport> {
        let balances = self
            .account_balances(&BalanceQuery::as_of(as_of_date))
            .await?;
        Ok(build_balance_sheet(as_of_date, &balances))
    }

    /// Profit & loss for an inclusive period
    pub async fn profit_and_loss(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> FinanceResult<ProfitAndLossReport> {
        let balances = self
            .account_balances(&BalanceQuery::period(start_date, end_date))
            .await?;
        Ok(build_profit_and_loss(start_date, end_date, &balances))
    }

    /// Cash flow statement for a period, by the requested method
    pub async fn cash_flow(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        method: CashFlowMethod,
    ) -> FinanceResult<CashFlowReport> {
        // Validates the period for both methods.
        let period_filter = BalanceQuery::period(start_date, end_date).line_filter()?;
        match method {
            CashFlowMethod::Direct => {
                let accounts = self.store.list_accounts().await?;
                let cash_accounts = cash_account_ids(&accounts);
                let lines = self.store.posted_lines(&period_filter).await?;
                Ok(CashFlowReport::Direct(build_direct_cash_flow(
                    start_date,
                    end_date,
                    &cash_accounts,
                    &lines,
                )))
            }
            CashFlowMethod::Indirect => {
                let profit_loss = self.profit_and_loss(start_date, end_date).await?;
                let opening = self
                    .account_balances(&BalanceQuery::as_of(start_date))
                    .await?;
                let closing = self
                    .account_balances(&BalanceQuery::as_of(end_date))
                    .await?;
                Ok(CashFlowReport::Indirect(build_indirect_cash_flow(
                    start_date,
                    end_date,
                    profit_loss.net_profit,
                    &opening,
                    &closing,
                )))
            }
        }
    }

    /// Budget vs actual over the budget's own period
    pub async fn budget_vs_actual(&self, budget_id: &str) -> FinanceResult<BudgetVsActualReport> {
        let budget = self
            .store
            .get_budget(budget_id)
            .await?
            .ok_or_else(|| FinanceError::BudgetNotFound(budget_id.to_string()))?;
        let actuals = self
            .account_balances(&BalanceQuery::period(budget.start_date, budget.end_date))
            .await?;
        build_budget_vs_actual(&budget, &actuals)
    }

    /// Per-account variance between two arbitrary periods
    pub async fn variance_analysis(
        &self,
        current_period: Period,
        prior_period: Period,
    ) -> FinanceResult<VarianceAnalysisReport> {
        let current = self
            .account_balances(&BalanceQuery::period(
                current_period.start_date,
                current_period.end_date,
            ))
            .await?;
        let prior = self
            .account_balances(&BalanceQuery::period(
                prior_period.start_date,
                prior_period.end_date,
            ))
            .await?;
        Ok(build_variance_analysis(
            current_period,
            prior_period,
            &current,
            &prior,
        ))
    }

    /// Activity grouped by cost center or project for a period
    pub async fn dimension_report(
        &self,
        kind: DimensionKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> FinanceResult<DimensionReport> {
        let filter = BalanceQuery::period(start_date, end_date).line_filter()?;
        let lines = self.store.posted_lines(&filter).await?;
        let names: HashMap<String, String> = match kind {
            DimensionKind::CostCenter => self
                .store
                .list_cost_centers()
                .await?
                .into_iter()
                .map(|cc| (cc.id, cc.name))
                .collect(),
            DimensionKind::Project => self
                .store
                .list_projects()
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect(),
        };
        Ok(build_dimension_report(kind, start_date, end_date, &lines, &names))
    }

    /// Materialized chart-of-accounts hierarchy
    pub async fn account_hierarchy(&self) -> FinanceResult<AccountHierarchy> {
        let accounts = self.store.list_accounts().await?;
        Ok(AccountHierarchy::build(&accounts))
    }
}
