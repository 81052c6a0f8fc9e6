//! Cash flow statement generation
//!
//! Two independently computed methods. Direct walks cash-account journal
//! lines and buckets them by the entry's source document; indirect starts
//! from net income and adjusts for working-capital movement. The two are
//! not cross-validated against each other.

use std::collections::HashSet;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ledger::AccountBalance;
use crate::types::*;

/// Account-code prefix identifying cash accounts when none are explicitly
/// flagged as cash-flow relevant.
pub const CASH_CODE_PREFIX: &str = "10";

/// Recognized source document kinds. The tag on a journal entry is free
/// text upstream; this enum is the one place it is interpreted, so an
/// unknown tag is noticed (and logged) instead of silently classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceDocument {
    Invoice,
    Bill,
    Receipt,
    PaymentVoucher,
    PayrollRun,
    JournalVoucher,
    AssetPurchase,
    AssetDisposal,
    LoanDrawdown,
    LoanRepayment,
    CapitalContribution,
    DividendPayout,
}

impl SourceDocument {
    /// Parse an upstream tag. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "invoice" => Some(Self::Invoice),
            "bill" => Some(Self::Bill),
            "receipt" => Some(Self::Receipt),
            "payment" | "payment_voucher" => Some(Self::PaymentVoucher),
            "payroll" | "payroll_run" => Some(Self::PayrollRun),
            "journal" | "journal_voucher" => Some(Self::JournalVoucher),
            "asset_purchase" => Some(Self::AssetPurchase),
            "asset_disposal" | "asset_sale" => Some(Self::AssetDisposal),
            "loan_drawdown" => Some(Self::LoanDrawdown),
            "loan_repayment" => Some(Self::LoanRepayment),
            "capital_contribution" => Some(Self::CapitalContribution),
            "dividend" | "dividend_payout" => Some(Self::DividendPayout),
            _ => None,
        }
    }

    /// Cash flow bucket for this document kind
    pub fn activity(&self) -> CashFlowActivity {
        match self {
            Self::Invoice
            | Self::Bill
            | Self::Receipt
            | Self::PaymentVoucher
            | Self::PayrollRun
            | Self::JournalVoucher => CashFlowActivity::Operating,
            Self::AssetPurchase | Self::AssetDisposal => CashFlowActivity::Investing,
            Self::LoanDrawdown
            | Self::LoanRepayment
            | Self::CapitalContribution
            | Self::DividendPayout => CashFlowActivity::Financing,
        }
    }
}

/// Inflow/outflow totals for one activity bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowBucket {
    pub inflow: BigDecimal,
    pub outflow: BigDecimal,
    pub net: BigDecimal,
}

impl Default for CashFlowBucket {
    fn default() -> Self {
        Self {
            inflow: BigDecimal::from(0),
            outflow: BigDecimal::from(0),
            net: BigDecimal::from(0),
        }
    }
}

impl CashFlowBucket {
    fn add(&mut self, net_cash: &BigDecimal) {
        if *net_cash >= BigDecimal::from(0) {
            self.inflow += net_cash;
        } else {
            self.outflow += net_cash.abs();
        }
        self.net += net_cash;
    }
}

/// Direct-method cash flow statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCashFlow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub operating: CashFlowBucket,
    pub investing: CashFlowBucket,
    pub financing: CashFlowBucket,
    pub net_change_in_cash: BigDecimal,
}

/// Indirect-method cash flow statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCashFlow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub net_income: BigDecimal,
    /// -(closing current-asset balance - opening current-asset balance)
    pub receivables_contribution: BigDecimal,
    /// +(closing current-liability balance - opening current-liability balance)
    pub payables_contribution: BigDecimal,
    pub net_change_in_cash: BigDecimal,
}

/// Method selector for the cash flow statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowMethod {
    Direct,
    Indirect,
}

/// Cash flow statement, computed by one of the two methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CashFlowReport {
    Direct(DirectCashFlow),
    Indirect(IndirectCashFlow),
}

impl CashFlowReport {
    /// Net change in cash for the period under whichever method was used
    pub fn net_change_in_cash(&self) -> &BigDecimal {
        match self {
            Self::Direct(report) => &report.net_change_in_cash,
            Self::Indirect(report) => &report.net_change_in_cash,
        }
    }
}

/// Pick the cash account id set: explicitly flagged accounts, or the code
/// prefix fallback when nothing is flagged.
pub fn cash_account_ids(accounts: &[Account]) -> HashSet<String> {
    let flagged: HashSet<String> = accounts
        .iter()
        .filter(|a| a.is_active && a.is_cash_flow_relevant)
        .map(|a| a.id.clone())
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }
    accounts
        .iter()
        .filter(|a| a.is_active && a.code.starts_with(CASH_CODE_PREFIX))
        .map(|a| a.id.clone())
        .collect()
}

/// Direct method: walk every posted line touching a cash account within
/// the period and bucket its net cash by the entry's source document tag.
pub fn build_direct_cash_flow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    cash_accounts: &HashSet<String>,
    lines: &[PostedLine],
) -> DirectCashFlow {
    let mut operating = CashFlowBucket::default();
    let mut investing = CashFlowBucket::default();
    let mut financing = CashFlowBucket::default();

    for line in lines {
        if !cash_accounts.contains(&line.account_id) {
            continue;
        }
        let net_cash = &line.debit - &line.credit;
        let activity = match line.source_document.as_deref() {
            Some(tag) => match SourceDocument::from_tag(tag) {
                Some(document) => document.activity(),
                None => {
                    warn!(
                        entry_id = %line.entry_id,
                        tag,
                        "unrecognized source document tag, defaulting to operating"
                    );
                    CashFlowActivity::Operating
                }
            },
            None => CashFlowActivity::Operating,
        };
        match activity {
            CashFlowActivity::Operating => operating.add(&net_cash),
            CashFlowActivity::Investing => investing.add(&net_cash),
            CashFlowActivity::Financing => financing.add(&net_cash),
        }
    }

    let net_change_in_cash = &operating.net + &investing.net + &financing.net;
    DirectCashFlow {
        start_date,
        end_date,
        operating,
        investing,
        financing,
        net_change_in_cash,
    }
}

fn sub_type_total(balances: &[AccountBalance], sub_type: AccountSubType) -> BigDecimal {
    balances
        .iter()
        .filter(|b| b.account.sub_type == Some(sub_type))
        .map(|b| b.balance.clone())
        .sum()
}

/// Indirect method: period net income adjusted for the change in
/// current-asset and current-liability balances between the period's
/// opening and closing point-in-time aggregations.
pub fn build_indirect_cash_flow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    net_income: BigDecimal,
    opening: &[AccountBalance],
    closing: &[AccountBalance],
) -> IndirectCashFlow {
    let receivables_delta = sub_type_total(closing, AccountSubType::CurrentAsset)
        - sub_type_total(opening, AccountSubType::CurrentAsset);
    let payables_delta = sub_type_total(closing, AccountSubType::CurrentLiability)
        - sub_type_total(opening, AccountSubType::CurrentLiability);

    let receivables_contribution = -receivables_delta;
    let payables_contribution = payables_delta;
    let net_change_in_cash = &net_income + &receivables_contribution + &payables_contribution;

    IndirectCashFlow {
        start_date,
        end_date,
        net_income,
        receivables_contribution,
        payables_contribution,
        net_change_in_cash,
    }
}
