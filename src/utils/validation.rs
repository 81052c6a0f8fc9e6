//! Input validation helpers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::reconciliation::types::ImportedRow;
use crate::types::{FinanceError, FinanceResult};

/// Reject an inverted date range
pub fn validate_period(start_date: NaiveDate, end_date: NaiveDate) -> FinanceResult<()> {
    if start_date > end_date {
        return Err(FinanceError::InvalidQuery(format!(
            "start date {start_date} is after end date {end_date}"
        )));
    }
    Ok(())
}

/// Reject a negative monetary amount
pub fn validate_non_negative(amount: &BigDecimal, field: &str) -> FinanceResult<()> {
    if amount < &BigDecimal::from(0) {
        return Err(FinanceError::InvalidImport(format!(
            "{field} must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Validate every row of a statement import before anything is persisted.
/// Each row must carry exactly one nonzero leg, and neither leg may be
/// negative.
pub fn validate_import_rows(rows: &[ImportedRow]) -> FinanceResult<()> {
    if rows.is_empty() {
        return Err(FinanceError::InvalidImport(
            "statement import contains no transactions".to_string(),
        ));
    }
    let zero = BigDecimal::from(0);
    for (index, row) in rows.iter().enumerate() {
        validate_non_negative(&row.debit, &format!("row {index} debit"))?;
        validate_non_negative(&row.credit, &format!("row {index} credit"))?;
        let has_debit = row.debit != zero;
        let has_credit = row.credit != zero;
        if has_debit && has_credit {
            return Err(FinanceError::InvalidImport(format!(
                "row {index} carries both a debit and a credit"
            )));
        }
        if !has_debit && !has_credit {
            return Err(FinanceError::InvalidImport(format!(
                "row {index} carries neither a debit nor a credit"
            )));
        }
    }
    Ok(())
}
