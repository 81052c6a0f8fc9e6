//! Cost center and project dimension reports

use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Which optional journal-line dimension to group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionKind {
    CostCenter,
    Project,
}

/// Totals for one dimension value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReportRow {
    pub dimension_id: String,
    pub name: String,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    /// total_debit - total_credit
    pub net: BigDecimal,
}

/// Per-dimension activity report for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    pub kind: DimensionKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rows: Vec<DimensionReportRow>,
}

/// Group posted lines by the chosen dimension. Lines without the dimension
/// set are excluded entirely; there is no "unassigned" bucket. Display
/// names come from the dimension master, falling back to the raw id when
/// the master has no entry.
pub fn build_dimension_report(
    kind: DimensionKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
    lines: &[PostedLine],
    names: &HashMap<String, String>,
) -> DimensionReport {
    let mut totals: BTreeMap<String, (BigDecimal, BigDecimal)> = BTreeMap::new();
    for line in lines {
        let dimension_id = match kind {
            DimensionKind::CostCenter => line.cost_center_id.as_ref(),
            DimensionKind::Project => line.project_id.as_ref(),
        };
        let Some(dimension_id) = dimension_id else {
            continue;
        };
        let entry = totals
            .entry(dimension_id.clone())
            .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
        entry.0 += &line.debit;
        entry.1 += &line.credit;
    }

    let rows = totals
        .into_iter()
        .map(|(dimension_id, (total_debit, total_credit))| {
            let name = names
                .get(&dimension_id)
                .cloned()
                .unwrap_or_else(|| dimension_id.clone());
            let net = &total_debit - &total_credit;
            DimensionReportRow {
                dimension_id,
                name,
                total_debit,
                total_credit,
                net,
            }
        })
        .collect();

    DimensionReport {
        kind,
        start_date,
        end_date,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(account_id: &str, debit: i64, credit: i64, cc: Option<&str>, project: Option<&str>) -> PostedLine {
        PostedLine {
            entry_id: "je".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            source_document: None,
            account_id: account_id.to_string(),
            debit: BigDecimal::from(debit),
            credit: BigDecimal::from(credit),
            cost_center_id: cc.map(str::to_string),
            project_id: project.map(str::to_string),
        }
    }

    fn period() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        )
    }

    #[test]
    fn groups_by_cost_center_and_joins_names() {
        let (start, end) = period();
        let lines = vec![
            line("rent", 600, 0, Some("cc1"), None),
            line("wages", 400, 0, Some("cc1"), None),
            line("travel", 150, 0, Some("cc2"), None),
            line("cash", 0, 1_150, None, None), // no dimension, excluded
        ];
        let names: HashMap<String, String> =
            [("cc1".to_string(), "Operations".to_string())].into();

        let report =
            build_dimension_report(DimensionKind::CostCenter, start, end, &lines, &names);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].dimension_id, "cc1");
        assert_eq!(report.rows[0].name, "Operations");
        assert_eq!(report.rows[0].total_debit, BigDecimal::from(1_000));
        // Unknown to the master: falls back to the id.
        assert_eq!(report.rows[1].name, "cc2");
        assert_eq!(report.rows[1].net, BigDecimal::from(150));
    }

    #[test]
    fn project_grouping_ignores_cost_centers() {
        let (start, end) = period();
        let lines = vec![
            line("materials", 900, 0, Some("cc1"), Some("p1")),
            line("labour", 300, 0, Some("cc2"), None),
        ];
        let report = build_dimension_report(
            DimensionKind::Project,
            start,
            end,
            &lines,
            &HashMap::new(),
        );
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].dimension_id, "p1");
        assert_eq!(report.rows[0].total_debit, BigDecimal::from(900));
    }

    #[test]
    fn empty_when_no_line_carries_dimension() {
        let (start, end) = period();
        let lines = vec![line("cash", 100, 0, None, None)];
        let report = build_dimension_report(
            DimensionKind::CostCenter,
            start,
            end,
            &lines,
            &HashMap::new(),
        );
        assert!(report.rows.is_empty());
    }
}
