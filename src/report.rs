use crate::grouping::sort_by_year;
use crate::narrative::format_pct;
use crate::schema::{CanonicalField, CompanyGroup, FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Columns of the per-company summary table, in display order.
pub const SUMMARY_COLUMNS: [CanonicalField; 16] = [
    CanonicalField::Year,
    CanonicalField::Revenue,
    CanonicalField::Cogs,
    CanonicalField::GrossProfit,
    CanonicalField::NetIncome,
    CanonicalField::CurrentAssets,
    CanonicalField::CurrentLiabilities,
    CanonicalField::Inventory,
    CanonicalField::TotalAssets,
    CanonicalField::Equity,
    CanonicalField::GrossMargin,
    CanonicalField::NetMargin,
    CanonicalField::CurrentRatio,
    CanonicalField::QuickRatio,
    CanonicalField::Roa,
    CanonicalField::Roe,
];

/// Per-company values aligned to a shared year axis. Missing values are 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySeries {
    pub name: String,
    pub revenue: Vec<f64>,
    pub net_income: Vec<f64>,
    pub net_margin_pct: Vec<f64>,
}

/// Distinct years present across all records, ascending.
pub fn year_axis(rows: &[Record]) -> Vec<i64> {
    rows.iter()
        .filter_map(|r| r.number(CanonicalField::Year))
        .map(|y| y as i64)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn company_series(groups: &[CompanyGroup], years: &[i64]) -> Vec<CompanySeries> {
    groups
        .iter()
        .map(|group| {
            let at_year = |year: i64, field: CanonicalField| {
                group
                    .rows
                    .iter()
                    .find(|r| r.number(CanonicalField::Year) == Some(year as f64))
                    .and_then(|r| r.number(field))
                    .unwrap_or(0.0)
            };

            CompanySeries {
                name: group.company.clone(),
                revenue: years
                    .iter()
                    .map(|y| at_year(*y, CanonicalField::Revenue))
                    .collect(),
                net_income: years
                    .iter()
                    .map(|y| at_year(*y, CanonicalField::NetIncome))
                    .collect(),
                net_margin_pct: years
                    .iter()
                    .map(|y| at_year(*y, CanonicalField::NetMargin) * 100.0)
                    .collect(),
            }
        })
        .collect()
}

/// Header row plus one row per record of `group`, sorted by year.
pub fn summary_table(group: &CompanyGroup) -> Vec<Vec<String>> {
    let mut table = Vec::with_capacity(group.rows.len() + 1);
    table.push(
        SUMMARY_COLUMNS
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
    );

    for record in sort_by_year(&group.rows) {
        table.push(
            SUMMARY_COLUMNS
                .iter()
                .map(|c| format_cell(*c, record.get_field(*c)))
                .collect(),
        );
    }
    table
}

fn format_cell(field: CanonicalField, value: Option<&FieldValue>) -> String {
    let number = match value {
        Some(FieldValue::Integer(i)) => *i as f64,
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(s)) => return s.clone(),
        Some(FieldValue::Null) | None => return String::new(),
    };

    if field.is_percentage() {
        format_pct(number)
    } else if number.fract() == 0.0 {
        format!("{:.0}", number)
    } else {
        format!("{:.2}", number)
    }
}

/// Joins lines as a bulleted text block.
pub fn render_bullets(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("• {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_company;
    use crate::normalize::normalize_rows;

    fn raw(pairs: &[(&str, FieldValue)]) -> Record {
        pairs.iter().cloned().collect()
    }

    fn dataset() -> Vec<Record> {
        normalize_rows(
            &[
                raw(&[
                    ("Company", "Acme".into()),
                    ("Year", "FY2021".into()),
                    ("Revenue", FieldValue::Number(200.0)),
                    ("Net Income", FieldValue::Number(10.0)),
                ]),
                raw(&[
                    ("Company", "Acme".into()),
                    ("Year", FieldValue::Integer(2020)),
                    ("Revenue", FieldValue::Number(100.0)),
                    ("COGS", FieldValue::Number(60.0)),
                    ("Net Income", FieldValue::Number(10.0)),
                ]),
                raw(&[
                    ("Company", "Globex".into()),
                    ("Year", FieldValue::Integer(2022)),
                    ("Revenue", "n/a".into()),
                ]),
            ],
            None,
        )
    }

    #[test]
    fn test_year_axis_is_sorted_and_distinct() {
        let mut rows = dataset();
        rows.push(Record::new());
        assert_eq!(year_axis(&rows), vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_company_series_alignment() {
        let rows = dataset();
        let years = year_axis(&rows);
        let series = company_series(&group_by_company(&rows), &years);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Acme");
        assert_eq!(series[0].revenue, vec![100.0, 200.0, 0.0]);
        assert_eq!(series[0].net_income, vec![10.0, 10.0, 0.0]);
        assert!((series[0].net_margin_pct[0] - 10.0).abs() < 1e-9);
        assert!((series[0].net_margin_pct[1] - 5.0).abs() < 1e-9);
        assert_eq!(series[1].revenue, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_summary_table_formatting() {
        let rows = dataset();
        let groups = group_by_company(&rows);
        let table = summary_table(&groups[0]);

        assert_eq!(table.len(), 3);
        assert_eq!(table[0][0], "Year");
        assert_eq!(table[0][15], "ROE");

        let first = &table[1];
        assert_eq!(first[0], "2020");
        assert_eq!(first[1], "100");
        assert_eq!(first[3], "40");
        assert_eq!(first[10], "40.00%");
        assert_eq!(first[11], "10.00%");
        assert_eq!(first[12], "");

        let globex = summary_table(&groups[1]);
        assert_eq!(globex[1][1], "n/a");
    }

    #[test]
    fn test_render_bullets() {
        let text = render_bullets(&["one".to_string(), "two".to_string()]);
        assert_eq!(text, "• one\n• two");
    }
}
