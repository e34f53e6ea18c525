use crate::schema::{CanonicalField, CompanyGroup, Record, DEFAULT_COMPANY};
use indexmap::IndexMap;
use log::debug;

/// Partitions records by their "Company" value, falling back to
/// [`DEFAULT_COMPANY`]. Groups appear in first-appearance order.
pub fn group_by_company(rows: &[Record]) -> Vec<CompanyGroup> {
    group_by_company_with(rows, DEFAULT_COMPANY)
}

/// Same as [`group_by_company`] with a caller-chosen fallback key.
pub fn group_by_company_with(rows: &[Record], default_company: &str) -> Vec<CompanyGroup> {
    let mut groups: IndexMap<String, Vec<Record>> = IndexMap::new();

    for row in rows {
        let company = row
            .company()
            .unwrap_or_else(|| default_company.to_string());
        groups.entry(company).or_default().push(row.clone());
    }

    debug!("Grouped {} row(s) into {} company group(s)", rows.len(), groups.len());

    groups
        .into_iter()
        .map(|(company, rows)| CompanyGroup { company, rows })
        .collect()
}

/// Returns the records sorted ascending by "Year". Records without a numeric
/// year sort as year 0; ties keep their input order.
pub fn sort_by_year(rows: &[Record]) -> Vec<Record> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| year_key(a).total_cmp(&year_key(b)));
    sorted
}

fn year_key(record: &Record) -> f64 {
    record.number(CanonicalField::Year).unwrap_or(0.0)
}
