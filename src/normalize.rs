use crate::canonical::canonicalize;
use crate::coercion::coerce_year;
use crate::ratios::derive_ratios;
use crate::schema::{CanonicalField, FieldValue, Record};
use log::debug;

/// Normalizes one raw record: canonical column names, entity attribution from
/// `company_hint` when the record has none, derived ratios, and an integer
/// "Year". Never fails; malformed cells stay absent or keep their original text.
pub fn normalize_record(record: &Record, company_hint: Option<&str>) -> Record {
    let mut out = canonicalize(record);

    if let Some(hint) = company_hint.filter(|h| !h.is_empty()) {
        if out.company().is_none() {
            out.set(CanonicalField::Company, hint);
        }
    }

    derive_ratios(&mut out);

    let year = out
        .get_field(CanonicalField::Year)
        .filter(|v| !v.is_blank())
        .and_then(coerce_year);
    if let Some(year) = year {
        out.set(CanonicalField::Year, FieldValue::Integer(year));
    }

    out
}

/// Normalizes every record, preserving input order.
pub fn normalize_rows(rows: &[Record], company_hint: Option<&str>) -> Vec<Record> {
    debug!(
        "Normalizing {} row(s) with company hint {:?}",
        rows.len(),
        company_hint
    );
    rows.iter()
        .map(|row| normalize_record(row, company_hint))
        .collect()
}
