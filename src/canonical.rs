use crate::schema::{CanonicalField, Record};

/// Lower-cased, trimmed column labels and the canonical field each one means.
pub const SYNONYMS: &[(&str, CanonicalField)] = &[
    ("year", CanonicalField::Year),
    ("fiscal year", CanonicalField::Year),
    ("period", CanonicalField::Year),
    ("revenue", CanonicalField::Revenue),
    ("sales", CanonicalField::Revenue),
    ("turnover", CanonicalField::Revenue),
    ("cogs", CanonicalField::Cogs),
    ("cost of goods sold", CanonicalField::Cogs),
    ("gross profit", CanonicalField::GrossProfit),
    ("net income", CanonicalField::NetIncome),
    ("profit", CanonicalField::NetIncome),
    ("earnings", CanonicalField::NetIncome),
    ("current assets", CanonicalField::CurrentAssets),
    ("current liabilities", CanonicalField::CurrentLiabilities),
    ("inventory", CanonicalField::Inventory),
    ("total assets", CanonicalField::TotalAssets),
    ("shareholders' equity", CanonicalField::Equity),
    ("equity", CanonicalField::Equity),
    ("shareholders equity", CanonicalField::Equity),
    ("company", CanonicalField::Company),
    ("entity", CanonicalField::Company),
    ("brand", CanonicalField::Company),
];

/// Looks up the canonical field for a free-form column label.
pub fn canonical_field(label: &str) -> Option<CanonicalField> {
    let key = label.trim().to_lowercase();
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, field)| *field)
}

/// Renames every recognised column to its canonical name. Unknown columns are
/// kept verbatim and values are never touched. When two labels resolve to the
/// same canonical name, the later column wins.
pub fn canonicalize(record: &Record) -> Record {
    record
        .iter()
        .map(|(label, value)| {
            let name = canonical_field(label)
                .map(|field| field.as_str().to_string())
                .unwrap_or_else(|| label.clone());
            (name, value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;

    #[test]
    fn test_every_synonym_maps() {
        for (synonym, field) in SYNONYMS {
            let record: Record = [(*synonym, FieldValue::Number(1.0))].into_iter().collect();
            let canonical = canonicalize(&record);
            assert_eq!(canonical.len(), 1);
            assert_eq!(
                canonical.get(field.as_str()),
                Some(&FieldValue::Number(1.0)),
                "synonym '{}' should map to '{}'",
                synonym,
                field
            );
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(canonical_field("  Turnover "), Some(CanonicalField::Revenue));
        assert_eq!(canonical_field("NET INCOME"), Some(CanonicalField::NetIncome));
        assert_eq!(canonical_field("Shareholders' Equity"), Some(CanonicalField::Equity));
    }

    #[test]
    fn test_unknown_columns_pass_through() {
        let record: Record = [
            ("EBITDA", FieldValue::Number(12.0)),
            ("Sales", FieldValue::from("1,000")),
        ]
        .into_iter()
        .collect();

        let canonical = canonicalize(&record);
        assert_eq!(canonical.get("EBITDA"), Some(&FieldValue::Number(12.0)));
        assert_eq!(canonical.get("Revenue"), Some(&FieldValue::from("1,000")));
        assert!(canonical.get("Sales").is_none());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let record: Record = [
            ("Revenue", FieldValue::Number(1.0)),
            ("Sales", FieldValue::Number(2.0)),
        ]
        .into_iter()
        .collect();

        let canonical = canonicalize(&record);
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical.get("Revenue"), Some(&FieldValue::Number(2.0)));
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for field in CanonicalField::ALL {
            let record: Record = [(field.as_str(), FieldValue::Number(1.0))].into_iter().collect();
            assert_eq!(canonicalize(&record).get(field.as_str()), Some(&FieldValue::Number(1.0)));
        }
    }
}
