use crate::coercion::coerce;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping key used when a record carries no usable "Company" value.
pub const DEFAULT_COMPANY: &str = "Company A";

/// A single cell of a statement row, as produced by the file decoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// True when the value carries nothing: `Null`, or text that is blank once trimmed.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Loose truthiness used for entity attribution: zero, NaN and blank values do not count.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Integer(i) => *i != 0,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Null => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// The fixed vocabulary every recognised column is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Year,
    Revenue,
    Cogs,
    GrossProfit,
    NetIncome,
    CurrentAssets,
    CurrentLiabilities,
    Inventory,
    TotalAssets,
    Equity,
    Company,
    GrossMargin,
    NetMargin,
    CurrentRatio,
    QuickRatio,
    Roa,
    Roe,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 17] = [
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
        CanonicalField::Company,
        CanonicalField::GrossMargin,
        CanonicalField::NetMargin,
        CanonicalField::CurrentRatio,
        CanonicalField::QuickRatio,
        CanonicalField::Roa,
        CanonicalField::Roe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Year => "Year",
            CanonicalField::Revenue => "Revenue",
            CanonicalField::Cogs => "COGS",
            CanonicalField::GrossProfit => "Gross Profit",
            CanonicalField::NetIncome => "Net Income",
            CanonicalField::CurrentAssets => "Current Assets",
            CanonicalField::CurrentLiabilities => "Current Liabilities",
            CanonicalField::Inventory => "Inventory",
            CanonicalField::TotalAssets => "Total Assets",
            CanonicalField::Equity => "Equity",
            CanonicalField::Company => "Company",
            CanonicalField::GrossMargin => "Gross Margin",
            CanonicalField::NetMargin => "Net Margin",
            CanonicalField::CurrentRatio => "Current Ratio",
            CanonicalField::QuickRatio => "Quick Ratio",
            CanonicalField::Roa => "ROA",
            CanonicalField::Roe => "ROE",
        }
    }

    /// Ratio columns rendered as percentages in summary tables.
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            CanonicalField::GrossMargin
                | CanonicalField::NetMargin
                | CanonicalField::Roa
                | CanonicalField::Roe
        )
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One company-period observation. Column order is the order fields were inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_field(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.get(field.as_str())
    }

    /// Reads a field through numeric coercion; `None` means missing or unparseable.
    pub fn number(&self, field: CanonicalField) -> Option<f64> {
        coerce(self.get_field(field))
    }

    pub fn is_absent(&self, field: CanonicalField) -> bool {
        self.get_field(field).map_or(true, FieldValue::is_blank)
    }

    /// Inserts or replaces a value. A replaced key keeps its original column position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<FieldValue>) {
        self.insert(field.as_str(), value);
    }

    /// Writes `value` only when the field is absent. Returns whether a write happened.
    pub fn insert_if_absent(&mut self, field: CanonicalField, value: impl Into<FieldValue>) -> bool {
        if self.is_absent(field) {
            self.set(field, value);
            true
        } else {
            false
        }
    }

    /// The entity this record is attributed to, if it carries a usable one.
    pub fn company(&self) -> Option<String> {
        self.get_field(CanonicalField::Company)
            .filter(|v| v.is_truthy())
            .map(|v| v.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// All records attributed to one company, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyGroup {
    pub company: String,
    pub rows: Vec<Record>,
}
