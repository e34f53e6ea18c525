use crate::schema::{CanonicalField, Record};
use log::debug;

/// A derived field and the rule computing it from a canonical record.
///
/// `derive` returns `None` whenever a prerequisite is missing or a
/// denominator is zero; the target is then left absent.
pub struct RatioRule {
    pub target: CanonicalField,
    pub derive: fn(&Record) -> Option<f64>,
}

/// Applied in order: later rules may read fields written by earlier ones.
pub const RATIO_RULES: &[RatioRule] = &[
    RatioRule {
        target: CanonicalField::GrossProfit,
        derive: gross_profit,
    },
    RatioRule {
        target: CanonicalField::GrossMargin,
        derive: gross_margin,
    },
    RatioRule {
        target: CanonicalField::NetMargin,
        derive: net_margin,
    },
    RatioRule {
        target: CanonicalField::CurrentRatio,
        derive: current_ratio,
    },
    RatioRule {
        target: CanonicalField::QuickRatio,
        derive: quick_ratio,
    },
    RatioRule {
        target: CanonicalField::Roa,
        derive: return_on_assets,
    },
    RatioRule {
        target: CanonicalField::Roe,
        derive: return_on_equity,
    },
];

/// Fills every derivable field that is still absent. Existing values are never
/// overwritten and non-finite results are discarded. Returns the number of
/// fields written.
pub fn derive_ratios(record: &mut Record) -> usize {
    let mut written = 0;
    for rule in RATIO_RULES {
        if !record.is_absent(rule.target) {
            continue;
        }
        if let Some(value) = (rule.derive)(record).filter(|v| v.is_finite()) {
            record.set(rule.target, value);
            written += 1;
        }
    }
    if written > 0 {
        debug!("Derived {} ratio field(s)", written);
    }
    written
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn gross_profit(record: &Record) -> Option<f64> {
    let revenue = record.number(CanonicalField::Revenue)?;
    let cogs = record.number(CanonicalField::Cogs)?;
    Some(revenue - cogs)
}

fn gross_margin(record: &Record) -> Option<f64> {
    let revenue = non_zero(record.number(CanonicalField::Revenue))?;
    let gross_profit = record.number(CanonicalField::GrossProfit)?;
    Some(gross_profit / revenue)
}

fn net_margin(record: &Record) -> Option<f64> {
    let revenue = non_zero(record.number(CanonicalField::Revenue))?;
    let net_income = record.number(CanonicalField::NetIncome)?;
    Some(net_income / revenue)
}

fn current_ratio(record: &Record) -> Option<f64> {
    let assets = record.number(CanonicalField::CurrentAssets)?;
    let liabilities = non_zero(record.number(CanonicalField::CurrentLiabilities))?;
    Some(assets / liabilities)
}

fn quick_ratio(record: &Record) -> Option<f64> {
    let assets = record.number(CanonicalField::CurrentAssets)?;
    let liabilities = non_zero(record.number(CanonicalField::CurrentLiabilities))?;
    let inventory = record.number(CanonicalField::Inventory).unwrap_or(0.0);
    Some((assets - inventory) / liabilities)
}

fn return_on_assets(record: &Record) -> Option<f64> {
    let net_income = record.number(CanonicalField::NetIncome)?;
    let total_assets = non_zero(record.number(CanonicalField::TotalAssets))?;
    Some(net_income / total_assets)
}

fn return_on_equity(record: &Record) -> Option<f64> {
    let net_income = record.number(CanonicalField::NetIncome)?;
    let equity = non_zero(record.number(CanonicalField::Equity))?;
    Some(net_income / equity)
}
