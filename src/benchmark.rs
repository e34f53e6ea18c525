use crate::grouping::{group_by_company_with, sort_by_year};
use crate::schema::{CanonicalField, CompanyGroup, Record, DEFAULT_COMPANY};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyBenchmark {
    #[schemars(description = "Company identifier the summary was computed for")]
    pub company: String,

    #[schemars(description = "Revenue of the earliest period, if reported")]
    pub first_revenue: Option<f64>,

    #[schemars(description = "Revenue of the latest period, if reported")]
    pub last_revenue: Option<f64>,

    #[schemars(description = "Net income of the earliest period, if reported")]
    pub first_net_income: Option<f64>,

    #[schemars(description = "Net income of the latest period, if reported")]
    pub last_net_income: Option<f64>,

    #[schemars(
        description = "Compound revenue growth rate between first and last period. 0.0 when either endpoint is missing or not strictly positive."
    )]
    pub cagr: f64,

    #[schemars(description = "Mean of per-period net margin, missing margins counted as 0.0")]
    pub avg_net_margin: f64,

    #[schemars(description = "Current ratio of the latest period, if reported")]
    pub latest_current_ratio: Option<f64>,

    #[schemars(description = "Number of compounding periods used for CAGR (at least 1)")]
    pub periods: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PercentileSet {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Relative position of a value against a [`PercentileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PercentileBucket {
    BelowP25,
    P25ToP50,
    P50ToP75,
    AboveP75,
}

impl fmt::Display for PercentileBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PercentileBucket::BelowP25 => "below P25",
            PercentileBucket::P25ToP50 => "P25–P50",
            PercentileBucket::P50ToP75 => "P50–P75",
            PercentileBucket::AboveP75 => "above P75",
        };
        f.write_str(label)
    }
}

impl PercentileSet {
    /// Nearest-rank cut points over `values` (any order).
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            p25: percentile(&sorted, 0.25),
            p50: percentile(&sorted, 0.5),
            p75: percentile(&sorted, 0.75),
        }
    }

    /// Upper bounds are inclusive, so a value equal to P75 lands in `P50ToP75`.
    pub fn bucket(&self, value: f64) -> PercentileBucket {
        if value <= self.p25 {
            PercentileBucket::BelowP25
        } else if value <= self.p50 {
            PercentileBucket::P25ToP50
        } else if value <= self.p75 {
            PercentileBucket::P50ToP75
        } else {
            PercentileBucket::AboveP75
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Percentiles {
    pub cagr: PercentileSet,
    pub margin: PercentileSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BenchmarkReport {
    pub per_company: Vec<CompanyBenchmark>,
    pub percentiles: Percentiles,
}

impl BenchmarkReport {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BenchmarkReport)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// Nearest-rank percentile over ascending `sorted` values: index
/// `floor(p * (n - 1))`, no interpolation. 0.0 for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (p * (sorted.len() - 1) as f64).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Compound growth from `first` to `last` over `periods`; 0.0 unless both
/// endpoints are present and strictly positive.
pub fn compound_growth(first: Option<f64>, last: Option<f64>, periods: usize) -> f64 {
    match (first, last) {
        (Some(first), Some(last)) if first > 0.0 && last > 0.0 => {
            (last / first).powf(1.0 / periods.max(1) as f64) - 1.0
        }
        _ => 0.0,
    }
}

/// Summarizes one company's records.
pub fn summarize_company(group: &CompanyGroup) -> CompanyBenchmark {
    let sorted = sort_by_year(&group.rows);
    let first = sorted.first();
    let last = sorted.last();
    let read = |record: Option<&Record>, field: CanonicalField| record.and_then(|r| r.number(field));

    let first_revenue = read(first, CanonicalField::Revenue);
    let last_revenue = read(last, CanonicalField::Revenue);
    let periods = sorted.len().saturating_sub(1).max(1);

    let avg_net_margin = if sorted.is_empty() {
        0.0
    } else {
        sorted
            .iter()
            .map(|r| r.number(CanonicalField::NetMargin).unwrap_or(0.0))
            .sum::<f64>()
            / sorted.len() as f64
    };

    CompanyBenchmark {
        company: group.company.clone(),
        first_revenue,
        last_revenue,
        first_net_income: read(first, CanonicalField::NetIncome),
        last_net_income: read(last, CanonicalField::NetIncome),
        cagr: compound_growth(first_revenue, last_revenue, periods),
        avg_net_margin,
        latest_current_ratio: read(last, CanonicalField::CurrentRatio),
        periods,
    }
}

/// Benchmarks every company in `rows` against the rest of the population.
pub fn compute_benchmarks(rows: &[Record]) -> BenchmarkReport {
    compute_benchmarks_with(rows, DEFAULT_COMPANY)
}

pub fn compute_benchmarks_with(rows: &[Record], default_company: &str) -> BenchmarkReport {
    let per_company: Vec<CompanyBenchmark> = group_by_company_with(rows, default_company)
        .iter()
        .map(summarize_company)
        .collect();

    let cagr_values: Vec<f64> = per_company.iter().map(|b| b.cagr).collect();
    let margin_values: Vec<f64> = per_company.iter().map(|b| b.avg_net_margin).collect();

    let percentiles = Percentiles {
        cagr: PercentileSet::from_values(&cagr_values),
        margin: PercentileSet::from_values(&margin_values),
    };

    debug!(
        "Benchmarked {} companies; CAGR cuts {:?}, margin cuts {:?}",
        per_company.len(),
        percentiles.cagr,
        percentiles.margin
    );

    BenchmarkReport {
        per_company,
        percentiles,
    }
}
