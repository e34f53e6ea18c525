use crate::benchmark::{compute_benchmarks_with, PercentileSet};
use crate::grouping::sort_by_year;
use crate::schema::{CanonicalField, Record, DEFAULT_COMPANY};

pub const NO_ANOMALIES: &str = "No major anomalies detected; stable performance.";
pub const MARGIN_DECLINE_WARNING: &str = "Warning: Net margin declined in the period.";
pub const LIQUIDITY_WARNING: &str =
    "Liquidity risk: Current ratio fell below 1.0 in at least one period.";

/// Produces an ordered list of insight strings, the same shape externally
/// generated bullets take in [`crate::summary::select_insights`].
pub trait Narrator {
    fn narrate(&self, rows: &[Record]) -> Vec<String>;
}

/// Formats a ratio as a percentage with two decimals, e.g. `0.075` is `"7.50%"`.
pub fn format_pct(value: f64) -> String {
    // `+ 0.0` folds negative zero so it prints as "0.00%".
    format!("{:.2}%", value * 100.0 + 0.0)
}

/// Trend checks over the whole dataset taken as one chronological series.
#[derive(Debug, Clone)]
pub struct HeuristicNarrator {
    /// A current ratio strictly below this triggers the liquidity warning.
    pub liquidity_threshold: f64,
    /// Stand-in current ratio for periods that report none.
    pub assumed_current_ratio: f64,
}

impl Default for HeuristicNarrator {
    fn default() -> Self {
        Self {
            liquidity_threshold: 1.0,
            assumed_current_ratio: 1.5,
        }
    }
}

impl Narrator for HeuristicNarrator {
    fn narrate(&self, rows: &[Record]) -> Vec<String> {
        let sorted = sort_by_year(rows);
        let mut insights = Vec::new();

        if let (Some(first), Some(last)) = (sorted.first(), sorted.last()) {
            if sorted.len() >= 2 {
                let read = |r: &Record, f| r.number(f).unwrap_or(0.0);

                let r0 = read(first, CanonicalField::Revenue);
                let rn = read(last, CanonicalField::Revenue);
                if r0 != 0.0 && rn != 0.0 {
                    let cagr = (rn / r0).powf(1.0 / (sorted.len() - 1) as f64) - 1.0;
                    // Opposite-signed endpoints have no real growth rate.
                    if cagr.is_finite() {
                        insights.push(format!("Revenue CAGR over period: {}", format_pct(cagr)));
                    }
                }

                let n0 = read(first, CanonicalField::NetIncome);
                let nn = read(last, CanonicalField::NetIncome);
                // A zero or unreported final figure has no meaningful change.
                if nn != 0.0 {
                    let denominator = if n0 == 0.0 { 1.0 } else { n0.abs() };
                    let change = (nn - n0) / denominator;
                    insights.push(format!("Net Income change: {}", format_pct(change)));
                }
            }
        }

        let margin = |r: &Record| r.number(CanonicalField::NetMargin).unwrap_or(0.0);
        if sorted.windows(2).any(|w| margin(&w[1]) < margin(&w[0])) {
            insights.push(MARGIN_DECLINE_WARNING.to_string());
        }

        let liquidity_low = sorted.iter().any(|r| {
            r.number(CanonicalField::CurrentRatio)
                .unwrap_or(self.assumed_current_ratio)
                < self.liquidity_threshold
        });
        if liquidity_low {
            insights.push(LIQUIDITY_WARNING.to_string());
        }

        if insights.is_empty() {
            insights.push(NO_ANOMALIES.to_string());
        }
        insights
    }
}

/// One line per company positioning its CAGR and average net margin within
/// the population, plus the population medians.
#[derive(Debug, Clone)]
pub struct BenchmarkNarrator {
    pub default_company: String,
}

impl Default for BenchmarkNarrator {
    fn default() -> Self {
        Self {
            default_company: DEFAULT_COMPANY.to_string(),
        }
    }
}

impl Narrator for BenchmarkNarrator {
    fn narrate(&self, rows: &[Record]) -> Vec<String> {
        let report = compute_benchmarks_with(rows, &self.default_company);
        let cagr_cuts: &PercentileSet = &report.percentiles.cagr;
        let margin_cuts: &PercentileSet = &report.percentiles.margin;

        let mut lines = Vec::with_capacity(report.per_company.len() + 2);
        lines.push(format!(
            "Benchmarking across {} companies:",
            report.per_company.len()
        ));
        for b in &report.per_company {
            lines.push(format!(
                "{}: CAGR {} ({}), Avg Net Margin {} ({})",
                b.company,
                format_pct(b.cagr),
                cagr_cuts.bucket(b.cagr),
                format_pct(b.avg_net_margin),
                margin_cuts.bucket(b.avg_net_margin)
            ));
        }
        lines.push(format!(
            "Overall medians — CAGR {}, Net Margin {}.",
            format_pct(cagr_cuts.p50),
            format_pct(margin_cuts.p50)
        ));
        lines
    }
}

/// Heuristic insights with the default thresholds.
pub fn generate_heuristic_insights(rows: &[Record]) -> Vec<String> {
    HeuristicNarrator::default().narrate(rows)
}

/// Benchmark narrative with the default company fallback.
pub fn build_benchmark_narrative(rows: &[Record]) -> Vec<String> {
    BenchmarkNarrator::default().narrate(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;

    fn row(pairs: &[(&str, f64)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (*k, FieldValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(1.0), "100.00%");
        assert_eq!(format_pct(0.075), "7.50%");
        assert_eq!(format_pct(-0.0), "0.00%");
        assert_eq!(format_pct(-0.1234), "-12.34%");
    }

    #[test]
    fn test_empty_rows_report_no_anomalies() {
        assert_eq!(generate_heuristic_insights(&[]), vec![NO_ANOMALIES.to_string()]);
    }

    #[test]
    fn test_single_row_has_no_trend_lines() {
        let insights = generate_heuristic_insights(&[row(&[("Year", 2020.0), ("Revenue", 10.0)])]);
        assert_eq!(insights, vec![NO_ANOMALIES.to_string()]);
    }

    #[test]
    fn test_growth_lines() {
        let rows = vec![
            row(&[("Year", 2022.0), ("Revenue", 121.0), ("Net Income", 15.0)]),
            row(&[("Year", 2020.0), ("Revenue", 100.0), ("Net Income", 10.0)]),
            row(&[("Year", 2021.0), ("Revenue", 110.0), ("Net Income", 12.0)]),
        ];
        let insights = generate_heuristic_insights(&rows);
        assert_eq!(
            insights,
            vec![
                "Revenue CAGR over period: 10.00%".to_string(),
                "Net Income change: 50.00%".to_string(),
            ]
        );
    }

    #[test]
    fn test_net_income_change_uses_absolute_first() {
        let rows = vec![
            row(&[("Year", 2020.0), ("Net Income", -20.0)]),
            row(&[("Year", 2021.0), ("Net Income", 10.0)]),
        ];
        let insights = generate_heuristic_insights(&rows);
        assert_eq!(insights, vec!["Net Income change: 150.00%".to_string()]);
    }

    #[test]
    fn test_zero_final_net_income_is_not_reported() {
        let rows = vec![
            row(&[("Year", 2020.0), ("Net Income", 10.0)]),
            row(&[("Year", 2021.0), ("Net Income", 0.0)]),
        ];
        let insights = generate_heuristic_insights(&rows);
        assert_eq!(insights, vec![NO_ANOMALIES.to_string()]);

        let unreported = vec![
            row(&[("Year", 2020.0), ("Net Income", 10.0)]),
            row(&[("Year", 2021.0)]),
        ];
        assert_eq!(generate_heuristic_insights(&unreported), vec![NO_ANOMALIES.to_string()]);
    }

    #[test]
    fn test_missing_first_net_income_divides_by_one() {
        let rows = vec![
            row(&[("Year", 2020.0)]),
            row(&[("Year", 2021.0), ("Net Income", 0.25)]),
        ];
        let insights = generate_heuristic_insights(&rows);
        assert_eq!(insights, vec!["Net Income change: 25.00%".to_string()]);
    }

    #[test]
    fn test_margin_decline_warning() {
        let rows = vec![
            row(&[("Year", 2020.0), ("Net Margin", 0.1)]),
            row(&[("Year", 2021.0), ("Net Margin", 0.12)]),
            row(&[("Year", 2022.0), ("Net Margin", 0.11)]),
        ];
        assert!(generate_heuristic_insights(&rows).contains(&MARGIN_DECLINE_WARNING.to_string()));
    }

    #[test]
    fn test_liquidity_warning_and_absent_default() {
        let risky = vec![row(&[("Current Ratio", 0.5)])];
        assert_eq!(generate_heuristic_insights(&risky), vec![LIQUIDITY_WARNING.to_string()]);

        let unreported = vec![row(&[("Revenue", 1.0)])];
        assert_eq!(generate_heuristic_insights(&unreported), vec![NO_ANOMALIES.to_string()]);

        let strict = HeuristicNarrator {
            liquidity_threshold: 2.0,
            ..HeuristicNarrator::default()
        };
        assert_eq!(strict.narrate(&unreported), vec![LIQUIDITY_WARNING.to_string()]);
    }

    #[test]
    fn test_benchmark_lines() {
        let mut rows = Vec::new();
        for (company, r0, r1, margin) in [
            ("Alpha", 100.0, 110.0, 0.10),
            ("Beta", 100.0, 120.0, 0.20),
            ("Gamma", 100.0, 130.0, 0.30),
            ("Delta", 100.0, 140.0, 0.40),
        ] {
            for (year, revenue) in [(2020.0, r0), (2021.0, r1)] {
                let mut r = row(&[("Year", year), ("Revenue", revenue), ("Net Margin", margin)]);
                r.insert("Company", company);
                rows.push(r);
            }
        }

        let lines = build_benchmark_narrative(&rows);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Benchmarking across 4 companies:");
        assert_eq!(
            lines[1],
            "Alpha: CAGR 10.00% (below P25), Avg Net Margin 10.00% (below P25)"
        );
        assert_eq!(
            lines[2],
            "Beta: CAGR 20.00% (P25–P50), Avg Net Margin 20.00% (P25–P50)"
        );
        assert_eq!(
            lines[3],
            "Gamma: CAGR 30.00% (P50–P75), Avg Net Margin 30.00% (P50–P75)"
        );
        assert_eq!(
            lines[4],
            "Delta: CAGR 40.00% (above P75), Avg Net Margin 40.00% (above P75)"
        );
        assert_eq!(lines[5], "Overall medians — CAGR 20.00%, Net Margin 20.00%.");
    }

    #[test]
    fn test_benchmark_without_rows() {
        let lines = build_benchmark_narrative(&[]);
        assert_eq!(
            lines,
            vec![
                "Benchmarking across 0 companies:".to_string(),
                "Overall medians — CAGR 0.00%, Net Margin 0.00%.".to_string(),
            ]
        );
    }
}
