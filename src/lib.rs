//! # FinFlow
//!
//! A library for turning heterogeneous financial statement rows (decoded from
//! CSV files, spreadsheets or PDF text) into a canonical, ratio-enriched,
//! company-grouped dataset with cross-company benchmarks and narrative insights.
//!
//! ## Core Concepts
//!
//! - **Record**: One company-period observation, a mapping from column name to value
//! - **Canonical Fields**: A fixed vocabulary ("Revenue", "Net Income", ...) that free-form column labels are mapped onto
//! - **Absent vs Zero**: Missing or unparseable cells are `None`, never `0.0`; derivations needing them are skipped
//! - **Derived Ratios**: Gross/net margin, current/quick ratio, ROA and ROE, filled in only where absent
//! - **Benchmarks**: Per-company CAGR and average net margin, positioned against nearest-rank percentiles
//!
//! ## Example
//!
//! ```rust
//! use finflow::*;
//!
//! let raw: Vec<Record> = vec![
//!     [("Fiscal Year", FieldValue::from("FY2020")), ("Sales", FieldValue::Number(100.0)),
//!      ("COGS", FieldValue::Number(60.0)), ("Net Income", FieldValue::Number(10.0))]
//!         .into_iter()
//!         .collect(),
//!     [("Fiscal Year", FieldValue::Integer(2021)), ("Sales", FieldValue::Number(200.0)),
//!      ("COGS", FieldValue::Number(100.0)), ("Net Income", FieldValue::Number(10.0))]
//!         .into_iter()
//!         .collect(),
//! ];
//!
//! let report = analyze_statements(&raw, Some("Acme"));
//! assert_eq!(report.groups[0].company, "Acme");
//! assert_eq!(report.benchmarks.per_company[0].cagr, 1.0);
//! assert!(report.insights.contains(&"Revenue CAGR over period: 100.00%".to_string()));
//! ```

pub mod benchmark;
pub mod canonical;
pub mod coercion;
pub mod config;
pub mod error;
pub mod grouping;
pub mod ingestion;
pub mod narrative;
pub mod normalize;
pub mod ratios;
pub mod report;
pub mod schema;
pub mod summary;

#[cfg(feature = "openai")]
pub mod llm;

pub use benchmark::{
    compute_benchmarks, compute_benchmarks_with, percentile, BenchmarkReport, CompanyBenchmark,
    PercentileBucket, PercentileSet, Percentiles,
};
pub use canonical::{canonical_field, canonicalize};
pub use coercion::{coerce, coerce_year, parse_number};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use grouping::{group_by_company, group_by_company_with, sort_by_year};
pub use ingestion::*;
pub use narrative::{
    build_benchmark_narrative, format_pct, generate_heuristic_insights, BenchmarkNarrator,
    HeuristicNarrator, Narrator,
};
pub use normalize::{normalize_record, normalize_rows};
pub use ratios::derive_ratios;
pub use report::{company_series, render_bullets, summary_table, year_axis, CompanySeries};
pub use schema::*;
pub use summary::{select_insights, split_ai_bullets, AiSummary, CompanyMetric};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything the report layer consumes for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Normalized records, in input order.
    pub rows: Vec<Record>,
    pub groups: Vec<CompanyGroup>,
    pub benchmarks: BenchmarkReport,
    pub benchmark_narrative: Vec<String>,
    pub insights: Vec<String>,
}

pub struct StatementAnalyzer {
    config: AnalysisConfig,
}

impl StatementAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalizes raw rows and runs grouping, benchmarking and narration over them.
    pub fn analyze(&self, raw_rows: &[Record], company_hint: Option<&str>) -> AnalysisReport {
        info!("Analyzing {} raw row(s)", raw_rows.len());
        let rows = normalize_rows(raw_rows, company_hint);
        self.analyze_normalized(rows)
    }

    /// Analyzes files that were ingested (and therefore already normalized) separately.
    pub fn analyze_ingested(&self, files: &[IngestedFile]) -> AnalysisReport {
        let rows: Vec<Record> = files.iter().flat_map(|f| f.rows.iter().cloned()).collect();
        info!(
            "Analyzing {} row(s) from {} ingested file(s)",
            rows.len(),
            files.len()
        );
        self.analyze_normalized(rows)
    }

    fn analyze_normalized(&self, rows: Vec<Record>) -> AnalysisReport {
        let groups = group_by_company_with(&rows, &self.config.default_company);
        let benchmarks = compute_benchmarks_with(&rows, &self.config.default_company);
        let benchmark_narrative = self.config.benchmark_narrator().narrate(&rows);
        let insights = self.config.heuristic_narrator().narrate(&rows);

        debug!(
            "Analysis produced {} group(s), {} benchmark line(s), {} insight(s)",
            groups.len(),
            benchmark_narrative.len(),
            insights.len()
        );

        AnalysisReport {
            rows,
            groups,
            benchmarks,
            benchmark_narrative,
            insights,
        }
    }
}

impl Default for StatementAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

/// Analyzes `raw_rows` with the default configuration.
pub fn analyze_statements(raw_rows: &[Record], company_hint: Option<&str>) -> AnalysisReport {
    StatementAnalyzer::default().analyze(raw_rows, company_hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, FieldValue)]) -> Record {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_end_to_end_processing() {
        let rows = vec![
            raw(&[
                ("Company", "Acme".into()),
                ("Year", "FY2020".into()),
                ("Revenue", FieldValue::Number(100.0)),
                ("COGS", FieldValue::Number(60.0)),
                ("Net Income", FieldValue::Number(10.0)),
            ]),
            raw(&[
                ("Company", "Acme".into()),
                ("Year", FieldValue::Integer(2021)),
                ("Revenue", FieldValue::Number(200.0)),
                ("COGS", FieldValue::Number(100.0)),
                ("Net Income", FieldValue::Number(10.0)),
            ]),
        ];

        let report = analyze_statements(&rows, None);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.benchmarks.per_company[0].cagr, 1.0);
        assert_eq!(report.benchmark_narrative.len(), 3);
        assert!(report
            .insights
            .contains(&"Warning: Net margin declined in the period.".to_string()));
    }

    #[test]
    fn test_custom_default_company() {
        let config = AnalysisConfig {
            default_company: "Unattributed".to_string(),
            ..AnalysisConfig::default()
        };
        let analyzer = StatementAnalyzer::new(config).unwrap();
        let report = analyzer.analyze(&[raw(&[("Revenue", FieldValue::Number(5.0))])], None);

        assert_eq!(report.groups[0].company, "Unattributed");
        assert_eq!(report.benchmarks.per_company[0].company, "Unattributed");
        assert!(report.benchmark_narrative[1].starts_with("Unattributed:"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig {
            default_company: String::new(),
            ..AnalysisConfig::default()
        };
        assert!(StatementAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_analyze_ingested_concatenates_files() {
        let a = ingest_str("alpha", SourceFormat::Csv, "Year,Revenue\n2020,10\n2021,20\n").unwrap();
        let b = ingest_str("beta", SourceFormat::Csv, "Year,Revenue\n2020,5\n").unwrap();

        let report = StatementAnalyzer::default().analyze_ingested(&[a, b]);
        let names: Vec<&str> = report.groups.iter().map(|g| g.company.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(report.rows.len(), 3);
    }
}
