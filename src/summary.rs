use crate::grouping::group_by_company_with;
use crate::narrative::generate_heuristic_insights;
use crate::report::{company_series, year_axis};
use crate::schema::{Record, DEFAULT_COMPANY};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NARRATION_SYSTEM_PROMPT: &str = "You are a financial analyst. Write concise, bullet-style insights with specific metrics and cautions. Avoid hedging.";

const PROMPT_PREAMBLE: &str = "Create bullet-point insights for a board-ready deck. Use specific numbers and compare companies where relevant. Data summary: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetric {
    pub company: String,
    #[schemars(description = "Revenue in the last year of the shared year axis (0 when unreported)")]
    pub last_revenue: Option<f64>,
    #[schemars(description = "Net income in the last year of the shared year axis (0 when unreported)")]
    pub last_net_income: Option<f64>,
    #[schemars(description = "Mean net margin in percent across the year axis, rounded to two decimals")]
    pub avg_net_margin_pct: f64,
}

/// The dataset digest sent to an external text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AiSummary {
    pub companies: Vec<String>,
    pub years: Vec<i64>,
    pub metrics: Vec<CompanyMetric>,
}

impl AiSummary {
    pub fn from_rows(rows: &[Record]) -> Self {
        Self::from_rows_with(rows, DEFAULT_COMPANY)
    }

    /// Like [`AiSummary::from_rows`], attributing unnamed records to `default_company`.
    pub fn from_rows_with(rows: &[Record], default_company: &str) -> Self {
        let groups = group_by_company_with(rows, default_company);
        let years = year_axis(rows);
        let metrics = company_series(&groups, &years)
            .into_iter()
            .map(|s| {
                let mean = s.net_margin_pct.iter().sum::<f64>() / s.net_margin_pct.len().max(1) as f64;
                CompanyMetric {
                    company: s.name,
                    last_revenue: s.revenue.last().copied(),
                    last_net_income: s.net_income.last().copied(),
                    avg_net_margin_pct: (mean * 100.0).round() / 100.0,
                }
            })
            .collect();

        Self {
            companies: groups.into_iter().map(|g| g.company).collect(),
            years,
            metrics,
        }
    }

    pub fn prompt(&self) -> serde_json::Result<String> {
        Ok(format!("{}{}", PROMPT_PREAMBLE, serde_json::to_string(self)?))
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AiSummary)
    }
}

/// Splits generated text on newlines and bullet glyphs into trimmed, non-empty insights.
pub fn split_ai_bullets(text: &str) -> Vec<String> {
    text.split(['\n', '•'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Externally generated insights when available, otherwise the heuristic ones.
pub fn select_insights(ai_insights: Option<Vec<String>>, rows: &[Record]) -> Vec<String> {
    ai_insights.unwrap_or_else(|| generate_heuristic_insights(rows))
}
