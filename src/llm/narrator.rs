use crate::error::Result;
use crate::llm::client::NarrationClient;
use crate::schema::{Record, DEFAULT_COMPANY};
use crate::summary::{split_ai_bullets, AiSummary};
use log::info;

/// Insight narration delegated to a text-generation service. Produces the
/// same shape as the deterministic narrators.
pub struct AiNarrator {
    client: NarrationClient,
    default_company: String,
}

impl AiNarrator {
    pub fn new(client: NarrationClient) -> Self {
        Self {
            client,
            default_company: DEFAULT_COMPANY.to_string(),
        }
    }

    pub fn with_default_company(mut self, default_company: impl Into<String>) -> Self {
        self.default_company = default_company.into();
        self
    }

    pub async fn narrate(&self, rows: &[Record]) -> Result<Vec<String>> {
        let summary = AiSummary::from_rows_with(rows, &self.default_company);
        let prompt = summary.prompt()?;

        info!(
            "Requesting AI insights for {} companies over {} years",
            summary.companies.len(),
            summary.years.len()
        );
        let text = self.client.complete(&prompt).await?;
        Ok(split_ai_bullets(&text))
    }
}
