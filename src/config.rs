use crate::error::{AnalysisError, Result};
use crate::narrative::{BenchmarkNarrator, HeuristicNarrator};
use crate::schema::DEFAULT_COMPANY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the analysis pipeline. Defaults reproduce the standard
/// behaviour; every field may be omitted from a JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Company key for records that carry none.
    pub default_company: String,
    /// A current ratio strictly below this is reported as a liquidity risk.
    pub liquidity_threshold: f64,
    /// Current ratio assumed for periods that report none, for the liquidity check only.
    pub assumed_current_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_company: DEFAULT_COMPANY.to_string(),
            liquidity_threshold: 1.0,
            assumed_current_ratio: 1.5,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_company.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "default_company must not be empty".to_string(),
            ));
        }
        if !self.liquidity_threshold.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "liquidity_threshold must be finite, got {}",
                self.liquidity_threshold
            )));
        }
        if !self.assumed_current_ratio.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "assumed_current_ratio must be finite, got {}",
                self.assumed_current_ratio
            )));
        }
        Ok(())
    }

    pub fn heuristic_narrator(&self) -> HeuristicNarrator {
        HeuristicNarrator {
            liquidity_threshold: self.liquidity_threshold,
            assumed_current_ratio: self.assumed_current_ratio,
        }
    }

    pub fn benchmark_narrator(&self) -> BenchmarkNarrator {
        BenchmarkNarrator {
            default_company: self.default_company.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{ "liquidity_threshold": 1.2 }"#).unwrap();
        assert_eq!(config.liquidity_threshold, 1.2);
        assert_eq!(config.default_company, DEFAULT_COMPANY);
        assert_eq!(config.assumed_current_ratio, 1.5);
    }

    #[test]
    fn test_empty_company_rejected() {
        let result = AnalysisConfig::from_json_str(r#"{ "default_company": "  " }"#);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let result = AnalysisConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(AnalysisError::SerializationError(_))));
    }

    #[test]
    fn test_narrators_follow_config() {
        let config = AnalysisConfig {
            default_company: "Unknown".to_string(),
            liquidity_threshold: 0.8,
            assumed_current_ratio: 2.0,
        };
        assert_eq!(config.heuristic_narrator().liquidity_threshold, 0.8);
        assert_eq!(config.benchmark_narrator().default_company, "Unknown");
    }
}
