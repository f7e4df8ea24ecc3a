use serde::{Deserialize, Serialize};
use tracing::info;

use super::classification::Provenance;
use super::provider::SummarizationAdapter;
use super::scoring::{RiskScorer, RiskTier};

/// Inbound analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRequest {
    pub app_name: String,
    pub permissions: Vec<String>,
    pub policy_text: String,
}

/// Response combining the document classification and the risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentReport {
    pub app: String,
    pub plain_english_summary: String,
    pub risk_score: u32,
    pub risk_level: RiskTier,
    pub why_it_matters: Vec<String>,
    pub analysis_source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisRequestError {
    #[error("app_name must not be blank")]
    BlankAppName,
}

/// Composes the summarization adapter and the risk scorer.
#[derive(Debug, Clone)]
pub struct ConsentAnalyzer {
    adapter: SummarizationAdapter,
    scorer: RiskScorer,
}

impl ConsentAnalyzer {
    pub fn new(adapter: SummarizationAdapter, scorer: RiskScorer) -> Self {
        Self { adapter, scorer }
    }

    pub async fn analyze(
        &self,
        request: ConsentRequest,
    ) -> Result<ConsentReport, AnalysisRequestError> {
        let ConsentRequest {
            app_name,
            permissions,
            policy_text,
        } = request;

        if app_name.trim().is_empty() {
            return Err(AnalysisRequestError::BlankAppName);
        }

        let classification = self.adapter.classify(&policy_text).await;
        let score = self.scorer.score(&permissions, &classification.flags);

        info!(
            app = app_name.as_str(),
            permissions = permissions.len(),
            flags = classification.flags.len(),
            score = score.score,
            tier = score.tier.label(),
            source = classification.provenance.label(),
            "consent analysis complete"
        );

        Ok(ConsentReport {
            app: app_name,
            plain_english_summary: classification.summary,
            risk_score: score.score,
            risk_level: score.tier,
            why_it_matters: score.reasons.into_iter().collect(),
            analysis_source: classification.provenance,
        })
    }
}
