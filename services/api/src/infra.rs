use consent_engine::analysis::{
    ConsentAnalyzer, GenerativeLanguageProvider, GovernanceRiskSet, RiskScorer, RuleTable,
    SummarizationAdapter,
};
use consent_engine::config::SummarizerConfig;
use consent_engine::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the rule table; any failure here aborts startup.
pub(crate) fn load_rule_table(path: &Path) -> Result<Arc<RuleTable>, AppError> {
    let rules = RuleTable::from_path(path)?;
    info!(path = %path.display(), entries = rules.len(), "risk rules loaded");
    Ok(Arc::new(rules))
}

pub(crate) fn build_adapter(config: &SummarizerConfig) -> Result<SummarizationAdapter, AppError> {
    match GenerativeLanguageProvider::from_config(config)? {
        Some(provider) => {
            info!(model = %config.model, timeout = ?config.timeout, "external summarizer enabled");
            Ok(SummarizationAdapter::new(Arc::new(provider), config.timeout))
        }
        None => {
            warn!("SUMMARIZER_API_KEY not set; every request uses the fallback classifier");
            Ok(SummarizationAdapter::offline())
        }
    }
}

pub(crate) fn build_analyzer(
    adapter: SummarizationAdapter,
    rules: Arc<RuleTable>,
) -> ConsentAnalyzer {
    ConsentAnalyzer::new(adapter, RiskScorer::new(rules, GovernanceRiskSet::standard()))
}
