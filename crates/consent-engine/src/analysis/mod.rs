//! Policy classification and risk scoring.

pub mod classification;
pub mod fallback;
pub mod flags;
pub mod provider;
pub mod router;
pub mod rules;
pub mod scoring;
pub mod service;

pub use classification::{ClassificationResult, Provenance};
pub use fallback::FallbackClassifier;
pub use flags::{GovernanceRiskSet, RiskFlag, UnknownRiskFlag};
pub use provider::{
    GenerativeLanguageProvider, ProviderError, ProviderSummary, SummarizationAdapter,
    SummarizationProvider,
};
pub use router::analysis_router;
pub use rules::{RuleTable, RuleTableError};
pub use scoring::{RiskScorer, RiskTier, ScoreBreakdown, ScoreResult};
pub use service::{AnalysisRequestError, ConsentAnalyzer, ConsentReport, ConsentRequest};
