//! External summarization boundary.
//!
//! [`SummarizationAdapter::attempt`] makes one bounded call to the configured
//! [`SummarizationProvider`] and reports the outcome explicitly;
//! [`SummarizationAdapter::classify`] substitutes the [`FallbackClassifier`]
//! whenever that attempt fails.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::classification::{ClassificationResult, Provenance};
use super::fallback::FallbackClassifier;
use super::flags::{RiskFlag, UnknownRiskFlag};
use crate::config::SummarizerConfig;

/// Summary and flags as validated from a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub summary: String,
    pub flags: BTreeSet<RiskFlag>,
}

/// Reasons an external summarization attempt did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("summarization provider is not configured")]
    Disabled,
    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summarization provider returned status {status}")]
    Status { status: u16 },
    #[error("summarization did not complete within {0:?}")]
    Timeout(Duration),
    #[error("summarization response envelope is malformed: {0}")]
    Envelope(String),
    #[error("summarization output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("summarization output is missing a summary")]
    MissingSummary,
    #[error(transparent)]
    UnknownFlag(#[from] UnknownRiskFlag),
}

/// Text-understanding service that turns a policy document into a summary and
/// risk flags.
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(&self, text: &str) -> Result<ProviderSummary, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    summary: Option<String>,
    flags: Vec<String>,
}

/// Validate the JSON text emitted by a provider.
///
/// Markdown code fences are tolerated; every flag must belong to the
/// [`RiskFlag`] vocabulary.
pub fn parse_summary_payload(output: &str) -> Result<ProviderSummary, ProviderError> {
    let raw: RawSummary = serde_json::from_str(strip_code_fence(output))?;

    let summary = raw
        .summary
        .map(|summary| summary.trim().to_string())
        .filter(|summary| !summary.is_empty())
        .ok_or(ProviderError::MissingSummary)?;

    let flags = raw
        .flags
        .iter()
        .map(|flag| flag.parse::<RiskFlag>())
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(ProviderSummary { summary, flags })
}

fn strip_code_fence(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Instructions sent ahead of the document text.
pub fn build_prompt(text: &str) -> String {
    let vocabulary = RiskFlag::all()
        .into_iter()
        .map(|flag| format!("   - {}: {}", flag.as_str(), flag.guidance()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a consent transparency assistant.\n\n\
         Tasks:\n\
         1. Explain the privacy policy in ONE simple sentence, using only facts stated in it.\n\
         2. Identify risks ONLY from this list:\n{vocabulary}\n\n\
         Return ONLY valid JSON:\n\
         {{\"summary\": \"...\", \"flags\": [\"FLAG1\", \"FLAG2\"]}}\n\n\
         Privacy Policy:\n{text}\n"
    )
}

/// Google Generative Language `generateContent` client.
#[derive(Debug, Clone)]
pub struct GenerativeLanguageProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GenerativeLanguageProvider {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &SummarizerConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Some(Self {
            client,
            endpoint,
            api_key,
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the first candidate's text out of a `generateContent` response.
pub fn extract_candidate_text(envelope: &Value) -> Result<&str, ProviderError> {
    envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Envelope("no candidate text".to_string()))
}

#[async_trait]
impl SummarizationProvider for GenerativeLanguageProvider {
    fn name(&self) -> &'static str {
        "generative-language"
    }

    async fn summarize(&self, text: &str) -> Result<ProviderSummary, ProviderError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(text) }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: Value = response.json().await?;
        parse_summary_payload(extract_candidate_text(&envelope)?)
    }
}

/// Bounded provider call with a deterministic fallback.
#[derive(Clone)]
pub struct SummarizationAdapter {
    provider: Option<Arc<dyn SummarizationProvider>>,
    fallback: FallbackClassifier,
    timeout: Duration,
}

impl SummarizationAdapter {
    pub fn new(provider: Arc<dyn SummarizationProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            fallback: FallbackClassifier::new(),
            timeout,
        }
    }

    /// Adapter that always classifies with the fallback rules.
    pub fn offline() -> Self {
        Self {
            provider: None,
            fallback: FallbackClassifier::new(),
            timeout: Duration::ZERO,
        }
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|provider| provider.name())
    }

    /// One attempt against the external provider.
    pub async fn attempt(&self, text: &str) -> Result<ClassificationResult, ProviderError> {
        let provider = self.provider.as_ref().ok_or(ProviderError::Disabled)?;

        let summary = tokio::time::timeout(self.timeout, provider.summarize(text))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        Ok(ClassificationResult {
            summary: summary.summary,
            flags: summary.flags,
            provenance: Provenance::Llm,
        })
    }

    pub async fn classify(&self, text: &str) -> ClassificationResult {
        match self.attempt(text).await {
            Ok(result) => result,
            Err(ProviderError::Disabled) => {
                debug!("summarization provider disabled; using fallback rules");
                self.fallback.classify(text)
            }
            Err(err) => {
                warn!(error = %err, "summarization failed; using fallback rules");
                self.fallback.classify(text)
            }
        }
    }
}

impl std::fmt::Debug for SummarizationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationAdapter")
            .field("provider", &self.provider_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
