use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::flags::RiskFlag;

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "LLM")]
    Llm,
    #[serde(rename = "FALLBACK")]
    Fallback,
}

impl Provenance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Llm => "LLM",
            Self::Fallback => "FALLBACK",
        }
    }
}

/// Summary and flags extracted from one policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub summary: String,
    pub flags: BTreeSet<RiskFlag>,
    pub provenance: Provenance,
}
