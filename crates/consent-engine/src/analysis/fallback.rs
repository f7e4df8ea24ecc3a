use std::collections::BTreeSet;

use super::classification::{ClassificationResult, Provenance};
use super::flags::RiskFlag;

pub const GENERIC_SUMMARY: &str =
    "This document explains rules, responsibilities, and procedures described in the provided text.";

/// Documents longer than this many characters are flagged as complex.
pub const COMPLEX_TEXT_THRESHOLD: usize = 1200;

struct PhraseRule {
    triggers: &'static [&'static str],
    flags: &'static [RiskFlag],
    sentence: Option<&'static str>,
}

// Evaluated in order; sentence order in the summary follows this table.
const PHRASE_RULES: &[PhraseRule] = &[
    PhraseRule {
        triggers: &["public sector", "government"],
        flags: &[],
        sentence: Some("This document is issued by a government or public sector organization."),
    },
    PhraseRule {
        triggers: &["employee", "officer"],
        flags: &[],
        sentence: Some("It sets out duties for the employees and officers who handle your data."),
    },
    PhraseRule {
        triggers: &["information", "records"],
        flags: &[],
        sentence: Some("It covers how personal information and records are collected and used."),
    },
    PhraseRule {
        triggers: &["retain", "stored", "as long as necessary"],
        flags: &[RiskFlag::LongTermRetention],
        sentence: Some("Your data may be stored for a long time, possibly after you stop using the service."),
    },
    PhraseRule {
        triggers: &["outsourc", "vendor", "third party"],
        flags: &[RiskFlag::OutsourcingRisk, RiskFlag::ThirdPartySharing],
        sentence: Some("Some processing may be handed to vendors or other third parties."),
    },
    PhraseRule {
        triggers: &["reserves the right", "errors and omissions"],
        flags: &[RiskFlag::LimitedLiability],
        sentence: Some("The organization limits its responsibility for mistakes and may change these terms."),
    },
    PhraseRule {
        triggers: &["marketing", "advertis"],
        flags: &[RiskFlag::Marketing],
        sentence: None,
    },
];

/// Deterministic lexical classifier used whenever the external summarizer is
/// unavailable. Total: every input, including the empty string, classifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackClassifier;

impl FallbackClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lower = text.to_lowercase();
        let mut sentences = Vec::new();
        let mut flags = BTreeSet::new();

        for rule in PHRASE_RULES {
            if !rule.triggers.iter().any(|phrase| lower.contains(phrase)) {
                continue;
            }
            flags.extend(rule.flags.iter().copied());
            if let Some(sentence) = rule.sentence {
                sentences.push(sentence);
            }
        }

        if !lower.contains("consent") {
            flags.insert(RiskFlag::ImplicitConsent);
        }

        if text.chars().count() > COMPLEX_TEXT_THRESHOLD {
            flags.insert(RiskFlag::ComplexLegalText);
        }

        let summary = if sentences.is_empty() {
            GENERIC_SUMMARY.to_string()
        } else {
            sentences.join(" ")
        };

        ClassificationResult {
            summary,
            flags,
            provenance: Provenance::Fallback,
        }
    }
}
