use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::flags::{GovernanceRiskSet, RiskFlag};
use super::rules::RuleTable;

/// Upper bound on the combined weight of governance flags.
pub const GOVERNANCE_CAP: u32 = 5;

/// Coarse classification of a numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Tier for a score. Without requested permissions the tier tops out at
    /// Medium.
    pub fn classify(score: u32, has_permissions: bool) -> Self {
        if !has_permissions {
            return if score > 3 { Self::Medium } else { Self::Low };
        }

        match score {
            0..=3 => Self::Low,
            4..=7 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// How the final score was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub governance_subtotal: u32,
    pub governance_contribution: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub score: u32,
    pub tier: RiskTier,
    /// Identifiers that contributed a nonzero weight.
    pub reasons: BTreeSet<String>,
    pub breakdown: ScoreBreakdown,
}

/// Stateless scorer combining requested permissions and extracted flags.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    rules: Arc<RuleTable>,
    governance: GovernanceRiskSet,
}

impl RiskScorer {
    pub fn new(rules: Arc<RuleTable>, governance: GovernanceRiskSet) -> Self {
        Self { rules, governance }
    }

    pub fn score<S: AsRef<str>>(
        &self,
        permissions: &[S],
        flags: &BTreeSet<RiskFlag>,
    ) -> ScoreResult {
        let mut base: u32 = 0;
        let mut governance_subtotal: u32 = 0;
        let mut reasons = BTreeSet::new();

        for permission in permissions {
            let permission = permission.as_ref();
            match self.rules.weight(permission) {
                Some(weight) => {
                    base = base.saturating_add(weight);
                    if weight > 0 {
                        reasons.insert(permission.to_string());
                    }
                }
                None => debug!(permission, "permission has no risk weight"),
            }
        }

        for flag in flags {
            let Some(weight) = self.rules.weight(flag.as_str()) else {
                debug!(flag = flag.as_str(), "risk flag has no risk weight");
                continue;
            };

            if self.governance.contains(*flag) {
                governance_subtotal = governance_subtotal.saturating_add(weight);
            } else {
                base = base.saturating_add(weight);
            }
            if weight > 0 {
                reasons.insert(flag.as_str().to_string());
            }
        }

        let governance_contribution = governance_subtotal.min(GOVERNANCE_CAP);
        let score = base.saturating_add(governance_contribution);
        let tier = RiskTier::classify(score, !permissions.is_empty());

        ScoreResult {
            score,
            tier,
            reasons,
            breakdown: ScoreBreakdown {
                base,
                governance_subtotal,
                governance_contribution,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer(weights: &[(&str, u32)]) -> RiskScorer {
        let table = RuleTable::from_weights(weights.iter().map(|(key, weight)| (*key, *weight)));
        RiskScorer::new(Arc::new(table), GovernanceRiskSet::standard())
    }

    fn standard_scorer() -> RiskScorer {
        scorer(&[
            ("LOCATION", 3),
            ("CAMERA", 2),
            ("CONTACTS", 2),
            ("STORAGE", 1),
            ("CALENDAR", 0),
            ("THIRD_PARTY_SHARING", 3),
            ("MARKETING", 1),
            ("LONG_TERM_RETENTION", 3),
            ("IMPLICIT_CONSENT", 2),
            ("OUTSOURCING_RISK", 2),
            ("LIMITED_LIABILITY", 1),
            ("COMPLEX_LEGAL_TEXT", 1),
        ])
    }

    fn no_flags() -> BTreeSet<RiskFlag> {
        BTreeSet::new()
    }

    #[test]
    fn tier_boundaries_with_permissions() {
        assert_eq!(RiskTier::classify(0, true), RiskTier::Low);
        assert_eq!(RiskTier::classify(3, true), RiskTier::Low);
        assert_eq!(RiskTier::classify(4, true), RiskTier::Medium);
        assert_eq!(RiskTier::classify(7, true), RiskTier::Medium);
        assert_eq!(RiskTier::classify(8, true), RiskTier::High);
    }

    #[test]
    fn empty_permissions_never_reach_high() {
        assert_eq!(RiskTier::classify(3, false), RiskTier::Low);
        assert_eq!(RiskTier::classify(4, false), RiskTier::Medium);
        assert_eq!(RiskTier::classify(40, false), RiskTier::Medium);
        assert_eq!(RiskTier::classify(u32::MAX, false), RiskTier::Medium);
    }

    #[test]
    fn duplicate_permissions_count_each_time() {
        let result = standard_scorer().score(&["LOCATION", "LOCATION", "STORAGE"], &no_flags());

        assert_eq!(result.score, 7);
        assert_eq!(result.tier, RiskTier::Medium);
        assert_eq!(
            result.reasons,
            BTreeSet::from(["LOCATION".to_string(), "STORAGE".to_string()])
        );
    }

    #[test]
    fn unknown_permission_contributes_nothing() {
        let result = standard_scorer().score(&["CAMERA_XYZ"], &no_flags());

        assert_eq!(result.score, 0);
        assert_eq!(result.tier, RiskTier::Low);
        assert!(!result.reasons.contains("CAMERA_XYZ"));
    }

    #[test]
    fn zero_weight_entries_are_not_reasons() {
        let result = standard_scorer().score(&["CALENDAR"], &no_flags());

        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn governance_flags_are_capped() {
        let flags = BTreeSet::from([
            RiskFlag::LongTermRetention,
            RiskFlag::ImplicitConsent,
            RiskFlag::OutsourcingRisk,
            RiskFlag::LimitedLiability,
        ]);

        let result = standard_scorer().score(&["CAMERA"], &flags);

        assert_eq!(result.breakdown.governance_subtotal, 8);
        assert_eq!(result.breakdown.governance_contribution, GOVERNANCE_CAP);
        assert_eq!(result.score, 2 + GOVERNANCE_CAP);
        assert_eq!(result.reasons.len(), 5);
    }

    #[test]
    fn data_handling_flags_bypass_the_cap() {
        let flags = BTreeSet::from([
            RiskFlag::ThirdPartySharing,
            RiskFlag::Marketing,
            RiskFlag::LongTermRetention,
            RiskFlag::ImplicitConsent,
            RiskFlag::ComplexLegalText,
        ]);

        let result = standard_scorer().score(&["LOCATION"], &flags);

        assert_eq!(result.breakdown.base, 3 + 3 + 1);
        assert_eq!(result.breakdown.governance_contribution, 5);
        assert_eq!(result.score, 12);
        assert_eq!(result.tier, RiskTier::High);
    }

    #[test]
    fn retention_without_consent_scores_medium_without_permissions() {
        let scorer = scorer(&[("LONG_TERM_RETENTION", 3), ("IMPLICIT_CONSENT", 2)]);
        let flags = BTreeSet::from([RiskFlag::LongTermRetention, RiskFlag::ImplicitConsent]);
        let permissions: [&str; 0] = [];

        let result = scorer.score(&permissions, &flags);

        assert_eq!(result.score, 5);
        assert_eq!(result.tier, RiskTier::Medium);
        assert_eq!(
            result.reasons,
            BTreeSet::from([
                "LONG_TERM_RETENTION".to_string(),
                "IMPLICIT_CONSENT".to_string()
            ])
        );
    }

    #[test]
    fn adding_weighted_inputs_never_lowers_the_score() {
        let scorer = standard_scorer();
        let mut permissions: Vec<&str> = Vec::new();
        let mut flags = BTreeSet::new();
        let mut previous = scorer.score(&permissions, &flags).score;

        for permission in ["LOCATION", "CONTACTS", "CAMERA", "LOCATION"] {
            permissions.push(permission);
            let current = scorer.score(&permissions, &flags).score;
            assert!(current >= previous);
            previous = current;
        }

        for flag in RiskFlag::all() {
            flags.insert(flag);
            let current = scorer.score(&permissions, &flags).score;
            assert!(current >= previous);
            previous = current;
        }
    }
}
