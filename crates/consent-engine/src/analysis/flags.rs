use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed vocabulary of concerns a policy document can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    ThirdPartySharing,
    Marketing,
    LongTermRetention,
    ImplicitConsent,
    OutsourcingRisk,
    LimitedLiability,
    ComplexLegalText,
}

impl RiskFlag {
    pub const fn all() -> [Self; 7] {
        [
            Self::ThirdPartySharing,
            Self::Marketing,
            Self::LongTermRetention,
            Self::ImplicitConsent,
            Self::OutsourcingRisk,
            Self::LimitedLiability,
            Self::ComplexLegalText,
        ]
    }

    /// Rule table key and wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThirdPartySharing => "THIRD_PARTY_SHARING",
            Self::Marketing => "MARKETING",
            Self::LongTermRetention => "LONG_TERM_RETENTION",
            Self::ImplicitConsent => "IMPLICIT_CONSENT",
            Self::OutsourcingRisk => "OUTSOURCING_RISK",
            Self::LimitedLiability => "LIMITED_LIABILITY",
            Self::ComplexLegalText => "COMPLEX_LEGAL_TEXT",
        }
    }

    /// One-line guidance used when prompting the external summarizer.
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::ThirdPartySharing => "data shared with partners, vendors, insurers, or other third parties",
            Self::Marketing => "promotions, offers, advertising, or marketing communication",
            Self::LongTermRetention => {
                "data kept \"as long as necessary\", for legal/business reasons, or after termination"
            }
            Self::ImplicitConsent => "no explicit request for the reader's consent",
            Self::OutsourcingRisk => "processing or services outsourced to external vendors",
            Self::LimitedLiability => {
                "the organization limits liability or reserves the right to change terms"
            }
            Self::ComplexLegalText => "long or dense legal language that is hard to follow",
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized risk flag '{0}'")]
pub struct UnknownRiskFlag(pub String);

impl FromStr for RiskFlag {
    type Err = UnknownRiskFlag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|flag| flag.as_str() == value.trim())
            .ok_or_else(|| UnknownRiskFlag(value.to_string()))
    }
}

/// Flags whose combined weight is capped during scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceRiskSet {
    members: BTreeSet<RiskFlag>,
}

impl GovernanceRiskSet {
    /// Legal-text concerns that compound rather than stack; third-party sharing
    /// and marketing stay outside the cap.
    pub fn standard() -> Self {
        Self::from_flags([
            RiskFlag::LongTermRetention,
            RiskFlag::ImplicitConsent,
            RiskFlag::OutsourcingRisk,
            RiskFlag::LimitedLiability,
            RiskFlag::ComplexLegalText,
        ])
    }

    pub fn from_flags(flags: impl IntoIterator<Item = RiskFlag>) -> Self {
        Self {
            members: flags.into_iter().collect(),
        }
    }

    pub fn contains(&self, flag: RiskFlag) -> bool {
        self.members.contains(&flag)
    }
}

impl Default for GovernanceRiskSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_name() {
        for flag in RiskFlag::all() {
            assert_eq!(flag.as_str().parse::<RiskFlag>(), Ok(flag));
        }
        assert!("third_party_sharing".parse::<RiskFlag>().is_err());
        assert!("DATA_BROKERING".parse::<RiskFlag>().is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&RiskFlag::LongTermRetention).expect("serialize");
        assert_eq!(json, "\"LONG_TERM_RETENTION\"");
    }

    #[test]
    fn standard_governance_set_excludes_data_handling_flags() {
        let governance = GovernanceRiskSet::standard();
        assert!(governance.contains(RiskFlag::LongTermRetention));
        assert!(governance.contains(RiskFlag::ImplicitConsent));
        assert!(!governance.contains(RiskFlag::ThirdPartySharing));
        assert!(!governance.contains(RiskFlag::Marketing));
    }
}
