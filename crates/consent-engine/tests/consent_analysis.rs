//! End-to-end behavior of the consent analysis pipeline through the public
//! crate surface, using the rule table shipped with the repository.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use consent_engine::analysis::{
        ConsentAnalyzer, GovernanceRiskSet, RiskScorer, RuleTable, SummarizationAdapter,
    };

    pub(super) fn shipped_rules() -> Arc<RuleTable> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../risk_rules.json");
        Arc::new(RuleTable::from_path(path).expect("shipped rule table loads"))
    }

    pub(super) fn scorer() -> RiskScorer {
        RiskScorer::new(shipped_rules(), GovernanceRiskSet::standard())
    }

    pub(super) fn offline_analyzer() -> ConsentAnalyzer {
        ConsentAnalyzer::new(SummarizationAdapter::offline(), scorer())
    }

    pub(super) const MUNICIPAL_POLICY: &str = "The City is a public sector body. Employees and \
        officers may access records containing personal information. Records are stored as long \
        as necessary and some services are outsourced to a vendor. The City reserves the right \
        to amend this notice and accepts no liability for errors and omissions.";
}

mod shipped_rules {
    use super::common::*;
    use consent_engine::analysis::RiskFlag;

    #[test]
    fn every_risk_flag_has_a_weight() {
        let rules = shipped_rules();
        for flag in RiskFlag::all() {
            assert!(
                rules.weight(flag.as_str()).is_some(),
                "{flag} missing from risk_rules.json"
            );
        }
    }
}

mod pipeline {
    use super::common::*;
    use consent_engine::analysis::{
        ConsentRequest, FallbackClassifier, Provenance, RiskFlag, RiskTier,
    };

    fn request(permissions: &[&str], policy_text: &str) -> ConsentRequest {
        ConsentRequest {
            app_name: "City Services".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            policy_text: policy_text.to_string(),
        }
    }

    #[test]
    fn municipal_policy_raises_governance_and_sharing_flags() {
        let result = FallbackClassifier::new().classify(MUNICIPAL_POLICY);

        for expected in [
            RiskFlag::LongTermRetention,
            RiskFlag::OutsourcingRisk,
            RiskFlag::ThirdPartySharing,
            RiskFlag::LimitedLiability,
            RiskFlag::ImplicitConsent,
        ] {
            assert!(result.flags.contains(&expected), "{expected} expected");
        }
        assert!(!result.flags.contains(&RiskFlag::Marketing));
        assert!(!result.flags.contains(&RiskFlag::ComplexLegalText));
    }

    #[tokio::test]
    async fn municipal_policy_with_location_is_high() {
        let report = offline_analyzer()
            .analyze(request(&["LOCATION"], MUNICIPAL_POLICY))
            .await
            .expect("analysis succeeds");

        // LOCATION 3 + THIRD_PARTY_SHARING 3 + governance capped at 5.
        assert_eq!(report.risk_score, 11);
        assert_eq!(report.risk_level, RiskTier::High);
        assert_eq!(report.analysis_source, Provenance::Fallback);
        assert!(report.why_it_matters.contains(&"LOCATION".to_string()));
        assert!(report
            .why_it_matters
            .contains(&"LIMITED_LIABILITY".to_string()));
    }

    #[tokio::test]
    async fn same_policy_without_permissions_stays_medium() {
        let report = offline_analyzer()
            .analyze(request(&[], MUNICIPAL_POLICY))
            .await
            .expect("analysis succeeds");

        assert_eq!(report.risk_score, 8);
        assert_eq!(report.risk_level, RiskTier::Medium);
    }

    #[tokio::test]
    async fn consented_plain_policy_is_low() {
        let report = offline_analyzer()
            .analyze(request(
                &["STORAGE"],
                "Photos you choose are saved on your device with your consent.",
            ))
            .await
            .expect("analysis succeeds");

        assert_eq!(report.risk_score, 1);
        assert_eq!(report.risk_level, RiskTier::Low);
        assert_eq!(report.why_it_matters, vec!["STORAGE".to_string()]);
    }
}
