use crate::infra::{build_adapter, build_analyzer, load_rule_table};
use clap::Args;
use consent_engine::analysis::{ConsentReport, ConsentRequest, SummarizationAdapter};
use consent_engine::config::AppConfig;
use consent_engine::error::AppError;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to the policy or consent document (plain text)
    #[arg(long)]
    pub(crate) policy: PathBuf,
    /// Requested permission identifier; repeat for several
    #[arg(long = "permission")]
    pub(crate) permissions: Vec<String>,
    /// Application name shown in the report
    #[arg(long, default_value = "Local Policy")]
    pub(crate) app_name: String,
    /// Override the risk rules file (RISK_RULES_PATH)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Skip the external summarizer even when one is configured
    #[arg(long)]
    pub(crate) offline: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        policy,
        permissions,
        app_name,
        rules,
        offline,
        json,
    } = args;

    let config = AppConfig::load()?;
    let rules = load_rule_table(&rules.unwrap_or(config.rules.path))?;
    let adapter = if offline {
        SummarizationAdapter::offline()
    } else {
        build_adapter(&config.summarizer)?
    };
    let analyzer = build_analyzer(adapter, rules);

    let policy_text = fs::read_to_string(&policy)?;
    let report = analyzer
        .analyze(ConsentRequest {
            app_name,
            permissions,
            policy_text,
        })
        .await?;

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

fn render_report(report: &ConsentReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Consent report: {}\n", report.app));
    out.push_str(&format!(
        "Risk: {} (score {})\n",
        report.risk_level.label(),
        report.risk_score
    ));
    out.push_str(&format!("Source: {}\n", report.analysis_source.label()));
    out.push_str(&format!("\nSummary\n{}\n", report.plain_english_summary));

    if report.why_it_matters.is_empty() {
        out.push_str("\nWhy it matters: nothing in the rule table applied\n");
    } else {
        out.push_str("\nWhy it matters\n");
        for reason in &report.why_it_matters {
            out.push_str(&format!("- {reason}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_engine::analysis::{Provenance, RiskTier};

    fn report(reasons: &[&str]) -> ConsentReport {
        ConsentReport {
            app: "Weather".to_string(),
            plain_english_summary: "Your data may be stored for a long time.".to_string(),
            risk_score: 6,
            risk_level: RiskTier::Medium,
            why_it_matters: reasons.iter().map(|r| r.to_string()).collect(),
            analysis_source: Provenance::Fallback,
        }
    }

    #[test]
    fn render_lists_reasons() {
        let text = render_report(&report(&["LOCATION", "LONG_TERM_RETENTION"]));

        assert!(text.contains("Risk: Medium (score 6)"));
        assert!(text.contains("Source: FALLBACK"));
        assert!(text.contains("- LOCATION\n"));
        assert!(text.contains("- LONG_TERM_RETENTION\n"));
    }

    #[test]
    fn render_notes_when_nothing_applied() {
        let text = render_report(&report(&[]));
        assert!(text.contains("nothing in the rule table applied"));
    }
}
