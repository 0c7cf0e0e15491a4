//! PRD-level verdict joining the ambiguity report and per-feature scores.

use crate::ambiguity::{AmbiguityAnalyzer, AmbiguityReport};
use crate::prd::Prd;
use crate::score::{QualityScore, ReadinessScorer, READY_THRESHOLD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub prd_id: Uuid,
    pub prd_title: String,
    pub feature_count: usize,
    pub ambiguity_report: AmbiguityReport,
    pub quality_scores: Vec<QualityScore>,
    /// Mean feature score rounded to two decimals, 0 with no features.
    pub overall_readiness: f64,
    pub estimated_implementation_days: f64,
}

impl AnalysisSummary {
    pub fn build(
        prd: &Prd,
        ambiguity_report: AmbiguityReport,
        quality_scores: Vec<QualityScore>,
    ) -> Self {
        let overall_readiness = if quality_scores.is_empty() {
            0.0
        } else {
            let mean = quality_scores.iter().map(|s| s.overall_score).sum::<f64>()
                / quality_scores.len() as f64;
            (mean * 100.0).round() / 100.0
        };

        Self {
            prd_id: prd.id,
            prd_title: prd.title.clone(),
            feature_count: prd.feature_count(),
            ambiguity_report,
            quality_scores,
            overall_readiness,
            estimated_implementation_days: prd
                .features
                .iter()
                .filter_map(|f| f.effort_days())
                .sum(),
        }
    }

    /// Ready when the PRD scores at least 80 and nothing blocks it.
    pub fn is_ready_for_tickets(&self) -> bool {
        self.overall_readiness >= READY_THRESHOLD && !self.ambiguity_report.has_blocking_issues()
    }

    /// Unrounded mean of the feature scores.
    pub fn average_quality_score(&self) -> f64 {
        if self.quality_scores.is_empty() {
            return 0.0;
        }
        self.quality_scores.iter().map(|s| s.overall_score).sum::<f64>()
            / self.quality_scores.len() as f64
    }

    pub fn ready_feature_count(&self) -> usize {
        self.quality_scores.iter().filter(|s| s.is_ready).count()
    }
}

/// Run ambiguity detection and readiness scoring over `prd`. The two
/// engines do not see each other's results.
pub fn analyze_prd(
    prd: &Prd,
    analyzer: &AmbiguityAnalyzer,
    scorer: &ReadinessScorer,
) -> AnalysisSummary {
    let report = analyzer.detect_ambiguities(prd);
    let scores = scorer.score_all(prd);
    let summary = AnalysisSummary::build(prd, report, scores);
    tracing::info!(
        prd = %prd.title,
        readiness = summary.overall_readiness,
        ready = summary.is_ready_for_tickets(),
        "analyzed PRD"
    );
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambiguity::AmbiguityIssue;
    use crate::prd::Feature;
    use crate::types::{AmbiguityType, Complexity, Severity};

    fn ready_feature(name: &str) -> Feature {
        Feature::new(
            name,
            "Users log in via email/password. API responds in under 200ms and supports 1000 concurrent users.",
        )
        .with_acceptance_criteria([
            "Given valid creds, when submit, then authenticated",
            "Given invalid creds, when submit, then error shown",
            "Given locked account, when submit, then lockout notice",
        ])
        .with_test_stubs(["test_a", "test_b", "test_c"])
        .with_complexity(Complexity::Moderate)
    }

    #[test]
    fn ready_prd_is_ready_for_tickets() {
        let prd = Prd::new("Auth", "").with_features(vec![ready_feature("Login")]);
        let summary =
            analyze_prd(&prd, &AmbiguityAnalyzer::pattern_only(), &ReadinessScorer::new());
        assert_eq!(summary.feature_count, 1);
        assert_eq!(summary.overall_readiness, 99.4);
        assert_eq!(summary.ready_feature_count(), 1);
        assert_eq!(summary.ambiguity_report.total_issues(), 0);
        assert!(summary.is_ready_for_tickets());
        assert_eq!(summary.estimated_implementation_days, 5.0);
    }

    #[test]
    fn mixed_prd_averages_scores() {
        let mut estimated = Feature::new("Dashboard", "A dashboard");
        estimated.estimated_days = Some(2.5);
        let prd = Prd::new("Mixed", "").with_features(vec![ready_feature("Login"), estimated]);
        let summary =
            analyze_prd(&prd, &AmbiguityAnalyzer::pattern_only(), &ReadinessScorer::new());

        let expected = (summary.quality_scores[0].overall_score
            + summary.quality_scores[1].overall_score)
            / 2.0;
        assert!((summary.average_quality_score() - expected).abs() < 1e-9);
        assert_eq!(summary.overall_readiness, (expected * 100.0).round() / 100.0);
        assert_eq!(summary.ready_feature_count(), 1);
        assert!(!summary.is_ready_for_tickets());
        assert_eq!(summary.estimated_implementation_days, 7.5);
    }

    #[test]
    fn blocking_ambiguity_prevents_readiness() {
        let prd = Prd::new("Auth", "").with_features(vec![ready_feature("Login")]);
        let mut report = AmbiguityAnalyzer::pattern_only().detect_ambiguities(&prd);
        report.issues.push(AmbiguityIssue::new(
            Some(prd.features[0].id),
            AmbiguityType::UnclearDependency,
            Severity::Critical,
            "login",
            "Depends on an identity provider nobody named",
            "Name the identity provider",
        ));
        let summary = AnalysisSummary::build(&prd, report, ReadinessScorer::new().score_all(&prd));
        assert!(summary.overall_readiness >= 80.0);
        assert!(!summary.is_ready_for_tickets());
    }

    #[test]
    fn empty_prd_has_zero_readiness() {
        let prd = Prd::new("Empty", "");
        let summary =
            analyze_prd(&prd, &AmbiguityAnalyzer::pattern_only(), &ReadinessScorer::new());
        assert_eq!(summary.overall_readiness, 0.0);
        assert_eq!(summary.average_quality_score(), 0.0);
        assert!(!summary.is_ready_for_tickets());
    }
}
