//! Definition of Ready scoring.
//!
//! Four check categories feed a weighted overall score: completeness 40%,
//! clarity 30%, testability 20%, feasibility 10%. A feature at or above
//! [`READY_THRESHOLD`] is ready for implementation.

use crate::error::{Result, SpecflowError};
use crate::prd::{Feature, Prd};
use crate::types::{Grade, QualityCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const READY_THRESHOLD: f64 = 80.0;

/// Substrings that suggest a description states something measurable.
const METRIC_INDICATORS: &[&str] = &["ms", "second", "minute", "users", "requests", "mb", "gb", "%"];

/// Substring screen used by the clarity check. Broader lexical analysis
/// lives in [`crate::ambiguity::lexical`].
const CLARITY_VAGUE_TERMS: &[&str] = &[
    "fast",
    "easy",
    "simple",
    "good",
    "better",
    "user-friendly",
    "intuitive",
];

const MIN_DESCRIPTION_LEN: usize = 20;
const CLEAR_DESCRIPTION_LEN: usize = 50;
const MIN_TESTABLE_CRITERIA: usize = 3;
const MIN_TEST_STUBS: usize = 3;

const GWT_RECOMMENDATION: &str = "Add 3-5 acceptance criteria in Given/When/Then format";

// ---------------------------------------------------------------------------
// QualityCheck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub category: QualityCategory,
    pub check_name: String,
    pub passed: bool,
    /// 0-100. Computed independently of `passed`.
    pub score: f64,
    pub details: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl QualityCheck {
    fn new(
        category: QualityCategory,
        check_name: &str,
        passed: bool,
        score: f64,
        details: impl Into<String>,
        recommendation: &str,
    ) -> Self {
        Self {
            category,
            check_name: check_name.to_string(),
            passed,
            score,
            details: details.into(),
            recommendations: if passed {
                Vec::new()
            } else {
                vec![recommendation.to_string()]
            },
        }
    }
}

// ---------------------------------------------------------------------------
// QualityScore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub prd_id: Uuid,
    pub checks: Vec<QualityCheck>,
    /// 0-100, rounded to two decimals.
    pub overall_score: f64,
    pub is_ready: bool,
    pub blocking_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub scored_at: DateTime<Utc>,
}

impl QualityScore {
    /// The fixed result returned when scoring itself goes wrong.
    pub fn degraded(feature_id: Uuid, prd_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature_id,
            prd_id,
            checks: Vec::new(),
            overall_score: 0.0,
            is_ready: false,
            blocking_issues: vec!["Error during scoring".to_string()],
            recommendations: vec!["Review feature manually".to_string()],
            scored_at: Utc::now(),
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.overall_score)
    }

    pub fn has_blocking_issues(&self) -> bool {
        !self.blocking_issues.is_empty()
    }

    /// Mean score of the checks in `category`, 0 when there are none.
    pub fn category_score(&self, category: QualityCategory) -> f64 {
        category_average(&self.checks, category)
    }

    pub fn completeness_score(&self) -> f64 {
        self.category_score(QualityCategory::Completeness)
    }

    pub fn clarity_score(&self) -> f64 {
        self.category_score(QualityCategory::Clarity)
    }

    pub fn testability_score(&self) -> f64 {
        self.category_score(QualityCategory::Testability)
    }

    pub fn feasibility_score(&self) -> f64 {
        self.category_score(QualityCategory::Feasibility)
    }
}

fn category_average(checks: &[QualityCheck], category: QualityCategory) -> f64 {
    let scores: Vec<f64> = checks
        .iter()
        .filter(|c| c.category == category)
        .map(|c| c.score)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Weighted sum of the category averages, rounded to two decimals.
pub fn overall_score(checks: &[QualityCheck]) -> f64 {
    let weighted: f64 = QualityCategory::all()
        .iter()
        .map(|&c| c.weight() * category_average(checks, c))
        .sum();
    (weighted * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn completeness_checks(feature: &Feature) -> Vec<QualityCheck> {
    use QualityCategory::Completeness;

    let has_name = !feature.name.is_empty();
    let has_description = feature.description.chars().count() >= MIN_DESCRIPTION_LEN;
    let has_criteria = !feature.acceptance_criteria.is_empty();

    vec![
        QualityCheck::new(
            Completeness,
            "has_name",
            has_name,
            binary(has_name),
            if has_name {
                "Feature has a clear name"
            } else {
                "Feature missing name"
            },
            "Add a clear, descriptive feature name",
        ),
        QualityCheck::new(
            Completeness,
            "has_description",
            has_description,
            binary(has_description),
            if has_description {
                "Feature has detailed description"
            } else {
                "Feature missing description"
            },
            "Add detailed feature description (at least 20 characters)",
        ),
        QualityCheck::new(
            Completeness,
            "has_acceptance_criteria",
            has_criteria,
            binary(has_criteria),
            if has_criteria {
                "Feature has acceptance criteria"
            } else {
                "Feature missing acceptance criteria"
            },
            GWT_RECOMMENDATION,
        ),
    ]
}

fn clarity_checks(feature: &Feature) -> Vec<QualityCheck> {
    use QualityCategory::Clarity;

    let description = feature.description.to_lowercase();
    let len = feature.description.chars().count();
    let has_metrics = METRIC_INDICATORS.iter().any(|m| description.contains(m));
    let is_clear = len >= CLEAR_DESCRIPTION_LEN && has_metrics;
    let length_score = if len >= MIN_DESCRIPTION_LEN {
        (len as f64).min(100.0)
    } else {
        0.0
    };

    let has_vague = CLARITY_VAGUE_TERMS.iter().any(|t| description.contains(t));

    vec![
        QualityCheck::new(
            Clarity,
            "description_quality",
            is_clear,
            length_score,
            if is_clear {
                "Description is clear and specific"
            } else {
                "Description is vague or too brief"
            },
            "Add specific metrics and quantifiable requirements",
        ),
        QualityCheck::new(
            Clarity,
            "no_vague_terms",
            !has_vague,
            binary(!has_vague),
            if has_vague {
                "Description contains vague terms"
            } else {
                "No vague terms detected"
            },
            "Replace vague terms with specific, measurable criteria",
        ),
    ]
}

fn is_given_when_then(criterion: &str) -> bool {
    let c = criterion.to_lowercase();
    c.contains("given") && c.contains("when") && c.contains("then")
}

fn testability_checks(feature: &Feature) -> Vec<QualityCheck> {
    use QualityCategory::Testability;

    let criteria = &feature.acceptance_criteria;
    let enough_criteria = criteria.len() >= MIN_TESTABLE_CRITERIA;
    let well_formed = !criteria.is_empty() && criteria.iter().all(|c| is_given_when_then(c));
    let testable = enough_criteria && well_formed;
    let criteria_score = match (enough_criteria, well_formed) {
        (true, true) => 100.0,
        (true, false) => 50.0,
        _ => 0.0,
    };

    let stub_count = feature.test_stubs.len();
    let has_stubs = stub_count >= MIN_TEST_STUBS;

    vec![
        QualityCheck::new(
            Testability,
            "testable_acceptance_criteria",
            testable,
            criteria_score,
            if well_formed {
                format!(
                    "Feature has {} acceptance criteria in Given/When/Then format",
                    criteria.len()
                )
            } else {
                "Acceptance criteria need proper format".to_string()
            },
            GWT_RECOMMENDATION,
        ),
        QualityCheck::new(
            Testability,
            "has_test_stubs",
            has_stubs,
            binary(has_stubs),
            if has_stubs {
                format!("Feature has {stub_count} test stubs")
            } else {
                "Missing test stubs".to_string()
            },
            "Generate test case stubs for unit, integration, and e2e testing",
        ),
    ]
}

fn feasibility_checks(feature: &Feature) -> Vec<QualityCheck> {
    use QualityCategory::Feasibility;

    // A missing estimate is a soft signal: half marks, never zero.
    let complexity = QualityCheck::new(
        Feasibility,
        "has_complexity_estimate",
        feature.complexity.is_some(),
        if feature.complexity.is_some() { 100.0 } else { 50.0 },
        match feature.complexity {
            Some(c) => format!("Complexity estimated as {c}"),
            None => "No complexity estimation".to_string(),
        },
        "Estimate feature complexity (trivial/simple/moderate/complex/very_complex)",
    );

    // Dependency validation is not performed here; the check always passes.
    let dependencies = QualityCheck::new(
        Feasibility,
        "dependency_clarity",
        true,
        100.0,
        if feature.dependencies.is_empty() {
            "No dependencies".to_string()
        } else {
            format!("Feature has {} dependencies", feature.dependencies.len())
        },
        "",
    );

    vec![complexity, dependencies]
}

fn binary(passed: bool) -> f64 {
    if passed {
        100.0
    } else {
        0.0
    }
}

/// Every check in evaluation order: completeness, clarity, testability,
/// feasibility.
pub fn run_checks(feature: &Feature) -> Vec<QualityCheck> {
    let mut checks = completeness_checks(feature);
    checks.extend(clarity_checks(feature));
    checks.extend(testability_checks(feature));
    checks.extend(feasibility_checks(feature));
    checks
}

// ---------------------------------------------------------------------------
// ReadinessScorer
// ---------------------------------------------------------------------------

/// Stateless; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadinessScorer;

impl ReadinessScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score `feature` against the Definition of Ready.
    ///
    /// Never fails: a score that cannot be assembled yields
    /// [`QualityScore::degraded`] and is logged. The built-in checks always
    /// stay within 0-100, so the fallback only fires if a check misbehaves.
    pub fn score_readiness(&self, feature: &Feature, prd_id: Uuid) -> QualityScore {
        score_or_degrade(feature, prd_id, run_checks(feature))
    }

    pub fn try_score(&self, feature: &Feature, prd_id: Uuid) -> Result<QualityScore> {
        assemble(feature, prd_id, run_checks(feature))
    }

    /// One score per feature, in feature order.
    pub fn score_all(&self, prd: &Prd) -> Vec<QualityScore> {
        prd.features
            .iter()
            .map(|f| self.score_readiness(f, prd.id))
            .collect()
    }
}

fn score_or_degrade(feature: &Feature, prd_id: Uuid, checks: Vec<QualityCheck>) -> QualityScore {
    match assemble(feature, prd_id, checks) {
        Ok(score) => {
            tracing::info!(
                feature = %feature.name,
                score = score.overall_score,
                ready = score.is_ready,
                "scored feature readiness"
            );
            score
        }
        Err(e) => {
            tracing::error!(feature = %feature.name, error = %e, "error scoring feature");
            QualityScore::degraded(feature.id, prd_id)
        }
    }
}

/// Build a [`QualityScore`] from evaluated checks, rejecting any check
/// score that is non-finite or outside 0-100.
fn assemble(feature: &Feature, prd_id: Uuid, checks: Vec<QualityCheck>) -> Result<QualityScore> {
    for check in &checks {
        if !check.score.is_finite() || !(0.0..=100.0).contains(&check.score) {
            return Err(SpecflowError::InvalidCheckScore {
                check: check.check_name.clone(),
                score: check.score,
            });
        }
    }

    let overall = overall_score(&checks);
    let blocking_issues = checks
        .iter()
        .filter(|c| !c.passed && c.category == QualityCategory::Completeness)
        .map(|c| c.details.clone())
        .collect();
    let recommendations = checks
        .iter()
        .filter(|c| !c.passed)
        .flat_map(|c| c.recommendations.iter().cloned())
        .collect();

    Ok(QualityScore {
        id: Uuid::new_v4(),
        feature_id: feature.id,
        prd_id,
        checks,
        overall_score: overall,
        is_ready: overall >= READY_THRESHOLD,
        blocking_issues,
        recommendations,
        scored_at: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
