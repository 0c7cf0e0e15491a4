//! Ambiguity detection: a deterministic lexical pass plus an optional AI
//! supplement, merged into one [`AmbiguityReport`] per PRD.

mod analyzer;
pub mod lexical;

pub use analyzer::{AiAnalyst, AmbiguityAnalyzer, FeatureText, PATTERN_MATCHING_MODEL};

use crate::types::{AmbiguityType, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AmbiguityIssue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbiguityIssue {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<Uuid>,
    pub ambiguity_type: AmbiguityType,
    pub severity: Severity,
    /// The offending text as it should be quoted back to the author.
    pub original_text: String,
    pub explanation: String,
    pub suggestion: String,
}

impl AmbiguityIssue {
    pub fn new(
        feature_id: Option<Uuid>,
        ambiguity_type: AmbiguityType,
        severity: Severity,
        original_text: impl Into<String>,
        explanation: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature_id,
            ambiguity_type,
            severity,
            original_text: original_text.into(),
            explanation: explanation.into(),
            suggestion: suggestion.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AmbiguityReport
// ---------------------------------------------------------------------------

/// Issues for one PRD. Lexical findings come first, AI findings after, in
/// the order each source produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbiguityReport {
    pub id: Uuid,
    pub prd_id: Uuid,
    pub issues: Vec<AmbiguityIssue>,
    pub ai_model_used: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub analysis_duration_seconds: f64,
}

impl AmbiguityReport {
    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    pub fn critical_count(&self) -> usize {
        self.count_severity(Severity::Critical)
    }

    pub fn high_count(&self) -> usize {
        self.count_severity(Severity::High)
    }

    /// Critical issues block ticket creation.
    pub fn has_blocking_issues(&self) -> bool {
        self.critical_count() > 0
    }

    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&AmbiguityIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn issues_by_type(&self, ambiguity_type: AmbiguityType) -> Vec<&AmbiguityIssue> {
        self.issues
            .iter()
            .filter(|i| i.ambiguity_type == ambiguity_type)
            .collect()
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
