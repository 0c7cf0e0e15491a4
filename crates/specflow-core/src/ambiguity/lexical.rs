//! Deterministic vague-term scan.
//!
//! Each catalogued term is matched as a whole word against the lowercased
//! text. A term yields at most one issue per text no matter how often it
//! occurs, and issues come out in catalogue order.

use super::AmbiguityIssue;
use crate::types::{AmbiguityType, Severity};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

pub struct VagueTerm {
    pub term: &'static str,
    pub ambiguity_type: AmbiguityType,
    pub severity: Severity,
    suggestion: Option<&'static str>,
}

impl VagueTerm {
    pub fn suggestion(&self) -> String {
        match self.suggestion {
            Some(s) => s.to_string(),
            None => format!(
                "Replace '{}' with specific, measurable criteria",
                self.term
            ),
        }
    }

    pub fn explanation(&self) -> String {
        format!(
            "'{}' is vague and subjective. Needs quantification or specific criteria.",
            self.term
        )
    }
}

macro_rules! term {
    ($term:literal, $kind:ident, $severity:ident) => {
        VagueTerm {
            term: $term,
            ambiguity_type: AmbiguityType::$kind,
            severity: Severity::$severity,
            suggestion: None,
        }
    };
    ($term:literal, $kind:ident, $severity:ident, $suggestion:literal) => {
        VagueTerm {
            term: $term,
            ambiguity_type: AmbiguityType::$kind,
            severity: Severity::$severity,
            suggestion: Some($suggestion),
        }
    };
}

/// Never contains `Severity::Critical`: a word list cannot tell from
/// context that an implementation is blocked.
pub static VOCABULARY: &[VagueTerm] = &[
    term!("fast", MissingMetric, High, "Specify response time (e.g., 'API responds in <200ms')"),
    term!("slow", MissingMetric, Low, "Specify acceptable delay (e.g., 'background job may take up to 2 minutes')"),
    term!("quick", VagueTerm, Low),
    term!("quickly", MissingMetric, High, "Define time constraint (e.g., 'process completes within 5 seconds')"),
    term!("easy", VagueTerm, Medium, "Define usability criteria (e.g., 'new users complete task in under 2 minutes')"),
    term!("simple", VagueTerm, Medium),
    term!("hard", VagueTerm, Low),
    term!("difficult", VagueTerm, Low),
    term!("user-friendly", SubjectiveLanguage, Medium, "Specify usability metrics (e.g., '80% of users succeed without help')"),
    term!("intuitive", SubjectiveLanguage, Medium, "Define learnability goals (e.g., 'users find feature without training')"),
    term!("seamless", VagueTerm, Low),
    term!("smooth", VagueTerm, Low),
    term!("efficient", VagueTerm, Low),
    term!("optimal", VagueTerm, Low),
    term!("good", VagueTerm, Low),
    term!("bad", VagueTerm, Low),
    term!("better", VagueTerm, Low),
    term!("best", VagueTerm, Low),
    term!("nice", SubjectiveLanguage, Low),
    term!("clean", SubjectiveLanguage, Low),
    term!("elegant", SubjectiveLanguage, Low),
    term!("beautiful", SubjectiveLanguage, Low),
    term!("many", MissingMetric, High, "Provide specific number (e.g., 'support 1000+ concurrent users')"),
    term!("few", MissingMetric, Low, "Specify exact count (e.g., 'limit to 3 attempts')"),
    term!("some", MissingMetric, Low),
    term!("several", MissingMetric, Low),
    term!("most", MissingMetric, Low),
    term!("often", VagueTerm, Low),
    term!("rarely", VagueTerm, Low),
    term!("sometimes", VagueTerm, Low),
    term!("large", MissingMetric, Low, "Provide size specification (e.g., 'files up to 100MB')"),
    term!("small", MissingMetric, Low, "Specify size limit (e.g., 'thumbnails 150x150 pixels')"),
    term!("big", VagueTerm, Low),
    term!("tiny", VagueTerm, Low),
    term!("huge", VagueTerm, Low),
    term!("massive", VagueTerm, Low),
    term!("minimal", VagueTerm, Low),
    term!("high", MissingMetric, High),
    term!("low", MissingMetric, High),
    term!("more", VagueTerm, Low),
    term!("less", VagueTerm, Low),
];

static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

/// One whole-word pattern per vocabulary entry, index-aligned.
fn patterns() -> &'static [Regex] {
    PATTERNS.get_or_init(|| {
        VOCABULARY
            .iter()
            .map(|t| {
                Regex::new(&format!(r"\b{}\b", regex::escape(t.term)))
                    .expect("vocabulary terms are valid literals")
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// detect
// ---------------------------------------------------------------------------

/// Scan `text` for catalogued vague terms. Empty text yields no issues.
pub fn detect(text: &str, feature_id: Option<Uuid>) -> Vec<AmbiguityIssue> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase();

    VOCABULARY
        .iter()
        .zip(patterns())
        .filter(|(_, re)| re.is_match(&lowered))
        .map(|(term, _)| {
            AmbiguityIssue::new(
                feature_id,
                term.ambiguity_type,
                term.severity,
                term.term,
                term.explanation(),
                term.suggestion(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
