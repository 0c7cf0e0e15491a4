use super::{lexical, AmbiguityIssue, AmbiguityReport};
use crate::config::Config;
use crate::error::Result;
use crate::llm::MessagesAnalyst;
use crate::prd::Prd;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// Model name stamped on reports produced without an AI analyst.
pub const PATTERN_MATCHING_MODEL: &str = "pattern-matching";

// ---------------------------------------------------------------------------
// AiAnalyst
// ---------------------------------------------------------------------------

/// Name and description of one feature, as handed to an AI analyst.
#[derive(Debug, Clone, Copy)]
pub struct FeatureText<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
}

/// An external source of additional ambiguity findings. Implementations
/// may fail for any reason by returning `Err`, which [`AmbiguityAnalyzer`]
/// absorbs. They must not panic: a panic is not caught and aborts the
/// whole detection run.
pub trait AiAnalyst: Send + Sync {
    fn model_name(&self) -> &str;

    fn analyze(&self, prd_title: &str, features: &[FeatureText<'_>])
        -> Result<Vec<AmbiguityIssue>>;
}

// ---------------------------------------------------------------------------
// AmbiguityAnalyzer
// ---------------------------------------------------------------------------

pub struct AmbiguityAnalyzer {
    ai: Option<Box<dyn AiAnalyst>>,
}

impl AmbiguityAnalyzer {
    /// Lexical detection only.
    pub fn pattern_only() -> Self {
        Self { ai: None }
    }

    pub fn with_ai(ai: Box<dyn AiAnalyst>) -> Self {
        Self { ai: Some(ai) }
    }

    /// Builds the HTTP analyst when AI is enabled in `config` and its key is
    /// available; otherwise falls back to lexical detection with a warning.
    pub fn from_config(config: &Config) -> Self {
        if !config.ai.enabled {
            return Self::pattern_only();
        }
        match MessagesAnalyst::from_config(&config.ai) {
            Ok(analyst) => Self::with_ai(Box::new(analyst)),
            Err(e) => {
                tracing::warn!(error = %e, "AI analysis unavailable, using pattern matching only");
                Self::pattern_only()
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.ai
            .as_deref()
            .map(|a| a.model_name())
            .unwrap_or(PATTERN_MATCHING_MODEL)
    }

    /// Detect ambiguities across every feature description of `prd`.
    ///
    /// Never fails: if the AI analyst errors, the report carries the
    /// lexical findings alone and the error is logged.
    pub fn detect_ambiguities(&self, prd: &Prd) -> AmbiguityReport {
        let started = Instant::now();
        tracing::info!(prd = %prd.title, features = prd.features.len(), "analyzing PRD for ambiguities");

        let mut issues: Vec<AmbiguityIssue> = prd
            .features
            .iter()
            .flat_map(|f| lexical::detect(&f.description, Some(f.id)))
            .collect();
        let lexical_count = issues.len();

        if let Some(ai) = self.ai.as_deref() {
            let texts: Vec<FeatureText<'_>> = prd
                .features
                .iter()
                .map(|f| FeatureText {
                    id: f.id,
                    name: &f.name,
                    description: &f.description,
                })
                .collect();
            match ai.analyze(&prd.title, &texts) {
                Ok(found) => issues.extend(found),
                Err(e) => {
                    tracing::error!(
                        prd = %prd.title,
                        model = ai.model_name(),
                        error = %e,
                        "AI ambiguity analysis failed, keeping pattern-matched issues"
                    );
                }
            }
        }

        tracing::info!(
            total = issues.len(),
            lexical = lexical_count,
            "found ambiguity issues"
        );

        AmbiguityReport {
            id: Uuid::new_v4(),
            prd_id: prd.id,
            issues,
            ai_model_used: self.model_name().to_string(),
            analysis_timestamp: Utc::now(),
            analysis_duration_seconds: started.elapsed().as_secs_f64(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
