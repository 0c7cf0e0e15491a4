use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SpecflowError;

/// Implements `Display` and `FromStr` in terms of `as_str()` / `all()`.
macro_rules! string_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = SpecflowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| SpecflowError::InvalidEnum {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

string_enum!(Priority, "priority");

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl Complexity {
    pub fn all() -> &'static [Complexity] {
        &[
            Complexity::Trivial,
            Complexity::Simple,
            Complexity::Moderate,
            Complexity::Complex,
            Complexity::VeryComplex,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Trivial => "trivial",
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
            Complexity::VeryComplex => "very_complex",
        }
    }

    /// Upper bound of the conventional estimate band, in days.
    pub fn estimated_days(self) -> f64 {
        match self {
            Complexity::Trivial => 1.0,
            Complexity::Simple => 3.0,
            Complexity::Moderate => 5.0,
            Complexity::Complex => 10.0,
            Complexity::VeryComplex => 15.0,
        }
    }
}

string_enum!(Complexity, "complexity");

// ---------------------------------------------------------------------------
// RequirementType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    #[default]
    Functional,
    NonFunctional,
    Constraint,
    Assumption,
    EdgeCase,
}

impl RequirementType {
    pub fn all() -> &'static [RequirementType] {
        &[
            RequirementType::Functional,
            RequirementType::NonFunctional,
            RequirementType::Constraint,
            RequirementType::Assumption,
            RequirementType::EdgeCase,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementType::Functional => "functional",
            RequirementType::NonFunctional => "non_functional",
            RequirementType::Constraint => "constraint",
            RequirementType::Assumption => "assumption",
            RequirementType::EdgeCase => "edge_case",
        }
    }
}

string_enum!(RequirementType, "requirement type");

// ---------------------------------------------------------------------------
// AmbiguityType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityType {
    VagueTerm,
    MissingMetric,
    MissingContext,
    UnclearDependency,
    SubjectiveLanguage,
    IncompleteCondition,
}

impl AmbiguityType {
    pub fn all() -> &'static [AmbiguityType] {
        &[
            AmbiguityType::VagueTerm,
            AmbiguityType::MissingMetric,
            AmbiguityType::MissingContext,
            AmbiguityType::UnclearDependency,
            AmbiguityType::SubjectiveLanguage,
            AmbiguityType::IncompleteCondition,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AmbiguityType::VagueTerm => "vague_term",
            AmbiguityType::MissingMetric => "missing_metric",
            AmbiguityType::MissingContext => "missing_context",
            AmbiguityType::UnclearDependency => "unclear_dependency",
            AmbiguityType::SubjectiveLanguage => "subjective_language",
            AmbiguityType::IncompleteCondition => "incomplete_condition",
        }
    }
}

string_enum!(AmbiguityType, "ambiguity type");

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// 4 for critical down to 1 for low.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

string_enum!(Severity, "severity");

// ---------------------------------------------------------------------------
// QualityCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    Completeness,
    Clarity,
    Testability,
    Feasibility,
}

impl QualityCategory {
    pub fn all() -> &'static [QualityCategory] {
        &[
            QualityCategory::Completeness,
            QualityCategory::Clarity,
            QualityCategory::Testability,
            QualityCategory::Feasibility,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityCategory::Completeness => "completeness",
            QualityCategory::Clarity => "clarity",
            QualityCategory::Testability => "testability",
            QualityCategory::Feasibility => "feasibility",
        }
    }

    /// Contribution of this category to the overall score. The four
    /// weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            QualityCategory::Completeness => 0.40,
            QualityCategory::Clarity => 0.30,
            QualityCategory::Testability => 0.20,
            QualityCategory::Feasibility => 0.10,
        }
    }
}

string_enum!(QualityCategory, "quality category");

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn all() -> &'static [Grade] {
        &[Grade::A, Grade::B, Grade::C, Grade::D, Grade::F]
    }

    /// Band an overall score: each band includes its lower bound.
    pub fn from_score(score: f64) -> Grade {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

string_enum!(Grade, "grade");

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
