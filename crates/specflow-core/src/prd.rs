use crate::error::{Result, SpecflowError};
use crate::types::{Complexity, Priority, RequirementType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub description: String,
    #[serde(default)]
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Uuid>,
    /// Criteria in Given/When/Then form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_cases: Vec<String>,
}

impl Requirement {
    pub fn new(description: impl Into<String>, requirement_type: RequirementType) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            requirement_type,
            priority: Priority::default(),
            dependencies: Vec::new(),
            acceptance_criteria: Vec::new(),
            edge_cases: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A unit of product functionality under assessment.
///
/// Created by parsing or extraction, filled in by the generator stage
/// (criteria, test stubs), then handed read-only to the detector and the
/// scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub test_stubs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_cases: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Feature {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            user_story: None,
            requirements: Vec::new(),
            acceptance_criteria: Vec::new(),
            test_stubs: Vec::new(),
            edge_cases: Vec::new(),
            priority: Priority::default(),
            complexity: None,
            estimated_days: None,
            dependencies: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<Requirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_acceptance_criteria<S: Into<String>>(
        mut self,
        criteria: impl IntoIterator<Item = S>,
    ) -> Self {
        self.acceptance_criteria = criteria.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_test_stubs<S: Into<String>>(mut self, stubs: impl IntoIterator<Item = S>) -> Self {
        self.test_stubs = stubs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_edge_cases<S: Into<String>>(mut self, cases: impl IntoIterator<Item = S>) -> Self {
        self.edge_cases = cases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Uuid>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    pub fn acceptance_criteria_count(&self) -> usize {
        self.acceptance_criteria.len()
    }

    /// Name, description, at least one requirement and at least one
    /// acceptance criterion.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.description.is_empty()
            && !self.requirements.is_empty()
            && !self.acceptance_criteria.is_empty()
    }

    /// A decoded feature must carry a name and a description. Scoring
    /// still accepts features that fail this.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SpecflowError::InvalidFormat(format!(
                "feature '{}' has an empty name",
                self.id
            )));
        }
        if self.description.trim().is_empty() {
            return Err(SpecflowError::InvalidFormat(format!(
                "feature '{}' has an empty description",
                self.name
            )));
        }
        Ok(())
    }

    /// Explicit estimate if present, otherwise the complexity band.
    pub fn effort_days(&self) -> Option<f64> {
        self.estimated_days
            .or_else(|| self.complexity.map(Complexity::estimated_days))
    }
}

// ---------------------------------------------------------------------------
// PRD
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for PrdMetadata {
    fn default() -> Self {
        Self {
            author: None,
            version: default_version(),
            source_format: None,
            source_url: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdSection {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub order: usize,
}

/// Product Requirements Document: the parent of a set of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prd {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub raw_content: String,
    #[serde(default)]
    pub sections: Vec<PrdSection>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub metadata: PrdMetadata,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Prd {
    pub fn new(title: impl Into<String>, raw_content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            raw_content: raw_content.into(),
            sections: Vec::new(),
            features: Vec::new(),
            metadata: PrdMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn total_requirements(&self) -> usize {
        self.features.iter().map(Feature::requirement_count).sum()
    }

    /// Share of complete features, 0-100.
    pub fn completion_percentage(&self) -> f64 {
        if self.features.is_empty() {
            return 0.0;
        }
        let complete = self.features.iter().filter(|f| f.is_complete()).count();
        complete as f64 / self.features.len() as f64 * 100.0
    }

    pub fn features_by_priority(&self, priority: Priority) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| f.priority == priority)
            .collect()
    }

    /// Title plus [`Feature::validate`] for every feature.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SpecflowError::InvalidFormat(
                "PRD must have a title".to_string(),
            ));
        }
        self.features.iter().try_for_each(Feature::validate)
    }

    pub fn feature_by_name(&self, name: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
