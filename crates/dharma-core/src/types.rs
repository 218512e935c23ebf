//! Core types for Dharma
//!
//! This module defines the fundamental types shared across the engine:
//! - Feature vectors describing the behavioral character of an action
//! - The action shapes consumed by the scorer, the boundary gate, and the optimizer
//! - Alignment levels
//! - Timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Create a timestamp for the current moment
pub fn now() -> Timestamp {
    Utc::now()
}

/// Behavioral feature vector of a single action
///
/// Every dimension is semantically constrained to `[0.0, 1.0]`. The caller is
/// responsible for supplying values in range; the engine never validates or
/// mutates them, all formulas simply assume the bound.
///
/// # Examples
///
/// ```
/// use dharma_core::types::FeatureVector;
///
/// let features = FeatureVector {
///     altruism: 0.9,
///     deliberation: 0.85,
///     transparency: 0.95,
///     ..FeatureVector::default()
/// };
///
/// assert_eq!(features.deception(), 0.0); // optional fields default
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureVector {
    /// Orientation toward the benefit of others
    pub altruism: f64,

    /// Degree of reflection before acting
    pub deliberation: f64,

    /// Attachment to outcomes and rewards
    pub attachment: f64,

    /// Restlessness / impulsive energy
    pub agitation: f64,

    /// Openness about intent and method
    pub transparency: f64,

    /// Energy invested in the action
    pub effort: f64,

    /// Potential to cause harm
    pub harm_potential: f64,

    /// Consistency with past declared behavior
    pub consistency: f64,

    /// Degree of active deception, if assessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deception_level: Option<f64>,

    /// How reversible the action is (1.0 = fully reversible), if assessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversibility: Option<f64>,

    /// Expansion beyond the declared scope, if assessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_creep: Option<f64>,
}

impl FeatureVector {
    /// Deception level, defaulting to 0.0 when not assessed
    pub fn deception(&self) -> f64 {
        self.deception_level.unwrap_or(0.0)
    }

    /// Reversibility, defaulting to 1.0 (fully reversible) when not assessed
    pub fn reversibility_or_default(&self) -> f64 {
        self.reversibility.unwrap_or(1.0)
    }

    /// Scope creep, defaulting to 0.0 when not assessed
    pub fn scope_creep_or_default(&self) -> f64 {
        self.scope_creep.unwrap_or(0.0)
    }

    /// Set the deception level
    pub fn with_deception(mut self, level: f64) -> Self {
        self.deception_level = Some(level);
        self
    }

    /// Set the reversibility
    pub fn with_reversibility(mut self, reversibility: f64) -> Self {
        self.reversibility = Some(reversibility);
        self
    }

    /// Set the scope creep
    pub fn with_scope_creep(mut self, scope_creep: f64) -> Self {
        self.scope_creep = Some(scope_creep);
        self
    }
}

/// An action submitted for principle evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedAction {
    /// Caller-assigned identifier
    pub id: String,

    /// Human-readable description
    pub description: String,

    /// Agent that performed the action, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Behavioral features
    pub features: FeatureVector,
}

impl EvaluatedAction {
    /// Create a new action for evaluation
    pub fn new(id: impl Into<String>, description: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            agent: None,
            features,
        }
    }

    /// Attribute the action to an agent
    pub fn by_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

/// An action submitted to the boundary gate
///
/// Carries the explicit harm/deception/resource scalars the boundary rules
/// gate on, alongside the full feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstrainedAction {
    /// Caller-assigned identifier
    pub id: String,

    /// Human-readable description
    pub description: String,

    /// Behavioral features
    pub features: FeatureVector,

    /// Assessed harm level, falling back to `features.harm_potential`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harm_level: Option<f64>,

    /// Assessed deception level, falling back to `features.deception_level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deception_level: Option<f64>,

    /// Fraction of available resources this action consumes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_consumption: Option<f64>,
}

impl ConstrainedAction {
    /// Create a new action for boundary checking
    pub fn new(id: impl Into<String>, description: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            features,
            harm_level: None,
            deception_level: None,
            resource_consumption: None,
        }
    }

    /// Effective harm level used by the non-harm rules
    pub fn harm(&self) -> f64 {
        self.harm_level.unwrap_or(self.features.harm_potential)
    }

    /// Effective deception level used by the truthfulness rules
    pub fn deception(&self) -> f64 {
        self.deception_level.unwrap_or_else(|| self.features.deception())
    }

    /// Effective resource consumption used by the non-hoarding rules
    pub fn resources(&self) -> f64 {
        self.resource_consumption.unwrap_or(0.0)
    }

    /// Set the assessed harm level
    pub fn with_harm(mut self, harm: f64) -> Self {
        self.harm_level = Some(harm);
        self
    }

    /// Set the assessed deception level
    pub fn with_deception(mut self, deception: f64) -> Self {
        self.deception_level = Some(deception);
        self
    }

    /// Set the resource consumption
    pub fn with_resources(mut self, resources: f64) -> Self {
        self.resource_consumption = Some(resources);
        self
    }
}

/// A candidate action considered by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAction {
    /// Caller-assigned identifier
    pub id: String,

    /// Human-readable description
    pub description: String,

    /// Behavioral features
    pub features: FeatureVector,

    /// Declared duty context (svadharma) tag, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svadharma: Option<String>,

    /// Opaque caller payload carried through ranking untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl CandidateAction {
    /// Create a new candidate action
    pub fn new(id: impl Into<String>, description: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            features,
            svadharma: None,
            payload: None,
        }
    }

    /// Declare the candidate's duty context
    pub fn with_svadharma(mut self, svadharma: impl Into<String>) -> Self {
        self.svadharma = Some(svadharma.into());
        self
    }

    /// Attach an opaque payload
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Ordinal alignment level of a single evaluated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentLevel {
    /// Composite score >= 0.8
    High,

    /// Composite score >= 0.5
    Medium,

    /// Composite score >= 0.25
    Low,

    /// Composite score < 0.25
    Critical,
}

impl AlignmentLevel {
    /// Bucket a composite score using the standard per-action thresholds
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => AlignmentLevel::High,
            s if s >= 0.5 => AlignmentLevel::Medium,
            s if s >= 0.25 => AlignmentLevel::Low,
            _ => AlignmentLevel::Critical,
        }
    }

    /// True for levels that warrant attention
    pub fn needs_attention(self) -> bool {
        matches!(self, AlignmentLevel::Low | AlignmentLevel::Critical)
    }
}

impl fmt::Display for AlignmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignmentLevel::High => "high",
            AlignmentLevel::Medium => "medium",
            AlignmentLevel::Low => "low",
            AlignmentLevel::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Clamp a score into the canonical `[0.0, 1.0]` range
pub(crate) fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
