//! Dharmic Principles - Weighted scoring rules over feature vectors
//!
//! A principle is a named, weighted scoring rule: it maps a feature vector to
//! a sub-score in `[0,1]` and carries the metadata (display name, Gita
//! reference, weight, description) the evaluator and external verse lookup
//! consume. The five defaults cover discrimination (viveka), non-harm
//! (ahimsa), truthfulness (satya), service (seva), and detachment (vairagya).
//!
//! Principles are immutable configuration: they are constructed once when an
//! evaluator is built and read for its lifetime. Replacing the set means
//! building a new list, never mutating an existing principle.

pub mod evaluator;

use crate::types::{clamp01, FeatureVector};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub use evaluator::{DharmicEvaluator, EvaluationResult, EvaluatorConfig, PrincipleScore};

/// Scoring function of a principle: feature vector in, `[0,1]` sub-score out
pub type ScoreFn = Arc<dyn Fn(&FeatureVector) -> f64 + Send + Sync>;

/// A named, weighted scoring rule
#[derive(Clone)]
pub struct DharmicPrinciple {
    /// Stable identifier, suitable for external verse lookup
    pub id: String,

    /// Display name
    pub name: String,

    /// Scriptural grounding label (e.g. "BG 17.15")
    pub gita_reference: String,

    /// Weight in the composite average, clamped to `[0,1]`
    pub weight: f64,

    /// One-line description of what the principle measures
    pub description: String,

    /// The scoring function
    scorer: ScoreFn,
}

impl DharmicPrinciple {
    /// Create a new principle
    ///
    /// The weight is clamped to `[0,1]` rather than rejected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gita_reference: impl Into<String>,
        weight: f64,
        description: impl Into<String>,
        scorer: ScoreFn,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gita_reference: gita_reference.into(),
            weight: clamp01(weight),
            description: description.into(),
            scorer,
        }
    }

    /// Score a feature vector, clamped to `[0,1]`
    pub fn score(&self, features: &FeatureVector) -> f64 {
        clamp01((self.scorer)(features))
    }
}

impl fmt::Debug for DharmicPrinciple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DharmicPrinciple")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("gita_reference", &self.gita_reference)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Serializable metadata view of a principle (the scoring function is not data)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipleInfo {
    pub id: String,
    pub name: String,
    pub gita_reference: String,
    pub weight: f64,
    pub description: String,
}

impl From<&DharmicPrinciple> for PrincipleInfo {
    fn from(principle: &DharmicPrinciple) -> Self {
        Self {
            id: principle.id.clone(),
            name: principle.name.clone(),
            gita_reference: principle.gita_reference.clone(),
            weight: principle.weight,
            description: principle.description.clone(),
        }
    }
}

/// The five default principles
///
/// Each scoring function is a fixed two-term weighted sum over the feature
/// vector; weights across the five principles sum to 1.0.
pub fn default_principles() -> Vec<DharmicPrinciple> {
    vec![
        DharmicPrinciple::new(
            "viveka",
            "Viveka (Discrimination)",
            "BG 2.50",
            0.20,
            "Discernment between wise and unwise action",
            Arc::new(|f: &FeatureVector| 0.6 * f.deliberation + 0.4 * f.consistency),
        ),
        DharmicPrinciple::new(
            "ahimsa",
            "Ahimsa (Non-harm)",
            "BG 16.2",
            0.25,
            "Absence of intent or potential to harm",
            Arc::new(|f: &FeatureVector| {
                0.7 * (1.0 - f.harm_potential) + 0.3 * (1.0 - f.deception())
            }),
        ),
        DharmicPrinciple::new(
            "satya",
            "Satya (Truthfulness)",
            "BG 17.15",
            0.20,
            "Transparency of intent and absence of deception",
            Arc::new(|f: &FeatureVector| 0.6 * f.transparency + 0.4 * (1.0 - f.deception())),
        ),
        DharmicPrinciple::new(
            "seva",
            "Seva (Service)",
            "BG 3.25",
            0.15,
            "Effortful action oriented toward the welfare of others",
            Arc::new(|f: &FeatureVector| 0.6 * f.altruism + 0.4 * f.effort),
        ),
        DharmicPrinciple::new(
            "vairagya",
            "Vairagya (Detachment)",
            "BG 6.35",
            0.20,
            "Equanimity: freedom from clinging and agitation",
            Arc::new(|f: &FeatureVector| {
                0.5 * (1.0 - f.attachment) + 0.5 * (1.0 - f.agitation)
            }),
        ),
    ]
}
