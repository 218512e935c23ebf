//! Guna Classifier - Categorical classification of action character
//!
//! Maps a feature vector onto the three gunas (sattva, rajas, tamas) via
//! weighted linear scoring followed by a numerically stable softmax. The
//! normalized scores always sum to 1.0; the primary guna is the argmax with
//! ties broken by the fixed precedence Sattva > Rajas > Tamas.

use crate::types::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three qualities of action character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guna {
    /// Harmonious, clear, balanced
    Sattva,

    /// Turbulent, restless, attached
    Rajas,

    /// Inert, obscured, harmful
    Tamas,
}

impl fmt::Display for Guna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Guna::Sattva => "sattva",
            Guna::Rajas => "rajas",
            Guna::Tamas => "tamas",
        };
        write!(f, "{}", s)
    }
}

/// Normalized guna probabilities, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunaScores {
    /// Probability mass assigned to sattva
    pub sattva: f64,

    /// Probability mass assigned to rajas
    pub rajas: f64,

    /// Probability mass assigned to tamas
    pub tamas: f64,
}

impl GunaScores {
    /// Score for a specific guna
    pub fn get(&self, guna: Guna) -> f64 {
        match guna {
            Guna::Sattva => self.sattva,
            Guna::Rajas => self.rajas,
            Guna::Tamas => self.tamas,
        }
    }

    /// Scores in fixed precedence order (sattva, rajas, tamas)
    fn ordered(&self) -> [(Guna, f64); 3] {
        [
            (Guna::Sattva, self.sattva),
            (Guna::Rajas, self.rajas),
            (Guna::Tamas, self.tamas),
        ]
    }
}

/// Per-dimension weights contributing to one guna's raw score
///
/// Weights may be positive or negative: a dimension can pull toward one guna
/// and away from another.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionWeights {
    pub altruism: f64,
    pub deliberation: f64,
    pub attachment: f64,
    pub agitation: f64,
    pub transparency: f64,
    pub effort: f64,
    pub harm_potential: f64,
    pub consistency: f64,
    pub deception_level: f64,
}

impl DimensionWeights {
    /// Raw linear score: dot product of the weights with the feature vector
    fn score(&self, features: &FeatureVector) -> f64 {
        self.altruism * features.altruism
            + self.deliberation * features.deliberation
            + self.attachment * features.attachment
            + self.agitation * features.agitation
            + self.transparency * features.transparency
            + self.effort * features.effort
            + self.harm_potential * features.harm_potential
            + self.consistency * features.consistency
            + self.deception_level * features.deception()
    }
}

/// Weight matrix: one set of dimension weights per guna
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunaWeightMatrix {
    pub sattva: DimensionWeights,
    pub rajas: DimensionWeights,
    pub tamas: DimensionWeights,
}

impl Default for GunaWeightMatrix {
    fn default() -> Self {
        Self {
            sattva: DimensionWeights {
                altruism: 1.0,
                deliberation: 0.9,
                transparency: 0.9,
                consistency: 0.7,
                attachment: -0.6,
                agitation: -0.7,
                harm_potential: -1.0,
                deception_level: -0.9,
                effort: 0.3,
            },
            rajas: DimensionWeights {
                attachment: 1.0,
                agitation: 0.9,
                effort: 0.6,
                deliberation: -0.5,
                transparency: -0.2,
                altruism: -0.3,
                consistency: -0.2,
                harm_potential: 0.0,
                deception_level: 0.0,
            },
            tamas: DimensionWeights {
                harm_potential: 1.2,
                deception_level: 1.0,
                effort: -0.8,
                deliberation: -0.6,
                transparency: -0.7,
                altruism: -0.4,
                consistency: -0.4,
                agitation: 0.2,
                attachment: 0.3,
            },
        }
    }
}

/// Configuration for the guna classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Per-guna dimension weights
    pub weights: GunaWeightMatrix,

    /// Margin between top and runner-up probability below which the
    /// classification is reported as mixed rather than dominant
    pub dominance_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: GunaWeightMatrix::default(),
            dominance_threshold: 0.1,
        }
    }
}

/// Result of classifying a single feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunaClassification {
    /// The dominant guna (argmax, ties broken sattva > rajas > tamas)
    pub primary: Guna,

    /// Normalized probabilities, summing to 1.0
    pub scores: GunaScores,

    /// Whether the primary guna dominated by at least the configured margin
    pub dominant: bool,

    /// Free-text summary of the classification
    pub reasoning: String,
}

/// Guna classifier
///
/// Pure function of its configuration and input: no side effects, no
/// validation of `[0,1]` bounds, any finite feature values accepted.
#[derive(Debug, Clone, Default)]
pub struct GunaClassifier {
    config: ClassifierConfig,
}

impl GunaClassifier {
    /// Create a classifier with the default weight matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with a custom configuration
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a feature vector into a primary guna with normalized scores
    pub fn classify(&self, features: &FeatureVector) -> GunaClassification {
        let raw = [
            self.config.weights.sattva.score(features),
            self.config.weights.rajas.score(features),
            self.config.weights.tamas.score(features),
        ];

        let normalized = softmax(raw);
        let scores = GunaScores {
            sattva: normalized[0],
            rajas: normalized[1],
            tamas: normalized[2],
        };

        // Argmax with fixed precedence: strict > keeps the earlier guna on ties
        let mut primary = Guna::Sattva;
        let mut best = scores.sattva;
        for (guna, score) in scores.ordered().into_iter().skip(1) {
            if score > best {
                primary = guna;
                best = score;
            }
        }

        let mut runner_up = None;
        let mut second = f64::NEG_INFINITY;
        for (guna, score) in scores.ordered() {
            if guna != primary && score > second {
                runner_up = Some(guna);
                second = score;
            }
        }

        let margin = best - second;
        let dominant = margin >= self.config.dominance_threshold;

        let reasoning = if dominant {
            format!(
                "Dominant {} classification ({:.1}% of probability mass, margin {:.2})",
                primary,
                best * 100.0,
                margin
            )
        } else {
            format!(
                "Mixed classification: {} ({:.1}%) narrowly leads {} ({:.1}%)",
                primary,
                best * 100.0,
                runner_up.map(|g| g.to_string()).unwrap_or_default(),
                second * 100.0
            )
        };

        GunaClassification {
            primary,
            scores,
            dominant,
            reasoning,
        }
    }
}

/// Numerically stable softmax over three raw scores
fn softmax(raw: [f64; 3]) -> [f64; 3] {
    let max = raw[0].max(raw[1]).max(raw[2]);
    let exp = [
        (raw[0] - max).exp(),
        (raw[1] - max).exp(),
        (raw[2] - max).exp(),
    ];
    let sum: f64 = exp.iter().sum();
    [exp[0] / sum, exp[1] / sum, exp[2] / sum]
}
