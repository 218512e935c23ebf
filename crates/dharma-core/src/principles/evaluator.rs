//! Dharmic Evaluator - Composite scoring of actions against principles
//!
//! The evaluator weighted-averages the configured principles' sub-scores into
//! a composite alignment score, buckets it into an ordinal level, and collects
//! violation and commendation messages per principle.

use crate::principles::{default_principles, DharmicPrinciple};
use crate::types::{clamp01, now, AlignmentLevel, EvaluatedAction, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the evaluator
///
/// Thresholds are clamped to `[0,1]` at construction rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// A principle scoring below this contributes a violation message
    pub violation_threshold: f64,

    /// A principle scoring at or above this contributes a commendation message
    pub commendation_threshold: f64,

    /// Composite score at or above this marks the action as aligned
    ///
    /// Independent of the ordinal level bucketing.
    pub alignment_threshold: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            violation_threshold: 0.3,
            commendation_threshold: 0.85,
            alignment_threshold: 0.5,
        }
    }
}

impl EvaluatorConfig {
    fn clamped(self) -> Self {
        Self {
            violation_threshold: clamp01(self.violation_threshold),
            commendation_threshold: clamp01(self.commendation_threshold),
            alignment_threshold: clamp01(self.alignment_threshold),
        }
    }
}

/// Per-principle sub-score inside an evaluation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipleScore {
    /// Stable principle identifier
    pub principle_id: String,

    /// Display name
    pub name: String,

    /// Scriptural grounding label
    pub gita_reference: String,

    /// Weight used in the composite average
    pub weight: f64,

    /// Clamped sub-score in `[0,1]`
    pub score: f64,
}

/// Result of evaluating a single action
///
/// Immutable once produced. The embedded action is a value copy, not a live
/// reference, so the result serializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// The evaluated action (value copy)
    pub action: EvaluatedAction,

    /// Weighted-average composite score in `[0,1]`
    pub composite_score: f64,

    /// Per-principle breakdown
    pub principle_scores: Vec<PrincipleScore>,

    /// Ordinal alignment level bucketed from the composite score
    pub level: AlignmentLevel,

    /// Whether the composite score met the alignment threshold
    pub is_aligned: bool,

    /// Violation messages from principles scoring below the violation threshold
    pub violations: Vec<String>,

    /// Commendation messages from principles at or above the commendation threshold
    pub commendations: Vec<String>,

    /// Free-text summary of the evaluation
    pub reasoning: String,

    /// When the evaluation was produced
    pub evaluated_at: Timestamp,
}

impl EvaluationResult {
    /// Sub-score of a specific principle, if present
    pub fn principle_score(&self, principle_id: &str) -> Option<f64> {
        self.principle_scores
            .iter()
            .find(|p| p.principle_id == principle_id)
            .map(|p| p.score)
    }
}

/// Dharmic evaluator
///
/// Holds the principle list and thresholds as immutable configuration. Every
/// call recomputes from scratch; the only non-deterministic output field is
/// the wall-clock timestamp.
#[derive(Debug, Clone)]
pub struct DharmicEvaluator {
    principles: Vec<DharmicPrinciple>,
    config: EvaluatorConfig,
}

impl Default for DharmicEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DharmicEvaluator {
    /// Create an evaluator with the five default principles
    pub fn new() -> Self {
        Self {
            principles: default_principles(),
            config: EvaluatorConfig::default(),
        }
    }

    /// Create an evaluator with custom thresholds and the default principles
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self {
            principles: default_principles(),
            config: config.clamped(),
        }
    }

    /// Create an evaluator with a caller-supplied principle list
    ///
    /// With `merge_defaults` set, the supplied principles are appended to the
    /// default five; otherwise only the supplied principles are used.
    pub fn with_principles(
        config: EvaluatorConfig,
        principles: Vec<DharmicPrinciple>,
        merge_defaults: bool,
    ) -> Self {
        let principles = if merge_defaults {
            let mut merged = default_principles();
            merged.extend(principles);
            merged
        } else {
            principles
        };

        Self {
            principles,
            config: config.clamped(),
        }
    }

    /// The configured principles
    pub fn principles(&self) -> &[DharmicPrinciple] {
        &self.principles
    }

    /// The configured thresholds
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a single action
    pub fn evaluate(&self, action: &EvaluatedAction) -> EvaluationResult {
        let mut principle_scores = Vec::with_capacity(self.principles.len());
        let mut violations = Vec::new();
        let mut commendations = Vec::new();

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for principle in &self.principles {
            let score = principle.score(&action.features);

            if score < self.config.violation_threshold {
                violations.push(format!(
                    "{} violated: scored {:.2} against {} ({})",
                    principle.name, score, principle.gita_reference, principle.description
                ));
            } else if score >= self.config.commendation_threshold {
                commendations.push(format!(
                    "{} upheld: scored {:.2} ({})",
                    principle.name, score, principle.gita_reference
                ));
            }

            weighted_sum += principle.weight * score;
            weight_total += principle.weight;

            principle_scores.push(PrincipleScore {
                principle_id: principle.id.clone(),
                name: principle.name.clone(),
                gita_reference: principle.gita_reference.clone(),
                weight: principle.weight,
                score,
            });
        }

        // Zero total weight yields 0, not NaN
        let composite_score = if weight_total > 0.0 {
            clamp01(weighted_sum / weight_total)
        } else {
            0.0
        };

        let level = AlignmentLevel::from_score(composite_score);
        let is_aligned = composite_score >= self.config.alignment_threshold;

        let reasoning = synthesize_reasoning(
            composite_score,
            level,
            is_aligned,
            &violations,
            &commendations,
        );

        debug!(
            action_id = %action.id,
            composite_score,
            %level,
            violations = violations.len(),
            "evaluated action"
        );

        EvaluationResult {
            action: action.clone(),
            composite_score,
            principle_scores,
            level,
            is_aligned,
            violations,
            commendations,
            reasoning,
            evaluated_at: now(),
        }
    }

    /// Evaluate a batch of actions, sorted descending by composite score
    pub fn evaluate_batch(&self, actions: &[EvaluatedAction]) -> Vec<EvaluationResult> {
        let mut results: Vec<EvaluationResult> =
            actions.iter().map(|a| self.evaluate(a)).collect();

        results.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results
    }
}

fn synthesize_reasoning(
    composite: f64,
    level: AlignmentLevel,
    is_aligned: bool,
    violations: &[String],
    commendations: &[String],
) -> String {
    let mut parts = vec![format!(
        "Composite alignment score {:.2} ({} level, {})",
        composite,
        level,
        if is_aligned { "aligned" } else { "not aligned" }
    )];

    if !violations.is_empty() {
        parts.push(format!(
            "{} principle violation(s): {}",
            violations.len(),
            violations.join("; ")
        ));
    }

    if !commendations.is_empty() {
        parts.push(format!(
            "{} commendation(s): {}",
            commendations.len(),
            commendations.join("; ")
        ));
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureVector;
    use std::sync::Arc;

    fn exemplary_action() -> EvaluatedAction {
        EvaluatedAction::new(
            "act_a",
            "Thoroughly reviewed and disclosed fix",
            FeatureVector {
                altruism: 0.9,
                deliberation: 0.85,
                attachment: 0.1,
                agitation: 0.05,
                transparency: 0.95,
                effort: 0.8,
                harm_potential: 0.0,
                consistency: 0.9,
                ..FeatureVector::default()
            },
        )
    }

    fn destructive_action() -> EvaluatedAction {
        EvaluatedAction::new(
            "act_b",
            "Concealed destructive shortcut",
            FeatureVector {
                altruism: 0.0,
                deliberation: 0.1,
                attachment: 0.95,
                agitation: 0.9,
                transparency: 0.0,
                effort: 0.2,
                harm_potential: 0.95,
                consistency: 0.0,
                ..FeatureVector::default()
            }
            .with_deception(1.0),
        )
    }

    #[test]
    fn test_exemplary_action_scores_high() {
        let evaluator = DharmicEvaluator::new();
        let result = evaluator.evaluate(&exemplary_action());

        assert!(result.composite_score > 0.85);
        assert_eq!(result.level, AlignmentLevel::High);
        assert!(result.is_aligned);
        assert!(result.violations.is_empty());
        assert!(!result.commendations.is_empty());
    }

    #[test]
    fn test_destructive_action_scores_critical() {
        let evaluator = DharmicEvaluator::new();
        let result = evaluator.evaluate(&destructive_action());

        assert!(result.composite_score < 0.15);
        assert_eq!(result.level, AlignmentLevel::Critical);
        assert!(!result.is_aligned);
        assert!(result.violations.len() >= 4);
    }

    #[test]
    fn test_composite_bounds() {
        let evaluator = DharmicEvaluator::new();

        let perfect = EvaluatedAction::new(
            "p",
            "perfect",
            FeatureVector {
                altruism: 1.0,
                deliberation: 1.0,
                attachment: 0.0,
                agitation: 0.0,
                transparency: 1.0,
                effort: 1.0,
                harm_potential: 0.0,
                consistency: 1.0,
                ..FeatureVector::default()
            },
        );
        let result = evaluator.evaluate(&perfect);
        assert!((result.composite_score - 1.0).abs() < 1e-9);

        let worst = EvaluatedAction::new(
            "w",
            "worst",
            FeatureVector {
                attachment: 1.0,
                agitation: 1.0,
                harm_potential: 1.0,
                ..FeatureVector::default()
            }
            .with_deception(1.0),
        );
        let result = evaluator.evaluate(&worst);
        assert!(result.composite_score.abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_weight_yields_zero() {
        let zero_weight = vec![DharmicPrinciple::new(
            "null",
            "Null",
            "BG 0.0",
            0.0,
            "weightless",
            Arc::new(|_| 1.0),
        )];

        let evaluator =
            DharmicEvaluator::with_principles(EvaluatorConfig::default(), zero_weight, false);
        let result = evaluator.evaluate(&exemplary_action());

        assert_eq!(result.composite_score, 0.0);
        assert!(result.composite_score.is_finite());
    }

    #[test]
    fn test_batch_sorted_descending() {
        let evaluator = DharmicEvaluator::new();
        let results = evaluator.evaluate_batch(&[destructive_action(), exemplary_action()]);

        assert_eq!(results.len(), 2);
        assert!(results[0].composite_score >= results[1].composite_score);
        assert_eq!(results[0].action.id, "act_a");
    }

    #[test]
    fn test_replacement_principles_exclude_defaults() {
        let custom = vec![DharmicPrinciple::new(
            "only",
            "Only",
            "BG 0.0",
            1.0,
            "single custom principle",
            Arc::new(|_| 0.5),
        )];

        let evaluator =
            DharmicEvaluator::with_principles(EvaluatorConfig::default(), custom, false);
        let result = evaluator.evaluate(&exemplary_action());

        assert_eq!(result.principle_scores.len(), 1);
        assert_eq!(result.principle_scores[0].principle_id, "only");
    }

    #[test]
    fn test_merged_principles_include_defaults() {
        let custom = vec![DharmicPrinciple::new(
            "extra",
            "Extra",
            "BG 0.0",
            0.1,
            "additive principle",
            Arc::new(|_| 0.5),
        )];

        let evaluator = DharmicEvaluator::with_principles(EvaluatorConfig::default(), custom, true);
        let result = evaluator.evaluate(&exemplary_action());

        assert_eq!(result.principle_scores.len(), 6);
        assert!(result.principle_score("extra").is_some());
        assert!(result.principle_score("ahimsa").is_some());
    }

    #[test]
    fn test_config_thresholds_clamped() {
        let evaluator = DharmicEvaluator::with_config(EvaluatorConfig {
            violation_threshold: -0.5,
            commendation_threshold: 2.0,
            alignment_threshold: 1.5,
        });

        assert_eq!(evaluator.config().violation_threshold, 0.0);
        assert_eq!(evaluator.config().commendation_threshold, 1.0);
        assert_eq!(evaluator.config().alignment_threshold, 1.0);
    }

    #[test]
    fn test_reasoning_mentions_level_and_violations() {
        let evaluator = DharmicEvaluator::new();
        let result = evaluator.evaluate(&destructive_action());

        assert!(result.reasoning.contains("critical"));
        assert!(result.reasoning.contains("violation"));
    }
}
