//! Karma Optimizer - Fitness-based ranking and selection of candidate actions
//!
//! Each candidate's fitness is the weighted average of the optimizer's
//! principle scores, adjusted by a guna modifier (sattva bonus, tamas
//! penalty) and an optional svadharma context bonus. Selection is
//! deterministic argmax at temperature 0, or Boltzmann sampling at positive
//! temperature with a seedable RNG.

use crate::classifier::{Guna, GunaClassifier};
use crate::error::{DharmaError, Result};
use crate::principles::DharmicPrinciple;
use crate::types::{clamp01, CandidateAction, FeatureVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Configuration for the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Candidates with fitness below this are filtered out before ranking;
    /// 0.0 disables filtering. If filtering empties the pool the unfiltered
    /// set is used instead.
    pub minimum_fitness: f64,

    /// Boltzmann temperature; 0.0 selects the argmax deterministically
    pub temperature: f64,

    /// Duty context tag matched against each candidate's svadharma
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty_context: Option<String>,

    /// Added fitness per unit of sattva probability
    pub sattva_bonus: f64,

    /// Subtracted fitness per unit of tamas probability
    pub tamas_penalty: f64,

    /// Flat bonus for a matching svadharma declaration
    pub svadharma_bonus: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            minimum_fitness: 0.0,
            temperature: 0.0,
            duty_context: None,
            sattva_bonus: 0.15,
            tamas_penalty: 0.15,
            svadharma_bonus: 0.2,
        }
    }
}

impl OptimizerConfig {
    fn clamped(self) -> Self {
        Self {
            minimum_fitness: clamp01(self.minimum_fitness),
            temperature: self.temperature.max(0.0),
            duty_context: self.duty_context,
            sattva_bonus: clamp01(self.sattva_bonus),
            tamas_penalty: clamp01(self.tamas_penalty),
            svadharma_bonus: clamp01(self.svadharma_bonus),
        }
    }
}

/// A candidate with its computed fitness breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    /// The candidate (value copy)
    pub candidate: CandidateAction,

    /// Final fitness in `[0,1]` after all adjustments
    pub fitness: f64,

    /// Principle-weighted fitness before adjustments
    pub base_fitness: f64,

    /// Net guna adjustment applied (may be negative)
    pub guna_adjustment: f64,

    /// Primary guna of the candidate's feature vector
    pub guna: Guna,

    /// Whether the svadharma context bonus was applied
    pub svadharma_matched: bool,
}

/// Result of an optimization pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    /// All surviving candidates, sorted descending by fitness
    pub ranked: Vec<RankedCandidate>,

    /// The selected candidate; always a member of `ranked`
    pub selected: RankedCandidate,

    /// Free-text summary of how the selection was made
    pub selection_reasoning: String,
}

/// The six default optimizer principles
///
/// A distinct set from the evaluator's five: the optimizer judges prospective
/// candidates, so it weighs selflessness and steadiness over retrospective
/// qualities. Weights sum to 1.0.
pub fn default_optimizer_principles() -> Vec<DharmicPrinciple> {
    vec![
        DharmicPrinciple::new(
            "nishkama",
            "Nishkama Karma (Selfless Action)",
            "BG 2.47",
            0.20,
            "Action free from clinging to its fruits",
            Arc::new(|f: &FeatureVector| 0.7 * (1.0 - f.attachment) + 0.3 * (1.0 - f.agitation)),
        ),
        DharmicPrinciple::new(
            "lokasangraha",
            "Lokasangraha (World Welfare)",
            "BG 3.20",
            0.20,
            "Effortful action for the maintenance of the world",
            Arc::new(|f: &FeatureVector| 0.7 * f.altruism + 0.3 * f.effort),
        ),
        DharmicPrinciple::new(
            "ahimsa",
            "Ahimsa (Non-harm)",
            "BG 16.2",
            0.20,
            "Absence of intent or potential to harm",
            Arc::new(|f: &FeatureVector| {
                0.8 * (1.0 - f.harm_potential) + 0.2 * (1.0 - f.deception())
            }),
        ),
        DharmicPrinciple::new(
            "viveka",
            "Viveka (Discrimination)",
            "BG 18.30",
            0.15,
            "Knowing when to act and when to refrain",
            Arc::new(|f: &FeatureVector| 0.6 * f.deliberation + 0.4 * f.consistency),
        ),
        DharmicPrinciple::new(
            "satya",
            "Satya (Truthfulness)",
            "BG 17.15",
            0.15,
            "Transparency of intent and absence of deception",
            Arc::new(|f: &FeatureVector| 0.6 * f.transparency + 0.4 * (1.0 - f.deception())),
        ),
        DharmicPrinciple::new(
            "sthairya",
            "Sthairya (Steadiness)",
            "BG 6.19",
            0.10,
            "Unwavering, consistent conduct",
            Arc::new(|f: &FeatureVector| 0.5 * f.consistency + 0.5 * (1.0 - f.agitation)),
        ),
    ]
}

/// Karma optimizer
///
/// Owns its RNG; use [`KarmaOptimizer::with_seed`] for deterministic
/// stochastic selection in tests.
#[derive(Debug)]
pub struct KarmaOptimizer {
    principles: Vec<DharmicPrinciple>,
    classifier: GunaClassifier,
    config: OptimizerConfig,
    rng: StdRng,
}

impl Default for KarmaOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl KarmaOptimizer {
    /// Create an optimizer with the default principles and configuration
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    /// Create an optimizer with a custom configuration
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            principles: default_optimizer_principles(),
            classifier: GunaClassifier::new(),
            config: config.clamped(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an optimizer with a seeded RNG for deterministic sampling
    pub fn with_seed(config: OptimizerConfig, seed: u64) -> Self {
        Self {
            principles: default_optimizer_principles(),
            classifier: GunaClassifier::new(),
            config: config.clamped(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create an optimizer with a caller-supplied principle list
    pub fn with_principles(config: OptimizerConfig, principles: Vec<DharmicPrinciple>) -> Self {
        Self {
            principles,
            classifier: GunaClassifier::new(),
            config: config.clamped(),
            rng: StdRng::from_entropy(),
        }
    }

    /// The configured principles
    pub fn principles(&self) -> &[DharmicPrinciple] {
        &self.principles
    }

    /// Rank the candidates and select one
    ///
    /// Fails with [`DharmaError::EmptyCandidates`] on an empty input; this is
    /// the one hard precondition in the engine.
    pub fn optimize(&mut self, candidates: &[CandidateAction]) -> Result<OptimizationOutcome> {
        if candidates.is_empty() {
            return Err(DharmaError::EmptyCandidates);
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|candidate| self.score_candidate(candidate))
            .collect();

        // Minimum-fitness filter, falling back to the unfiltered set so a
        // non-empty input never produces an empty selection pool
        if self.config.minimum_fitness > 0.0 {
            let surviving: Vec<RankedCandidate> = ranked
                .iter()
                .filter(|r| r.fitness >= self.config.minimum_fitness)
                .cloned()
                .collect();
            if !surviving.is_empty() {
                ranked = surviving;
            }
        }

        ranked.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let (selected, selection_reasoning) = if self.config.temperature > 0.0 {
            let index = self.sample_boltzmann(&ranked);
            let chosen = ranked[index].clone();
            let reasoning = format!(
                "Sampled '{}' (fitness {:.2}) from {} candidate(s) at temperature {:.2}",
                chosen.candidate.id,
                chosen.fitness,
                ranked.len(),
                self.config.temperature
            );
            (chosen, reasoning)
        } else {
            let chosen = ranked[0].clone();
            let reasoning = format!(
                "Selected '{}' deterministically: highest fitness {:.2} of {} candidate(s)",
                chosen.candidate.id,
                chosen.fitness,
                ranked.len()
            );
            (chosen, reasoning)
        };

        debug!(
            selected = %selected.candidate.id,
            fitness = selected.fitness,
            pool = ranked.len(),
            "optimization complete"
        );

        Ok(OptimizationOutcome {
            ranked,
            selected,
            selection_reasoning,
        })
    }

    fn score_candidate(&self, candidate: &CandidateAction) -> RankedCandidate {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for principle in &self.principles {
            weighted_sum += principle.weight * principle.score(&candidate.features);
            weight_total += principle.weight;
        }

        let base_fitness = if weight_total > 0.0 {
            clamp01(weighted_sum / weight_total)
        } else {
            0.0
        };

        let classification = self.classifier.classify(&candidate.features);
        let guna_adjustment = self.config.sattva_bonus * classification.scores.sattva
            - self.config.tamas_penalty * classification.scores.tamas;
        let mut fitness = clamp01(base_fitness + guna_adjustment);

        let svadharma_matched = match (&self.config.duty_context, &candidate.svadharma) {
            (Some(context), Some(declared)) => context == declared,
            _ => false,
        };
        if svadharma_matched {
            fitness = clamp01(fitness + self.config.svadharma_bonus);
        }

        RankedCandidate {
            candidate: candidate.clone(),
            fitness,
            base_fitness,
            guna_adjustment,
            guna: classification.primary,
            svadharma_matched,
        }
    }

    /// Boltzmann sampling: exp(fitness / temperature) normalized into a
    /// cumulative distribution, sampled with a single uniform draw
    fn sample_boltzmann(&mut self, ranked: &[RankedCandidate]) -> usize {
        let temperature = self.config.temperature;
        let weights: Vec<f64> = ranked
            .iter()
            .map(|r| (r.fitness / temperature).exp())
            .collect();
        let total: f64 = weights.iter().sum();

        let draw: f64 = self.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                return index;
            }
        }
        ranked.len() - 1
    }
}
