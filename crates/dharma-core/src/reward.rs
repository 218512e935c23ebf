//! Nishkama Reward Shaper - Process-quality damping of external rewards
//!
//! Wraps an externally supplied reward function and blends its output with a
//! process-quality score derived from the action's feature vector. The blend
//! coefficient lambda interpolates between conventional reinforcement
//! (lambda = 0, the reward passes through untouched) and pure nishkama karma
//! (lambda = 1, the external reward is irrelevant and quality alone
//! determines the shaped value).

use crate::types::{clamp01, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// External reward function over environment states and an action
pub type RewardFn<S, A> = Box<dyn Fn(&S, &A, &S) -> f64 + Send + Sync>;

/// Process-quality function over a feature vector
pub type QualityFn = Arc<dyn Fn(&FeatureVector) -> f64 + Send + Sync>;

/// Configuration for the reward shaper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Blend coefficient lambda in `[0,1]`: 0 = conventional, 1 = pure nishkama
    pub process_weight: f64,

    /// Lower bound of the wrapped reward function's range
    pub reward_min: f64,

    /// Upper bound of the wrapped reward function's range
    pub reward_max: f64,

    /// Process quality at or above which the action is recommended,
    /// independent of the reward value
    pub recommendation_threshold: f64,

    /// Floor the shaped reward at zero for high-quality actions
    pub protect_high_quality: bool,

    /// Quality level at or above which the zero floor applies
    pub quality_floor: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            process_weight: 0.5,
            reward_min: -1.0,
            reward_max: 1.0,
            recommendation_threshold: 0.3,
            protect_high_quality: true,
            quality_floor: 0.7,
        }
    }
}

impl RewardConfig {
    fn clamped(self) -> Self {
        Self {
            process_weight: clamp01(self.process_weight),
            recommendation_threshold: clamp01(self.recommendation_threshold),
            quality_floor: clamp01(self.quality_floor),
            ..self
        }
    }
}

/// Result of reshaping one reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedReward {
    /// Raw output of the wrapped reward function
    pub original_reward: f64,

    /// Process quality of the action in `[0,1]`
    pub process_quality: f64,

    /// Reward after damping, rescaled back into the configured range
    pub modified_reward: f64,

    /// The multiplicative damping factor `(1 - lambda) + lambda * quality`
    pub damping_factor: f64,

    /// Whether process quality met the recommendation threshold
    pub recommended: bool,

    /// Free-text summary of the reshaping
    pub reasoning: String,
}

/// Nishkama reward shaper over state type `S` and action type `A`
pub struct NishkamaRewardShaper<S, A> {
    reward_fn: RewardFn<S, A>,
    quality_fn: QualityFn,
    config: RewardConfig,
}

impl<S, A> fmt::Debug for NishkamaRewardShaper<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NishkamaRewardShaper")
            .field("config", &self.config)
            .finish()
    }
}

impl<S, A> NishkamaRewardShaper<S, A> {
    /// Create a shaper with the default quality function
    pub fn new(config: RewardConfig, reward_fn: RewardFn<S, A>) -> Self {
        Self {
            reward_fn,
            quality_fn: Arc::new(default_quality),
            config: config.clamped(),
        }
    }

    /// Create a shaper with a custom quality function
    pub fn with_quality_fn(
        config: RewardConfig,
        reward_fn: RewardFn<S, A>,
        quality_fn: QualityFn,
    ) -> Self {
        Self {
            reward_fn,
            quality_fn,
            config: config.clamped(),
        }
    }

    /// Conventional preset: lambda = 0, reshaping is a no-op
    ///
    /// The high-quality floor is disabled so the identity holds for every
    /// input, negative rewards included.
    pub fn conventional(reward_fn: RewardFn<S, A>) -> Self {
        Self::new(
            RewardConfig {
                process_weight: 0.0,
                protect_high_quality: false,
                ..RewardConfig::default()
            },
            reward_fn,
        )
    }

    /// Pure nishkama preset: lambda = 1, no external reward function at all
    ///
    /// The internal reward is pinned at the configured maximum, so process
    /// quality alone determines the shaped value.
    pub fn pure_nishkama() -> Self {
        let config = RewardConfig {
            process_weight: 1.0,
            ..RewardConfig::default()
        };
        let max = config.reward_max;
        Self::new(config, Box::new(move |_, _, _| max))
    }

    /// The configured parameters
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reshape one reward
    pub fn compute(
        &self,
        state: &S,
        action: &A,
        next_state: &S,
        features: &FeatureVector,
    ) -> ShapedReward {
        let original_reward = (self.reward_fn)(state, action, next_state);
        let process_quality = clamp01((self.quality_fn)(features));

        let span = self.config.reward_max - self.config.reward_min;

        // Linear rescale into [-1, 1]; a degenerate range maps to 0
        let normalized = if span > 0.0 {
            ((original_reward - self.config.reward_min) / span) * 2.0 - 1.0
        } else {
            0.0
        };

        let lambda = self.config.process_weight;
        let damping_factor = (1.0 - lambda) + lambda * process_quality;
        let mut damped = normalized * damping_factor;

        // A high-quality action never receives a negative shaped reward
        if self.config.protect_high_quality
            && process_quality >= self.config.quality_floor
            && damped < 0.0
        {
            damped = 0.0;
        }

        let modified_reward = if span > 0.0 {
            ((damped + 1.0) / 2.0) * span + self.config.reward_min
        } else {
            self.config.reward_min
        };

        let recommended = process_quality >= self.config.recommendation_threshold;

        let reasoning = format!(
            "Reward {:.3} damped by factor {:.3} (lambda {:.2}, quality {:.2}) to {:.3}; {}",
            original_reward,
            damping_factor,
            lambda,
            process_quality,
            modified_reward,
            if recommended {
                "action recommended on process quality"
            } else {
                "action not recommended"
            }
        );

        ShapedReward {
            original_reward,
            process_quality,
            modified_reward,
            damping_factor,
            recommended,
            reasoning,
        }
    }
}

/// Default process-quality function
///
/// Six-term weighted average in the same shape as the evaluator's principle
/// formulas, with its own independent weight set.
pub fn default_quality(features: &FeatureVector) -> f64 {
    let ahimsa = 0.8 * (1.0 - features.harm_potential) + 0.2 * (1.0 - features.deception());
    let satya = 0.6 * features.transparency + 0.4 * (1.0 - features.deception());
    let nishkama = 0.7 * (1.0 - features.attachment) + 0.3 * (1.0 - features.agitation);
    let viveka = 0.6 * features.deliberation + 0.4 * features.consistency;
    let seva = 0.6 * features.altruism + 0.4 * features.effort;
    let consistency = features.consistency;

    clamp01(
        0.25 * ahimsa
            + 0.20 * satya
            + 0.20 * nishkama
            + 0.15 * viveka
            + 0.10 * seva
            + 0.10 * consistency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opaque environment state for tests
    #[derive(Debug, Clone, Copy)]
    struct GridState(i32);

    fn high_quality_features() -> FeatureVector {
        FeatureVector {
            altruism: 0.9,
            deliberation: 0.9,
            attachment: 0.05,
            agitation: 0.05,
            transparency: 0.95,
            effort: 0.8,
            harm_potential: 0.0,
            consistency: 0.9,
            ..FeatureVector::default()
        }
    }

    fn low_quality_features() -> FeatureVector {
        FeatureVector {
            attachment: 0.9,
            agitation: 0.9,
            harm_potential: 0.9,
            ..FeatureVector::default()
        }
        .with_deception(0.9)
    }

    #[test]
    fn test_conventional_is_identity() {
        let shaper: NishkamaRewardShaper<GridState, &str> =
            NishkamaRewardShaper::conventional(Box::new(|s: &GridState, _, n: &GridState| {
                (n.0 - s.0) as f64 / 10.0
            }));

        for reward_step in [-9, -3, 0, 4, 9] {
            let result = shaper.compute(
                &GridState(0),
                &"move",
                &GridState(reward_step),
                &low_quality_features(),
            );
            assert!((result.modified_reward - result.original_reward).abs() < 1e-9);
            assert!((result.damping_factor - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pure_nishkama_ignores_reward_signal() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::pure_nishkama();

        let high = shaper.compute(
            &GridState(0),
            &"act",
            &GridState(100),
            &high_quality_features(),
        );
        let low = shaper.compute(
            &GridState(0),
            &"act",
            &GridState(-100),
            &high_quality_features(),
        );

        // Same features, same shaped reward, whatever the environment did
        assert!((high.modified_reward - low.modified_reward).abs() < 1e-9);
        assert!((high.damping_factor - high.process_quality).abs() < 1e-9);
    }

    #[test]
    fn test_low_quality_dampens_reward() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig::default(),
            Box::new(|_, _, _| 1.0),
        );

        let good = shaper.compute(&GridState(0), &"a", &GridState(1), &high_quality_features());
        let bad = shaper.compute(&GridState(0), &"a", &GridState(1), &low_quality_features());

        assert!(good.modified_reward > bad.modified_reward);
        assert!(bad.damping_factor < good.damping_factor);
    }

    #[test]
    fn test_high_quality_floor_blocks_negative_reward() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig {
                process_weight: 0.5,
                ..RewardConfig::default()
            },
            Box::new(|_, _, _| -1.0),
        );

        let result = shaper.compute(&GridState(0), &"a", &GridState(1), &high_quality_features());

        // Normalized floor of 0.0 rescales to the midpoint of [-1, 1]
        assert!(result.modified_reward >= 0.0);
    }

    #[test]
    fn test_floor_disabled_passes_negative_through() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig {
                process_weight: 0.5,
                protect_high_quality: false,
                ..RewardConfig::default()
            },
            Box::new(|_, _, _| -1.0),
        );

        let result = shaper.compute(&GridState(0), &"a", &GridState(1), &high_quality_features());
        assert!(result.modified_reward < 0.0);
    }

    #[test]
    fn test_recommendation_independent_of_reward() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig::default(),
            Box::new(|_, _, _| -1.0),
        );

        let result = shaper.compute(&GridState(0), &"a", &GridState(1), &high_quality_features());
        assert!(result.recommended);

        let result = shaper.compute(&GridState(0), &"a", &GridState(1), &low_quality_features());
        assert!(!result.recommended);
    }

    #[test]
    fn test_custom_reward_range_rescaling() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig {
                process_weight: 0.0,
                reward_min: 0.0,
                reward_max: 10.0,
                ..RewardConfig::default()
            },
            Box::new(|_, _, _| 7.5),
        );

        let result = shaper.compute(&GridState(0), &"a", &GridState(1), &low_quality_features());
        assert!((result.modified_reward - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_default_quality_bounds() {
        assert!((default_quality(&high_quality_features()) - 1.0).abs() < 0.15);
        assert!(default_quality(&low_quality_features()) < 0.35);

        let perfect = FeatureVector {
            altruism: 1.0,
            deliberation: 1.0,
            transparency: 1.0,
            effort: 1.0,
            consistency: 1.0,
            ..FeatureVector::default()
        };
        assert!((default_quality(&perfect) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lambda_clamped() {
        let shaper: NishkamaRewardShaper<GridState, &str> = NishkamaRewardShaper::new(
            RewardConfig {
                process_weight: 3.0,
                ..RewardConfig::default()
            },
            Box::new(|_, _, _| 0.0),
        );
        assert_eq!(shaper.config().process_weight, 1.0);
    }
}
