//! Dharma Core - Gita-grounded scoring and auditing of AI agent actions
//!
//! Dharma Core evaluates structured descriptions of agent behavior (feature
//! vectors in `[0,1]`) against configurable weighted criteria drawn from the
//! Bhagavad Gita's framework of righteous action, producing scalar scores,
//! categorical labels, and aggregate statistical reports.
//!
//! # Architecture
//!
//! The engine is a pipeline of small, pure components:
//!
//! 1. **Guna Classifier** (`classifier`): sattva/rajas/tamas classification via
//!    weighted linear scoring and softmax normalization
//! 2. **Principle Scorer** (`principles`): composite alignment scoring against
//!    five weighted dharmic principles
//! 3. **Boundary Gate** (`boundary`): hard permission gating against
//!    prioritized violation rules
//! 4. **Karma Optimizer** (`optimizer`): fitness-based ranking and selection
//!    among candidate actions
//! 5. **Reward Shaper** (`reward`): process-quality damping of external
//!    reward signals (nishkama karma)
//! 6. **Karmic Auditor** (`audit`): sequence-level statistics, drift and
//!    trend analysis, verdicts and recommendations
//!
//! Alongside the pipeline sit three collaborators: a static verse database
//! (`verses`), an append-only action/consequence log (`karma_log`), and a
//! regex pattern guard (`guard`).
//!
//! # Quick Start
//!
//! ```
//! use dharma_core::principles::DharmicEvaluator;
//! use dharma_core::types::{EvaluatedAction, FeatureVector};
//!
//! let evaluator = DharmicEvaluator::new();
//!
//! let action = EvaluatedAction::new(
//!     "act_1",
//!     "Disclosed a regression and shipped the fix",
//!     FeatureVector {
//!         altruism: 0.9,
//!         deliberation: 0.85,
//!         transparency: 0.95,
//!         effort: 0.8,
//!         consistency: 0.9,
//!         ..FeatureVector::default()
//!     },
//! );
//!
//! let result = evaluator.evaluate(&action);
//! assert!(result.is_aligned);
//! println!("Composite score: {:.2} ({})", result.composite_score, result.level);
//! ```
//!
//! # Design Principles
//!
//! 1. **Purity**: every public operation is a synchronous function of its
//!    inputs and immutable configuration; no hidden state, no I/O
//! 2. **Clamp, don't reject**: out-of-range weights and thresholds are
//!    clamped to `[0,1]` at construction
//! 3. **Degenerate inputs are defined**: empty sequences audit to a zero
//!    report, zero-weight averages are 0, never NaN
//! 4. **Serializable results**: every report embeds value copies, so it
//!    round-trips through JSON without live references

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, missing_debug_implementations)]

pub mod audit;
pub mod boundary;
pub mod classifier;
pub mod error;
pub mod guard;
pub mod karma_log;
pub mod optimizer;
pub mod principles;
pub mod reward;
pub mod types;
pub mod verses;

// Re-export commonly used types for convenience
pub use audit::{AlignmentReport, AuditLogEntry, AuditVerdict, KarmicAuditor};
pub use boundary::{BoundaryDecision, BoundaryRule, DharmaBoundary, Recommendation};
pub use classifier::{Guna, GunaClassification, GunaClassifier};
pub use error::{DharmaError, Result};
pub use guard::{AdharmaGuard, GuardReport};
pub use karma_log::{KarmaEvent, KarmaLog};
pub use optimizer::{KarmaOptimizer, OptimizationOutcome};
pub use principles::{DharmicEvaluator, DharmicPrinciple, EvaluationResult};
pub use reward::{NishkamaRewardShaper, ShapedReward};
pub use types::{
    AlignmentLevel, CandidateAction, ConstrainedAction, EvaluatedAction, FeatureVector, Timestamp,
};
pub use verses::{Verse, VerseDatabase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_classifier_and_evaluator_agree_on_character() {
        let features = FeatureVector {
            altruism: 0.9,
            deliberation: 0.9,
            attachment: 0.05,
            agitation: 0.05,
            transparency: 0.9,
            effort: 0.8,
            harm_potential: 0.0,
            consistency: 0.9,
            ..FeatureVector::default()
        };

        let classification = GunaClassifier::new().classify(&features);
        assert_eq!(classification.primary, Guna::Sattva);

        let action = EvaluatedAction::new("act_1", "exemplary conduct", features);
        let evaluation = DharmicEvaluator::new().evaluate(&action);
        assert!(evaluation.is_aligned);
        assert_eq!(evaluation.level, AlignmentLevel::High);
    }

    #[test]
    fn test_gate_and_guard_both_reject_destruction() {
        let features = FeatureVector {
            harm_potential: 0.95,
            ..FeatureVector::default()
        };

        let description = "Wipe the production volume";
        let guard_report = AdharmaGuard::scan(description);
        assert!(!guard_report.is_safe);

        let action = ConstrainedAction::new("act_2", description, features);
        let decision = DharmaBoundary::new().evaluate(&action);
        assert!(!decision.permitted);
    }

    #[test]
    fn test_audit_over_logged_actions() {
        let mut log = KarmaLog::new();
        let good = FeatureVector {
            altruism: 0.8,
            deliberation: 0.8,
            transparency: 0.8,
            effort: 0.7,
            consistency: 0.8,
            ..FeatureVector::default()
        };
        let action_id = log.record_action("helped a user", "agent-1", good.clone());
        log.record_consequence(&action_id, "user unblocked").unwrap();

        let entries: Vec<AuditLogEntry> = log
            .events()
            .iter()
            .filter(|e| e.features.is_some())
            .map(|e| AuditLogEntry {
                id: e.id.clone(),
                description: e.description.clone(),
                agent: e.agent.clone().unwrap_or_default(),
                features: e.features.clone().unwrap(),
                timestamp: e.recorded_at.timestamp_millis(),
                parent_id: e.parent_id.clone(),
                svadharma: None,
            })
            .collect();

        let report = KarmicAuditor::new().audit(&entries);
        assert_eq!(report.action_count, 1);
        assert_eq!(report.verdict, AuditVerdict::Aligned);
    }

    #[test]
    fn test_verses_ground_every_exported_identifier() {
        let db = VerseDatabase::new();
        let evaluator = DharmicEvaluator::new();

        for principle in evaluator.principles() {
            assert!(
                db.lookup(&principle.gita_reference).is_some(),
                "principle {} references an unknown verse {}",
                principle.id,
                principle.gita_reference
            );
        }
    }
}
