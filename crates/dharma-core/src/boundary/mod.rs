//! Dharmic Boundaries - Hard permission gating of actions
//!
//! A boundary rule pairs a binary violation predicate with a compliance
//! scoring function. The gate evaluates rules in descending priority order
//! and denies an action if any single rule is violated; priority affects
//! evaluation order only, never the permission logic itself.

pub mod gate;

use crate::types::{clamp01, ConstrainedAction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use gate::{BoundaryConfig, BoundaryDecision, DharmaBoundary};

/// Violation predicate of a boundary rule
pub type ViolationFn = Arc<dyn Fn(&ConstrainedAction) -> bool + Send + Sync>;

/// Compliance scoring function of a boundary rule
pub type ComplianceFn = Arc<dyn Fn(&ConstrainedAction) -> f64 + Send + Sync>;

/// A named, prioritized boundary constraint
///
/// Rules are pure predicates over an action record; they carry no state.
#[derive(Clone)]
pub struct BoundaryRule {
    /// Stable identifier, suitable for external verse lookup
    pub id: String,

    /// Display name
    pub name: String,

    /// Scriptural grounding label
    pub gita_reference: String,

    /// Priority 1-5; higher priorities are evaluated first
    pub priority: u8,

    is_violated: ViolationFn,
    compliance_score: ComplianceFn,
}

impl BoundaryRule {
    /// Create a new boundary rule
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gita_reference: impl Into<String>,
        priority: u8,
        is_violated: ViolationFn,
        compliance_score: ComplianceFn,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gita_reference: gita_reference.into(),
            priority: priority.clamp(1, 5),
            is_violated,
            compliance_score,
        }
    }

    /// Run the violation predicate
    pub fn is_violated(&self, action: &ConstrainedAction) -> bool {
        (self.is_violated)(action)
    }

    /// Run the compliance scoring function, clamped to `[0,1]`
    pub fn compliance(&self, action: &ConstrainedAction) -> f64 {
        clamp01((self.compliance_score)(action))
    }
}

impl fmt::Debug for BoundaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryRule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A structured record of one violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    /// Identifier of the violated rule
    pub rule_id: String,

    /// Display name of the violated rule
    pub rule_name: String,

    /// Rule priority at evaluation time
    pub priority: u8,

    /// Scriptural grounding label
    pub gita_reference: String,

    /// Human-readable violation message
    pub message: String,
}

/// Gate recommendation ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    /// Compliance comfortably above the proceed threshold
    Proceed,

    /// Compliance in the caution band
    Caution,

    /// Violated rule, or compliance below the caution threshold
    Deny,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Proceed => "proceed",
            Recommendation::Caution => "caution",
            Recommendation::Deny => "deny",
        };
        write!(f, "{}", s)
    }
}

/// The default boundary rule set
///
/// The svadharma role-scope rule is an intentional stub: its violation
/// predicate always returns false, pending application-specific logic, and it
/// contributes a fixed neutral compliance score to the average.
pub fn default_rules() -> Vec<BoundaryRule> {
    vec![
        BoundaryRule::new(
            "ahimsa-boundary",
            "Ahimsa Boundary",
            "BG 16.2",
            5,
            Arc::new(|a: &ConstrainedAction| a.harm() > 0.7),
            Arc::new(|a: &ConstrainedAction| 1.0 - a.harm()),
        ),
        BoundaryRule::new(
            "satya-boundary",
            "Satya Boundary",
            "BG 17.15",
            4,
            Arc::new(|a: &ConstrainedAction| a.deception() > 0.5),
            Arc::new(|a: &ConstrainedAction| 1.0 - a.deception()),
        ),
        BoundaryRule::new(
            "aparigraha-boundary",
            "Aparigraha Boundary",
            "BG 6.10",
            3,
            Arc::new(|a: &ConstrainedAction| a.resources() > 0.8),
            Arc::new(|a: &ConstrainedAction| 1.0 - a.resources()),
        ),
        BoundaryRule::new(
            "samyama-boundary",
            "Samyama Boundary",
            "BG 2.64",
            2,
            Arc::new(|a: &ConstrainedAction| {
                a.features.agitation > 0.85 && a.features.deliberation < 0.2
            }),
            Arc::new(|a: &ConstrainedAction| {
                0.5 * (1.0 - a.features.agitation) + 0.5 * a.features.deliberation
            }),
        ),
        BoundaryRule::new(
            "svadharma-scope",
            "Svadharma Scope",
            "BG 3.35",
            1,
            Arc::new(|_: &ConstrainedAction| false),
            Arc::new(|_: &ConstrainedAction| 0.8),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureVector;

    #[test]
    fn test_default_rules_ordering_keys() {
        let rules = default_rules();
        assert_eq!(rules.len(), 5);

        let priorities: Vec<u8> = rules.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_ahimsa_rule_triggers_on_high_harm() {
        let rules = default_rules();
        let ahimsa = rules.iter().find(|r| r.id == "ahimsa-boundary").unwrap();

        let harmful =
            ConstrainedAction::new("a", "wipe data", FeatureVector::default()).with_harm(0.9);
        assert!(ahimsa.is_violated(&harmful));

        let benign =
            ConstrainedAction::new("b", "read file", FeatureVector::default()).with_harm(0.1);
        assert!(!ahimsa.is_violated(&benign));
        assert!((ahimsa.compliance(&benign) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_svadharma_stub_never_violates() {
        let rules = default_rules();
        let stub = rules.iter().find(|r| r.id == "svadharma-scope").unwrap();

        let extreme = ConstrainedAction::new(
            "x",
            "anything at all",
            FeatureVector {
                harm_potential: 1.0,
                agitation: 1.0,
                ..FeatureVector::default()
            },
        )
        .with_harm(1.0)
        .with_deception(1.0)
        .with_resources(1.0);

        assert!(!stub.is_violated(&extreme));
        assert!((stub.compliance(&extreme) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_rule_priority_clamped() {
        let rule = BoundaryRule::new(
            "p",
            "P",
            "BG 0.0",
            9,
            Arc::new(|_| false),
            Arc::new(|_| 0.5),
        );
        assert_eq!(rule.priority, 5);
    }

    #[test]
    fn test_compliance_clamped() {
        let rule = BoundaryRule::new(
            "c",
            "C",
            "BG 0.0",
            3,
            Arc::new(|_| false),
            Arc::new(|_| 1.8),
        );

        let action = ConstrainedAction::new("a", "x", FeatureVector::default());
        assert_eq!(rule.compliance(&action), 1.0);
    }
}
