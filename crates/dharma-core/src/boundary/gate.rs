//! Boundary Gate - Permission decisions over the rule set
//!
//! Evaluates an action against every configured rule and produces a
//! permission decision with a prioritized violation list. A single violated
//! rule denies the action regardless of how many other rules pass.

use crate::boundary::{default_rules, BoundaryRule, Recommendation, RuleViolation};
use crate::types::{clamp01, ConstrainedAction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the boundary gate
///
/// Thresholds are clamped to `[0,1]` at construction rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Compliance score at or above which a clean action may proceed
    pub proceed_threshold: f64,

    /// Compliance score at or above which a clean action proceeds with caution
    pub caution_threshold: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            proceed_threshold: 0.6,
            caution_threshold: 0.3,
        }
    }
}

impl BoundaryConfig {
    fn clamped(self) -> Self {
        Self {
            proceed_threshold: clamp01(self.proceed_threshold),
            caution_threshold: clamp01(self.caution_threshold),
        }
    }
}

/// Result of gating a single action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryDecision {
    /// Identifier of the gated action
    pub action_id: String,

    /// True exactly when the violations list is empty
    pub permitted: bool,

    /// Average compliance over the rules that passed (0 if none passed)
    pub compliance_score: f64,

    /// Violated rules, in evaluation (descending priority) order
    pub violations: Vec<RuleViolation>,

    /// Identifiers of the rules that passed, in evaluation order
    pub passed: Vec<String>,

    /// Recommendation ladder outcome
    pub recommendation: Recommendation,

    /// Free-text summary of the decision
    pub reasoning: String,
}

/// Boundary gate over an ordered rule set
///
/// Rules are kept sorted by descending priority; adding a rule at runtime
/// re-sorts the list. A single logical owner per instance is assumed.
#[derive(Debug, Clone)]
pub struct DharmaBoundary {
    rules: Vec<BoundaryRule>,
    config: BoundaryConfig,
}

impl Default for DharmaBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl DharmaBoundary {
    /// Create a gate with the default rule set
    pub fn new() -> Self {
        Self::with_rules(BoundaryConfig::default(), Vec::new())
    }

    /// Create a gate with custom thresholds and additional rules
    ///
    /// Caller-supplied rules merge with the defaults; the combined list is
    /// sorted by descending priority.
    pub fn with_rules(config: BoundaryConfig, extra_rules: Vec<BoundaryRule>) -> Self {
        let mut rules = default_rules();
        rules.extend(extra_rules);
        sort_rules(&mut rules);

        Self {
            rules,
            config: config.clamped(),
        }
    }

    /// Add a rule at runtime; the rule list is re-sorted by priority
    pub fn add_rule(&mut self, rule: BoundaryRule) {
        self.rules.push(rule);
        sort_rules(&mut self.rules);
    }

    /// The configured rules, in evaluation order
    pub fn rules(&self) -> &[BoundaryRule] {
        &self.rules
    }

    /// Evaluate an action against every rule
    pub fn evaluate(&self, action: &ConstrainedAction) -> BoundaryDecision {
        let mut violations = Vec::new();
        let mut passed = Vec::new();
        let mut compliance_sum = 0.0;
        let mut passed_count = 0usize;

        for rule in &self.rules {
            if rule.is_violated(action) {
                violations.push(RuleViolation {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    priority: rule.priority,
                    gita_reference: rule.gita_reference.clone(),
                    message: format!(
                        "{} crossed the {} ({})",
                        action.id, rule.name, rule.gita_reference
                    ),
                });
            } else {
                compliance_sum += rule.compliance(action);
                passed_count += 1;
                passed.push(rule.id.clone());
            }
        }

        // Average over passed rules only; violated rules are never scored
        let compliance_score = if passed_count > 0 {
            compliance_sum / passed_count as f64
        } else {
            0.0
        };

        let permitted = violations.is_empty();

        let recommendation = if !permitted {
            Recommendation::Deny
        } else if compliance_score >= self.config.proceed_threshold {
            Recommendation::Proceed
        } else if compliance_score >= self.config.caution_threshold {
            Recommendation::Caution
        } else {
            Recommendation::Deny
        };

        let reasoning = if permitted {
            format!(
                "All {} rules passed with average compliance {:.2}; recommendation: {}",
                passed_count, compliance_score, recommendation
            )
        } else {
            format!(
                "{} rule(s) violated, highest priority: {} (priority {}); action denied",
                violations.len(),
                violations[0].rule_name,
                violations[0].priority
            )
        };

        debug!(
            action_id = %action.id,
            permitted,
            compliance_score,
            violations = violations.len(),
            "boundary decision"
        );

        BoundaryDecision {
            action_id: action.id.clone(),
            permitted,
            compliance_score,
            violations,
            passed,
            recommendation,
            reasoning,
        }
    }
}

fn sort_rules(rules: &mut [BoundaryRule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
}
