//! Karmic Audit - Sequence-level statistical review of agent conduct
//!
//! The auditor consumes an ordered log of action entries, evaluates each one
//! through the principle scorer, and aggregates the results into an
//! [`AlignmentReport`]: summary statistics, per-agent summaries, flagged
//! actions, detected patterns, recommendations, and a top-level verdict.
//!
//! The verdict enum carries the stable exit-code contract consumed by the
//! CLI: aligned 0, needs-review 1, misaligned 2, critical 3.

pub mod auditor;
pub mod stats;

use crate::error::Result;
use crate::principles::EvaluationResult;
use crate::types::{AlignmentLevel, FeatureVector, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use auditor::{AuditorConfig, KarmicAuditor};

/// One entry of the external action log submitted for auditing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Caller-assigned identifier
    pub id: String,

    /// Human-readable description
    pub description: String,

    /// Agent that performed the action
    pub agent: String,

    /// Behavioral features
    pub features: FeatureVector,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Parent action in the consequence chain, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Declared duty context, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svadharma: Option<String>,
}

/// Parse a serialized audit log
///
/// The root must be a JSON array of entries; anything else surfaces the
/// serde shape error to the caller unchanged.
pub fn parse_audit_log(json: &str) -> Result<Vec<AuditLogEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Top-level verdict over an audited sequence
///
/// Exactly four ordered values; the CLI exit-code mapping depends on this
/// enum staying stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditVerdict {
    /// Mean at or above the aligned threshold with no critical actions
    Aligned,

    /// Mean in the review band, or the degenerate empty-log verdict
    NeedsReview,

    /// Mean in the misaligned band
    Misaligned,

    /// Mean below the critical threshold
    Critical,
}

impl AuditVerdict {
    /// Stable process exit code for this verdict
    pub fn exit_code(self) -> i32 {
        match self {
            AuditVerdict::Aligned => 0,
            AuditVerdict::NeedsReview => 1,
            AuditVerdict::Misaligned => 2,
            AuditVerdict::Critical => 3,
        }
    }
}

impl fmt::Display for AuditVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditVerdict::Aligned => "aligned",
            AuditVerdict::NeedsReview => "needs-review",
            AuditVerdict::Misaligned => "misaligned",
            AuditVerdict::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Severity of a flagged action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    /// Score below the critical threshold
    Critical,

    /// Score below the alignment threshold
    Violation,

    /// Flagged for another reason (e.g. not aligned under a custom threshold)
    Warning,
}

/// An action flagged during the audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedAction {
    /// Identifier of the flagged action (value copy for external lookup)
    pub action_id: String,

    /// Description of the flagged action
    pub description: String,

    /// Agent that performed it
    pub agent: String,

    /// Composite score at flag time
    pub score: f64,

    /// Flag severity
    pub severity: FlagSeverity,

    /// Joined violation text, or a default below-threshold message
    pub reason: String,
}

/// Per-agent summary inside a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    /// Agent identifier
    pub agent: String,

    /// Number of audited actions attributed to the agent
    pub action_count: usize,

    /// Mean composite score over the agent's actions
    pub mean_score: f64,

    /// Ordinal level on the per-agent scale (distinct from the per-action scale)
    pub level: AlignmentLevel,

    /// Up to three most frequent violation messages
    pub top_violations: Vec<String>,

    /// Up to three most frequent commendation messages
    pub top_commendations: Vec<String>,
}

/// Summary statistics over the ordered score sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStatistics {
    /// Number of evaluated actions
    pub count: usize,

    /// Arithmetic mean of composite scores
    pub mean: f64,

    /// Median composite score (average of middle two on even counts)
    pub median: f64,

    /// Population standard deviation
    pub std_dev: f64,

    /// Minimum composite score
    pub min: f64,

    /// Maximum composite score
    pub max: f64,

    /// Range of composite scores: max - min
    pub drift_index: f64,

    /// Pearson correlation between sequence position and score
    pub trend: f64,

    /// Percentage of scores at or above the alignment threshold
    pub aligned_percent: f64,

    /// Percentage of scores below the critical threshold
    pub critical_percent: f64,
}

impl SequenceStatistics {
    /// All-zero statistics for an empty sequence
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            drift_index: 0.0,
            trend: 0.0,
            aligned_percent: 0.0,
            critical_percent: 0.0,
        }
    }
}

/// Aggregate report over an audited sequence
///
/// Built fresh per audit call and immutable afterwards. Fully serializable:
/// evaluations embed value copies of their actions, never live references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    /// Report identifier - ar_<uuid>
    pub report_id: String,

    /// When the report was generated
    pub generated_at: Timestamp,

    /// Number of audited actions
    pub action_count: usize,

    /// Summary statistics over the ordered score sequence
    pub statistics: SequenceStatistics,

    /// Top-level verdict
    pub verdict: AuditVerdict,

    /// Per-action evaluations, sorted descending by composite score for display
    pub evaluations: Vec<EvaluationResult>,

    /// Actions flagged for review, in original sequence order
    pub flagged: Vec<FlaggedAction>,

    /// Per-agent summaries, in first-appearance order
    pub agent_summaries: Vec<AgentSummary>,

    /// Detected qualitative patterns
    pub patterns: Vec<String>,

    /// Recommendations; never empty
    pub recommendations: Vec<String>,

    /// Mean sub-score per principle id across all evaluations
    pub principle_breakdown: BTreeMap<String, f64>,
}
