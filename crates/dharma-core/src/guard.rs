//! Adharma Guard - Pattern heuristics over action descriptions
//!
//! Scans free-text action descriptions for markers of adharmic intent
//! (deception, irreversible harm, manipulation, scope creep) before any
//! scoring happens. A cheap first line of defense; the boundary gate remains
//! the authoritative permission check.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PATTERNS: Vec<(&'static str, Regex, f64)> = vec![
        (
            "Irreversible Harm",
            Regex::new(r"(?i)\b(rm -rf|drop table|wipe|destroy|delete (?:all|every))\b").unwrap(),
            1.0
        ),
        (
            "Deception Marker",
            Regex::new(r"(?i)\b(conceal|cover up|mislead|fabricate|pretend(?:ing)? to)\b").unwrap(),
            0.9
        ),
        (
            "Manipulation",
            Regex::new(r"(?i)\b(coerce|manipulate|pressure (?:him|her|them|users?) into)\b")
                .unwrap(),
            0.8
        ),
        (
            "Credential Exposure",
            Regex::new(r"(?i)\b(exfiltrate|leak (?:the )?(?:keys?|secrets?|credentials?))\b")
                .unwrap(),
            0.9
        ),
        (
            "Scope Creep",
            Regex::new(r"(?i)\b(while (?:i'm|we're) at it|went ahead and also|beyond the request)\b")
                .unwrap(),
            0.4
        ),
    ];
}

/// Result of scanning one description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardReport {
    /// True when no pattern matched
    pub is_safe: bool,

    /// Names of the matched patterns with context
    pub threats: Vec<String>,

    /// Accumulated risk, capped at 1.0
    pub risk_score: f64,
}

/// Adharma guard
#[derive(Debug)]
pub struct AdharmaGuard;

impl AdharmaGuard {
    /// Scan a description against the static pattern battery
    pub fn scan(description: &str) -> GuardReport {
        let mut threats = Vec::new();
        let mut total_risk = 0.0;

        for (name, regex, severity) in PATTERNS.iter() {
            if regex.is_match(description) {
                threats.push(format!("{} detected in action description", name));
                total_risk += severity;
            }
        }

        GuardReport {
            is_safe: threats.is_empty(),
            threats,
            risk_score: total_risk.min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_description_is_safe() {
        let report = AdharmaGuard::scan("Refactor the parser module and add tests");
        assert!(report.is_safe);
        assert!(report.threats.is_empty());
        assert_eq!(report.risk_score, 0.0);
    }

    #[test]
    fn test_destructive_command_flagged() {
        let report = AdharmaGuard::scan("Run rm -rf on the deploy directory to clean up");
        assert!(!report.is_safe);
        assert_eq!(report.risk_score, 1.0);
        assert!(report.threats[0].contains("Irreversible Harm"));
    }

    #[test]
    fn test_deception_flagged() {
        let report = AdharmaGuard::scan("Conceal the failing benchmark from the report");
        assert!(!report.is_safe);
        assert!(report.threats.iter().any(|t| t.contains("Deception")));
    }

    #[test]
    fn test_risk_capped_at_one() {
        let report =
            AdharmaGuard::scan("Wipe the logs, conceal the evidence and manipulate the reviewer");
        assert!(!report.is_safe);
        assert!(report.threats.len() >= 3);
        assert_eq!(report.risk_score, 1.0);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let report = AdharmaGuard::scan("DROP TABLE users");
        assert!(!report.is_safe);
    }
}
