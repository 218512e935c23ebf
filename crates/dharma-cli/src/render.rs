//! Terminal rendering of reports and decisions

use colored::Colorize;
use dharma_core::audit::{AlignmentReport, AuditVerdict, FlagSeverity};
use dharma_core::boundary::{BoundaryDecision, Recommendation};
use dharma_core::principles::EvaluationResult;
use dharma_core::types::AlignmentLevel;
use dharma_core::verses::Verse;
use std::fmt::Write;

fn colorize_verdict(verdict: AuditVerdict) -> String {
    let label = verdict.to_string().to_uppercase();
    match verdict {
        AuditVerdict::Aligned => label.green().bold().to_string(),
        AuditVerdict::NeedsReview => label.yellow().bold().to_string(),
        AuditVerdict::Misaligned => label.red().bold().to_string(),
        AuditVerdict::Critical => label.red().bold().reversed().to_string(),
    }
}

fn colorize_level(level: AlignmentLevel) -> String {
    let label = level.to_string();
    match level {
        AlignmentLevel::High => label.green().to_string(),
        AlignmentLevel::Medium => label.normal().to_string(),
        AlignmentLevel::Low => label.yellow().to_string(),
        AlignmentLevel::Critical => label.red().to_string(),
    }
}

/// Render a full alignment report
pub fn render_report(report: &AlignmentReport) -> String {
    let mut out = String::new();
    let s = &report.statistics;

    let _ = writeln!(out, "KARMIC AUDIT {}", report.report_id);
    let _ = writeln!(out, "VERDICT: {}", colorize_verdict(report.verdict));
    let _ = writeln!(out, "ACTIONS AUDITED: {}", report.action_count);
    let _ = writeln!(
        out,
        "SCORES: mean {:.2} | median {:.2} | std-dev {:.2} | min {:.2} | max {:.2}",
        s.mean, s.median, s.std_dev, s.min, s.max
    );
    let _ = writeln!(
        out,
        "DYNAMICS: drift {:.2} | trend {:+.2} | aligned {:.0}% | critical {:.0}%",
        s.drift_index, s.trend, s.aligned_percent, s.critical_percent
    );

    if !report.agent_summaries.is_empty() {
        let _ = writeln!(out, "\nAGENTS:");
        for summary in &report.agent_summaries {
            let _ = writeln!(
                out,
                "  {} - {} action(s), mean {:.2}, level {}",
                summary.agent,
                summary.action_count,
                summary.mean_score,
                colorize_level(summary.level)
            );
        }
    }

    if !report.flagged.is_empty() {
        let _ = writeln!(out, "\nFLAGGED:");
        for flag in &report.flagged {
            let marker = match flag.severity {
                FlagSeverity::Critical => "!!".red().bold().to_string(),
                FlagSeverity::Violation => "! ".yellow().to_string(),
                FlagSeverity::Warning => "? ".normal().to_string(),
            };
            let _ = writeln!(
                out,
                "  {} {} ({:.2}) - {}",
                marker, flag.action_id, flag.score, flag.reason
            );
        }
    }

    if !report.patterns.is_empty() {
        let _ = writeln!(out, "\nPATTERNS:");
        for pattern in &report.patterns {
            let _ = writeln!(out, "  - {}", pattern);
        }
    }

    let _ = writeln!(out, "\nRECOMMENDATIONS:");
    for recommendation in &report.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }

    if !report.principle_breakdown.is_empty() {
        let _ = writeln!(out, "\nPRINCIPLES:");
        for (principle, score) in &report.principle_breakdown {
            let _ = writeln!(out, "  {:<14} {:.2}", principle, score);
        }
    }

    out
}

/// Render a single evaluation result
pub fn render_evaluation(result: &EvaluationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "ACTION: {} - {}", result.action.id, result.action.description);
    let _ = writeln!(
        out,
        "COMPOSITE: {:.2} ({}, {})",
        result.composite_score,
        colorize_level(result.level),
        if result.is_aligned { "aligned".green().to_string() } else { "not aligned".red().to_string() }
    );

    let _ = writeln!(out, "\nPRINCIPLES:");
    for principle in &result.principle_scores {
        let _ = writeln!(
            out,
            "  {:<30} {:.2}  (weight {:.2}, {})",
            principle.name, principle.score, principle.weight, principle.gita_reference
        );
    }

    for violation in &result.violations {
        let _ = writeln!(out, "{} {}", "VIOLATION:".red(), violation);
    }
    for commendation in &result.commendations {
        let _ = writeln!(out, "{} {}", "COMMENDATION:".green(), commendation);
    }

    let _ = writeln!(out, "\n{}", result.reasoning);
    out
}

/// Render a boundary decision
pub fn render_decision(decision: &BoundaryDecision) -> String {
    let mut out = String::new();

    let status = if decision.permitted {
        "PERMITTED".green().bold().to_string()
    } else {
        "DENIED".red().bold().to_string()
    };

    let _ = writeln!(out, "ACTION: {}", decision.action_id);
    let _ = writeln!(out, "STATUS: {}", status);
    let _ = writeln!(out, "COMPLIANCE: {:.2}", decision.compliance_score);
    let recommendation = match decision.recommendation {
        Recommendation::Proceed => "proceed".green().to_string(),
        Recommendation::Caution => "caution".yellow().to_string(),
        Recommendation::Deny => "deny".red().to_string(),
    };
    let _ = writeln!(out, "RECOMMENDATION: {}", recommendation);

    if !decision.violations.is_empty() {
        let _ = writeln!(out, "\nVIOLATIONS:");
        for violation in &decision.violations {
            let _ = writeln!(
                out,
                "  [{}] {} ({}) - {}",
                violation.priority, violation.rule_name, violation.gita_reference, violation.message
            );
        }
    }

    let _ = writeln!(out, "\n{}", decision.reasoning);
    out
}

/// Render a verse listing
pub fn render_verses(verses: &[&Verse]) -> String {
    let mut out = String::new();
    for verse in verses {
        let _ = writeln!(out, "{}  [{}]", verse.reference.bold(), verse.topics.join(", "));
        let _ = writeln!(out, "  {}", verse.translation);
    }
    out
}
