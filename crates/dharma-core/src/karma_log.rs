//! Karma Log - Append-only record of actions and their consequences
//!
//! An in-memory event log linking consequences to the actions that caused
//! them through parent pointers. The log owns its identifier counter; nothing
//! here touches process-wide state.

use crate::error::{LogError, Result};
use crate::types::{now, FeatureVector, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a karma log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KarmaEventKind {
    /// An action taken by an agent
    Action,

    /// An observed consequence of a previously recorded action
    Consequence,
}

/// One event in the karma log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KarmaEvent {
    /// Log-assigned identifier - k_<seq>
    pub id: String,

    /// Action or consequence
    pub kind: KarmaEventKind,

    /// Human-readable description
    pub description: String,

    /// Agent involved, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Behavioral features, recorded for actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,

    /// Causing event for consequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// When the event was recorded
    pub recorded_at: Timestamp,
}

/// Append-only karma log
///
/// Events are never removed or mutated after insertion. A single logical
/// owner per instance is assumed; there is no internal locking.
#[derive(Debug, Clone, Default)]
pub struct KarmaLog {
    events: Vec<KarmaEvent>,
    index: HashMap<String, usize>,
    next_seq: u64,
}

impl KarmaLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events have been recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Record an action; returns the assigned identifier
    pub fn record_action(
        &mut self,
        description: impl Into<String>,
        agent: impl Into<String>,
        features: FeatureVector,
    ) -> String {
        let id = self.next_id();
        self.push(KarmaEvent {
            id: id.clone(),
            kind: KarmaEventKind::Action,
            description: description.into(),
            agent: Some(agent.into()),
            features: Some(features),
            parent_id: None,
            recorded_at: now(),
        });
        id
    }

    /// Record a consequence of a previously recorded event
    ///
    /// Fails with [`LogError::ParentNotFound`] when the parent identifier is
    /// not in the log.
    pub fn record_consequence(
        &mut self,
        parent_id: &str,
        description: impl Into<String>,
    ) -> Result<String> {
        if !self.index.contains_key(parent_id) {
            return Err(LogError::ParentNotFound(parent_id.to_string()).into());
        }

        let id = self.next_id();
        self.push(KarmaEvent {
            id: id.clone(),
            kind: KarmaEventKind::Consequence,
            description: description.into(),
            agent: None,
            features: None,
            parent_id: Some(parent_id.to_string()),
            recorded_at: now(),
        });
        Ok(id)
    }

    /// Get an event by identifier; absence is `None`, not an error
    pub fn get(&self, id: &str) -> Option<&KarmaEvent> {
        self.index.get(id).map(|i| &self.events[*i])
    }

    /// Direct children of an event, in recording order
    pub fn children(&self, id: &str) -> Vec<&KarmaEvent> {
        self.events
            .iter()
            .filter(|e| e.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Chain from an event up to its root action, starting at the event itself
    pub fn lineage(&self, id: &str) -> Vec<&KarmaEvent> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(event) = current {
            chain.push(event);
            current = event.parent_id.as_deref().and_then(|p| self.get(p));
        }
        chain
    }

    /// All events in recording order
    pub fn events(&self) -> &[KarmaEvent] {
        &self.events
    }

    fn next_id(&mut self) -> String {
        self.next_seq += 1;
        format!("k_{}", self.next_seq)
    }

    fn push(&mut self, event: KarmaEvent) {
        self.index.insert(event.id.clone(), self.events.len());
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DharmaError;

    #[test]
    fn test_record_and_get_action() {
        let mut log = KarmaLog::new();
        let id = log.record_action("deployed fix", "agent-1", FeatureVector::default());

        let event = log.get(&id).unwrap();
        assert_eq!(event.kind, KarmaEventKind::Action);
        assert_eq!(event.agent.as_deref(), Some("agent-1"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_ids_are_sequential_per_log() {
        let mut log = KarmaLog::new();
        let first = log.record_action("a", "x", FeatureVector::default());
        let second = log.record_action("b", "x", FeatureVector::default());
        assert_eq!(first, "k_1");
        assert_eq!(second, "k_2");

        // A fresh log owns its own counter
        let mut other = KarmaLog::new();
        assert_eq!(other.record_action("c", "y", FeatureVector::default()), "k_1");
    }

    #[test]
    fn test_consequence_requires_existing_parent() {
        let mut log = KarmaLog::new();
        let err = log.record_consequence("k_404", "orphan");
        assert!(matches!(err, Err(DharmaError::Log(LogError::ParentNotFound(_)))));
    }

    #[test]
    fn test_children_listing() {
        let mut log = KarmaLog::new();
        let action = log.record_action("sent email", "agent-1", FeatureVector::default());
        let first = log.record_consequence(&action, "user replied").unwrap();
        log.record_consequence(&action, "ticket closed").unwrap();

        let children = log.children(&action);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id, first);
    }

    #[test]
    fn test_lineage_walks_to_root() {
        let mut log = KarmaLog::new();
        let root = log.record_action("root action", "agent-1", FeatureVector::default());
        let mid = log.record_consequence(&root, "first effect").unwrap();
        let leaf = log.record_consequence(&mid, "second effect").unwrap();

        let lineage = log.lineage(&leaf);
        let ids: Vec<&str> = lineage.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![leaf.as_str(), mid.as_str(), root.as_str()]);
    }

    #[test]
    fn test_get_absent_is_none() {
        let log = KarmaLog::new();
        assert!(log.get("k_1").is_none());
        assert!(log.children("k_1").is_empty());
        assert!(log.lineage("k_1").is_empty());
    }
}
