//! Build audit hooks.
//!
//! A [`BuildAudit`] sees one record per pipeline stage and per reduction, so
//! callers can trace how a particular art was decomposed without touching
//! the reduction loop.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Checkpoints emitted by [`crate::LayoutBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAuditStage {
    /// Art parsed into a rectangular grid.
    GridParsed,
    /// One region per label measured.
    RegionsExtracted,
    /// Two nodes joined by appending a row or column.
    ExpandApplied,
    /// Two nodes nested into a new two-cell grid.
    MergeApplied,
    /// Working set collapsed to a single root.
    TreeAssembled,
    /// Root sorted into reading order.
    TreeNormalized,
}

#[derive(Debug, Clone)]
pub struct BuildAuditEvent {
    pub stage: BuildAuditStage,
    pub details: Vec<(String, Value)>,
}

impl BuildAuditEvent {
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct BuildAuditEventBuilder {
    event: BuildAuditEvent,
}

impl BuildAuditEventBuilder {
    pub fn new(stage: BuildAuditStage) -> Self {
        Self {
            event: BuildAuditEvent {
                stage,
                details: Vec::new(),
            },
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> BuildAuditEvent {
        self.event
    }
}

pub trait BuildAudit: Send + Sync {
    fn record(&self, event: BuildAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullBuildAudit;

impl BuildAudit for NullBuildAudit {
    fn record(&self, _event: BuildAuditEvent) {}
}

/// Keeps every record in order.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<BuildAuditEvent>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BuildAuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stages(&self) -> Vec<BuildAuditStage> {
        self.events().iter().map(|event| event.stage).collect()
    }
}

impl BuildAudit for RecordingAudit {
    fn record(&self, event: BuildAuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
