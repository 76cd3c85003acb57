use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated over one or more layout builds.
#[derive(Debug, Default, Clone)]
pub struct BuildMetrics {
    builds: u64,
    failures: u64,
    leaves: u64,
    expansions: u64,
    merges: u64,
    grids: u64,
    max_depth: u64,
}

impl BuildMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_regions(&mut self, count: usize) {
        self.leaves = self.leaves.saturating_add(count as u64);
    }

    pub fn record_expand(&mut self) {
        self.expansions = self.expansions.saturating_add(1);
    }

    pub fn record_merge(&mut self) {
        self.merges = self.merges.saturating_add(1);
    }

    pub fn record_tree(&mut self, grids: usize, depth: usize) {
        self.builds = self.builds.saturating_add(1);
        self.grids = self.grids.saturating_add(grids as u64);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    pub fn snapshot(&self, elapsed: Duration) -> MetricSnapshot {
        MetricSnapshot {
            elapsed_us: elapsed.as_micros() as u64,
            builds: self.builds,
            failures: self.failures,
            leaves: self.leaves,
            expansions: self.expansions,
            merges: self.merges,
            grids: self.grids,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub elapsed_us: u64,
    pub builds: u64,
    pub failures: u64,
    pub leaves: u64,
    pub expansions: u64,
    pub merges: u64,
    pub grids: u64,
    pub max_depth: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "build_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("elapsed_us".to_string(), json!(self.elapsed_us));
        map.insert("builds".to_string(), json!(self.builds));
        map.insert("failures".to_string(), json!(self.failures));
        map.insert("leaves".to_string(), json!(self.leaves));
        map.insert("expansions".to_string(), json!(self.expansions));
        map.insert("merges".to_string(), json!(self.merges));
        map.insert("grids".to_string(), json!(self.grids));
        map.insert("max_depth".to_string(), json!(self.max_depth));
        map
    }
}
