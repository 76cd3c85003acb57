//! End-to-end pipeline from ascii-art to a normalized [`LayoutTree`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use serde_json::{Value, json};

use crate::audit::{BuildAudit, BuildAuditEventBuilder, BuildAuditStage, NullBuildAudit};
use crate::error::Result;
use crate::grid::CellGrid;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::BuildMetrics;
use crate::tree::{LayoutTree, Reduction, Step, WorkingSet};

const GRID_TARGET: &str = "autolayout::grid";
const TREE_TARGET: &str = "autolayout::tree";
const BUILDER_TARGET: &str = "autolayout::builder";

/// Configuration knobs for [`LayoutBuilder`].
#[derive(Clone)]
pub struct BuildConfig {
    /// Optional structured logger; nothing is logged without one.
    pub logger: Option<Logger>,
    /// Receives one record per stage and per reduction.
    pub audit: Arc<dyn BuildAudit>,
    /// Shared counters, updated after every build when present.
    pub metrics: Option<Arc<Mutex<BuildMetrics>>>,
    /// Sort the finished tree into reading order.
    pub normalize: bool,
    /// Target used when logging metrics snapshots.
    pub metrics_target: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            logger: None,
            audit: Arc::new(NullBuildAudit),
            metrics: None,
            normalize: true,
            metrics_target: "autolayout::metrics".to_string(),
        }
    }
}

impl BuildConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn BuildAudit>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(BuildMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<BuildMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Turns ascii-art into layout trees, reporting progress through the
/// configured logger, audit and metrics.
#[derive(Clone, Default)]
pub struct LayoutBuilder {
    config: BuildConfig,
}

impl LayoutBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BuildConfig {
        &mut self.config
    }

    pub fn build(&self, art: &str) -> Result<LayoutTree> {
        let started = Instant::now();
        let outcome = CellGrid::parse(art).and_then(|grid| {
            self.record(
                BuildAuditStage::GridParsed,
                [("rows", json!(grid.rows())), ("cols", json!(grid.cols()))],
            );
            self.assemble(&grid)
        });
        self.finish(outcome, started)
    }

    /// Build from an already parsed grid.
    pub fn build_grid(&self, grid: &CellGrid) -> Result<LayoutTree> {
        let started = Instant::now();
        let outcome = self.assemble(grid);
        self.finish(outcome, started)
    }

    fn assemble(&self, grid: &CellGrid) -> Result<LayoutTree> {
        let regions = grid.regions()?;
        let labels: String = regions.iter().map(|region| region.label).collect();
        self.log(
            LogLevel::Debug,
            GRID_TARGET,
            "regions_extracted",
            [json_kv("count", regions.len()), json_str("labels", labels.clone())],
        );
        self.record(
            BuildAuditStage::RegionsExtracted,
            [("count", json!(regions.len())), ("labels", json!(labels))],
        );
        self.with_metrics(|metrics| metrics.record_regions(regions.len()));

        let mut set = WorkingSet::from_regions(regions);
        while set.len() > 1 {
            let Step { set: next, applied } = set.step()?;
            set = next;
            self.observe_step(&set, applied);
        }

        let mut tree = LayoutTree::new(set.into_root()?);
        self.record(
            BuildAuditStage::TreeAssembled,
            [("depth", json!(tree.depth())), ("grids", json!(tree.grid_count()))],
        );

        if self.config.normalize {
            let changed = tree.normalize()?;
            self.log(
                LogLevel::Trace,
                TREE_TARGET,
                "tree_normalized",
                [json_kv("changed", changed)],
            );
            self.record(BuildAuditStage::TreeNormalized, [("changed", json!(changed))]);
        }
        Ok(tree)
    }

    fn observe_step(&self, set: &WorkingSet, applied: Reduction) {
        let node = set.nodes().last().map(|node| node.label.clone()).unwrap_or_default();
        let (message, stage) = match applied {
            Reduction::Expand => {
                self.with_metrics(BuildMetrics::record_expand);
                ("expand_applied", BuildAuditStage::ExpandApplied)
            }
            Reduction::Merge => {
                self.with_metrics(BuildMetrics::record_merge);
                ("merge_applied", BuildAuditStage::MergeApplied)
            }
        };
        self.log(
            LogLevel::Trace,
            TREE_TARGET,
            message,
            [json_str("node", node.clone()), json_kv("remaining", set.len())],
        );
        self.record(stage, [("node", json!(node)), ("remaining", json!(set.len()))]);
    }

    fn finish(&self, outcome: Result<LayoutTree>, started: Instant) -> Result<LayoutTree> {
        let elapsed = started.elapsed();
        match &outcome {
            Ok(tree) => {
                self.with_metrics(|metrics| metrics.record_tree(tree.grid_count(), tree.depth()));
                self.log(
                    LogLevel::Info,
                    BUILDER_TARGET,
                    "layout_built",
                    [
                        json_kv("rows", tree.rows()),
                        json_kv("cols", tree.cols()),
                        json_kv("leaves", tree.leaves().len()),
                        json_kv("depth", tree.depth()),
                        json_kv("elapsed_us", elapsed.as_micros() as u64),
                    ],
                );
            }
            Err(err) => {
                self.with_metrics(BuildMetrics::record_failure);
                self.log(
                    LogLevel::Error,
                    BUILDER_TARGET,
                    "layout_failed",
                    [json_str("error", err.to_string())],
                );
            }
        }

        if let (Some(logger), Some(metrics)) = (&self.config.logger, &self.config.metrics) {
            let snapshot = metrics
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .snapshot(elapsed);
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
        outcome
    }

    fn log<const N: usize>(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: [(String, Value); N],
    ) {
        if let Some(logger) = &self.config.logger {
            if logger.enabled(level) {
                let _ = logger.log_event(event_with_fields(level, target, message, fields));
            }
        }
    }

    fn record<const N: usize>(&self, stage: BuildAuditStage, details: [(&str, Value); N]) {
        let event = details
            .into_iter()
            .fold(BuildAuditEventBuilder::new(stage), |builder, (key, value)| {
                builder.detail(key, value)
            })
            .finish();
        self.config.audit.record(event);
    }

    fn with_metrics(&self, update: impl FnOnce(&mut BuildMetrics)) {
        if let Some(metrics) = &self.config.metrics {
            let mut guard = metrics.lock().unwrap_or_else(PoisonError::into_inner);
            update(&mut *guard);
        }
    }
}

/// Build a layout with the default configuration.
pub fn build_layout(art: &str) -> Result<LayoutTree> {
    LayoutBuilder::default().build(art)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RecordingAudit;
    use crate::error::LayoutError;
    use crate::logging::MemorySink;

    fn observed() -> (LayoutBuilder, Arc<MemorySink>, Arc<RecordingAudit>) {
        let sink = Arc::new(MemorySink::new());
        let audit = Arc::new(RecordingAudit::new());
        let mut config = BuildConfig::default()
            .with_logger(Logger::from_arc(sink.clone()))
            .with_audit(audit.clone());
        config.enable_metrics();
        (LayoutBuilder::new(config), sink, audit)
    }

    #[test]
    fn default_builder_matches_tree_parse() {
        let art = "aac\nbbc";
        assert_eq!(build_layout(art).unwrap(), LayoutTree::parse(art).unwrap());
    }

    #[test]
    fn stages_are_audited_in_order() {
        let (builder, _sink, audit) = observed();
        builder.build("aac\nbbc").unwrap();
        assert_eq!(
            audit.stages(),
            vec![
                BuildAuditStage::GridParsed,
                BuildAuditStage::RegionsExtracted,
                BuildAuditStage::ExpandApplied,
                BuildAuditStage::MergeApplied,
                BuildAuditStage::TreeAssembled,
                BuildAuditStage::TreeNormalized,
            ]
        );
        let regions = &audit.events()[1];
        assert_eq!(regions.detail("labels"), Some(&json!("acb")));
    }

    #[test]
    fn expansion_only_layout_never_merges() {
        let (builder, _sink, audit) = observed();
        builder.build("ab\nab").unwrap();
        assert!(!audit.stages().contains(&BuildAuditStage::MergeApplied));

        let metrics = builder.config().metrics_handle().unwrap();
        let snap = metrics.lock().unwrap().snapshot(std::time::Duration::ZERO);
        assert_eq!(snap.expansions, 1);
        assert_eq!(snap.merges, 0);
        assert_eq!(snap.leaves, 2);
    }

    #[test]
    fn success_and_metrics_are_logged() {
        let (builder, sink, _audit) = observed();
        builder.build("aac\nbbc").unwrap();

        let built = sink.find("layout_built");
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].field("leaves"), Some(&json!(3)));
        assert_eq!(sink.find("expand_applied").len(), 1);
        assert_eq!(sink.find("merge_applied").len(), 1);
        assert_eq!(sink.find("build_metrics").len(), 1);
    }

    #[test]
    fn failures_are_logged_and_counted() {
        let (builder, sink, _audit) = observed();
        let err = builder.build("aab\ndeb\ndcc").unwrap_err();
        assert!(matches!(err, LayoutError::UnmergeableLayout { .. }));

        let failed = sink.find("layout_failed");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].level, LogLevel::Error);

        let metrics = builder.config().metrics_handle().unwrap();
        let snap = metrics.lock().unwrap().snapshot(std::time::Duration::ZERO);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.builds, 0);
    }

    #[test]
    fn normalization_can_be_skipped() {
        let config = BuildConfig::default().with_normalize(false);
        let audit = Arc::new(RecordingAudit::new());
        let builder = LayoutBuilder::new(config.with_audit(audit.clone()));
        let tree = builder.build("aac\nbbc").unwrap();

        assert!(!audit.stages().contains(&BuildAuditStage::TreeNormalized));
        assert_eq!(tree.root.children[0].label(), "ab");
        assert_eq!(tree.root.width_ratios, vec![2, 1]);
    }

    #[test]
    fn build_grid_skips_parsing() {
        let (builder, _sink, audit) = observed();
        let grid = CellGrid::parse("xy").unwrap();
        let tree = builder.build_grid(&grid).unwrap();
        assert_eq!(tree.leaves().len(), 2);
        assert_eq!(audit.stages()[0], BuildAuditStage::RegionsExtracted);
    }
}
