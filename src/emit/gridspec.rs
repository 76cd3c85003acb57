use std::io::Write;

use crate::error::Result;
use crate::logging::{LogFields, LogLevel, Logger, json_kv};
use crate::tree::{GridNode, LayoutNode, LayoutTree};

use super::{LayoutEmitter, format_ratios};

const EMIT_TARGET: &str = "autolayout::emit";

/// Figure parameters for generated matplotlib code.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    /// Horizontal gap between axes, in units of an average column.
    pub wspace: Option<f64>,
    /// Vertical gap between axes, in units of an average row.
    pub hspace: Option<f64>,
    /// Figure width in inches.
    pub width: Option<f64>,
    /// Figure height in inches.
    pub height: Option<f64>,
    /// Inches per art column; overrides `width`.
    pub width_factor: Option<f64>,
    /// Inches per art row; overrides `height`.
    pub height_factor: Option<f64>,
    pub dpi: f64,
    /// Append a loop writing each axis name at its centre.
    pub annotate: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            wspace: Some(0.6),
            hspace: Some(0.5),
            width: Some(12.0),
            height: Some(8.0),
            width_factor: None,
            height_factor: None,
            dpi: 96.0,
            annotate: true,
        }
    }
}

impl FigureConfig {
    pub fn with_spacing(mut self, wspace: Option<f64>, hspace: Option<f64>) -> Self {
        self.wspace = wspace;
        self.hspace = hspace;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_factors(mut self, width_factor: Option<f64>, height_factor: Option<f64>) -> Self {
        self.width_factor = width_factor;
        self.height_factor = height_factor;
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }
}

/// Writes Python source that builds the layout with nested matplotlib
/// `GridSpec`s. Axes land in an `axes` dict keyed `ax_<label>`.
#[derive(Clone, Default)]
pub struct GridSpecEmitter {
    config: FigureConfig,
    logger: Option<Logger>,
}

impl GridSpecEmitter {
    pub fn new(config: FigureConfig) -> Self {
        Self {
            config,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Resolved figure size in inches, `None` where neither an absolute
    /// size nor a factor is set.
    pub fn figure_size(&self, tree: &LayoutTree) -> (Option<f64>, Option<f64>) {
        let width = self.resolve("width", self.config.width, self.config.width_factor, tree.cols());
        let height =
            self.resolve("height", self.config.height, self.config.height_factor, tree.rows());
        (width, height)
    }

    fn resolve(
        &self,
        dimension: &str,
        absolute: Option<f64>,
        factor: Option<f64>,
        cells: usize,
    ) -> Option<f64> {
        let Some(factor) = factor else {
            return absolute;
        };
        if absolute.is_some() {
            self.warn(
                "factor_overrides_size",
                [json_kv("dimension", dimension), json_kv("factor", factor)],
            );
        }
        Some(factor * cells as f64)
    }

    fn warn<const N: usize>(&self, message: &str, fields: [(String, serde_json::Value); N]) {
        if let Some(logger) = &self.logger {
            let fields: LogFields = fields.into_iter().collect();
            let _ = logger.log_with_fields(LogLevel::Warn, EMIT_TARGET, message, fields);
        }
    }

    fn grid(&self, grid: &GridNode, parent: Option<&str>, out: &mut dyn Write) -> Result<()> {
        let mut labels: Vec<char> = grid.label.chars().collect();
        labels.sort_unstable();
        let name: String = format!("gs_{}", labels.into_iter().collect::<String>());

        match parent {
            None => {
                writeln!(out, "\ngridspecs[\"{name}\"] = mpl.gridspec.GridSpec(")?;
                writeln!(out, "    figure=fig,")?;
            }
            Some(spec) => {
                writeln!(out, "\ngridspecs[\"{name}\"] = mpl.gridspec.GridSpecFromSubplotSpec(")?;
                writeln!(out, "    subplot_spec={spec},")?;
            }
        }
        writeln!(out, "    nrows={},", grid.rows())?;
        writeln!(out, "    ncols={},", grid.cols())?;
        writeln!(out, "    height_ratios={},", format_ratios(&grid.height_ratios))?;
        writeln!(out, "    width_ratios={},", format_ratios(&grid.width_ratios))?;
        if let Some(wspace) = self.config.wspace {
            writeln!(out, "    wspace={},", wspace / mean(&grid.width_ratios))?;
        }
        if let Some(hspace) = self.config.hspace {
            writeln!(out, "    hspace={},", hspace / mean(&grid.height_ratios))?;
        }
        writeln!(out, ")")?;

        for (idx, child) in grid.children.iter().enumerate() {
            let spec = format!("gridspecs[\"{name}\"][{idx}]");
            match child {
                LayoutNode::Grid(inner) => self.grid(inner, Some(&spec), out)?,
                LayoutNode::Leaf(leaf) => {
                    writeln!(out, "axes[\"ax_{}\"] = fig.add_subplot({spec})", leaf.label)?
                }
            }
        }
        Ok(())
    }
}

fn mean(ratios: &[usize]) -> f64 {
    ratios.iter().sum::<usize>() as f64 / ratios.len().max(1) as f64
}

impl LayoutEmitter for GridSpecEmitter {
    fn emit(&self, tree: &LayoutTree, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "import matplotlib as mpl")?;
        writeln!(out, "import matplotlib.pyplot as plt")?;

        match self.figure_size(tree) {
            (Some(width), Some(height)) => writeln!(
                out,
                "fig = plt.figure(figsize=({width}, {height}), dpi={})\n",
                self.config.dpi
            )?,
            _ => writeln!(out, "fig = plt.figure(dpi={})\n", self.config.dpi)?,
        }
        writeln!(out, "gridspecs = {{}}")?;
        writeln!(out, "axes = {{}}")?;

        self.grid(&tree.root, None, out)?;

        if self.config.annotate {
            writeln!(out, "\nfor name, ax in axes.items():")?;
            writeln!(
                out,
                "    ax.annotate(name, (0.5, 0.5), ha=\"center\", va=\"center\")"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::logging::MemorySink;

    #[test]
    fn nested_gridspec_source() {
        let tree = LayoutTree::parse("aac\nbbc").unwrap();
        let config = FigureConfig::default()
            .with_spacing(None, None)
            .with_annotate(false);
        let text = GridSpecEmitter::new(config).emit_to_string(&tree).unwrap();

        let expected = r#"import matplotlib as mpl
import matplotlib.pyplot as plt
fig = plt.figure(figsize=(12, 8), dpi=96)

gridspecs = {}
axes = {}

gridspecs["gs_abc"] = mpl.gridspec.GridSpec(
    figure=fig,
    nrows=1,
    ncols=2,
    height_ratios=[2],
    width_ratios=[2, 1],
)

gridspecs["gs_ab"] = mpl.gridspec.GridSpecFromSubplotSpec(
    subplot_spec=gridspecs["gs_abc"][0],
    nrows=2,
    ncols=1,
    height_ratios=[1, 1],
    width_ratios=[2],
)
axes["ax_a"] = fig.add_subplot(gridspecs["gs_ab"][0])
axes["ax_b"] = fig.add_subplot(gridspecs["gs_ab"][1])
axes["ax_c"] = fig.add_subplot(gridspecs["gs_abc"][1])
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn spacing_is_scaled_by_mean_ratio() {
        let tree = LayoutTree::parse("abb\nabb").unwrap();
        let config = FigureConfig::default().with_spacing(Some(0.6), Some(0.5));
        let text = GridSpecEmitter::new(config).emit_to_string(&tree).unwrap();
        // widths [1, 2] average 1.5, heights [2] average 2.
        assert!(text.contains(&format!("    wspace={},", 0.6 / 1.5)));
        assert!(text.contains("    hspace=0.25,"));
        assert!(text.contains("ax.annotate(name"));
    }

    #[test]
    fn factors_override_size_with_warning() {
        let sink = Arc::new(MemorySink::new());
        let tree = LayoutTree::parse("aaaa\nbbbb").unwrap();
        let emitter = GridSpecEmitter::new(FigureConfig::default().with_factors(Some(2.0), None))
            .with_logger(Logger::from_arc(sink.clone()));

        assert_eq!(emitter.figure_size(&tree), (Some(8.0), Some(8.0)));
        let warnings = sink.find("factor_overrides_size");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, LogLevel::Warn);
    }

    #[test]
    fn missing_size_falls_back_to_matplotlib_default() {
        let tree = LayoutTree::parse("a").unwrap();
        let mut config = FigureConfig::default().with_dpi(72.0);
        config.width = None;
        let text = GridSpecEmitter::new(config).emit_to_string(&tree).unwrap();
        assert!(text.contains("fig = plt.figure(dpi=72)\n"));
        assert!(text.contains("axes[\"ax_a\"] = fig.add_subplot(gridspecs[\"gs_a\"][0])"));
    }
}
