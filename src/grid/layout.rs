use std::iter;

use tracing::{debug, info};

use super::role::{PanelEdges, PanelRole};
use crate::config::PairsConfig;
use crate::core::dataset::{Dataset, Key};
use crate::core::density::{DensityEstimator, GaussianKde};
use crate::core::index::{display_labels, fetch_series, resolve_indices};
use crate::core::levels::SigmaLevels;
use crate::core::limits::axis_range;
use crate::error::PairsError;
use crate::render::figure::{Figure, Recorder};
use crate::render::{
    Axis, ContourPaint, ContourSpec, DrawingSurface, GridGeometry, LineSpec, PanelPos,
    ScatterSpec, SurfaceFactory, TickLabelStyle,
};
use crate::style::{Colormap, LineStyle};

/// Rotation applied to the tick labels on the outer axes.
const TICK_ROTATION_DEG: f64 = 45.0;
/// Where the diagonal annotation sits, as a fraction of the panel axes.
const ANNOTATION_AT: (f64, f64) = (0.8, 0.8);

/// Per-call inputs: which variables to plot and what to mark on them.
#[derive(Clone, Copy, Debug, Default)]
pub struct Variables<'a> {
    /// Explicit variable order; duplicates allowed. `None` plots every variable.
    pub indices: Option<&'a [Key]>,
    /// One display label per resolved variable.
    pub labels: Option<&'a [String]>,
    /// One reference value per resolved variable.
    pub truths: Option<&'a [f64]>,
}

/// Builds corner plots: marginals on the diagonal, joint contours below it.
#[derive(Clone, Debug)]
pub struct PairsPlot<E = GaussianKde> {
    config: PairsConfig,
    estimator: E,
}

impl PairsPlot<GaussianKde> {
    pub fn new(config: PairsConfig) -> Self {
        let estimator = GaussianKde::new(config.kde.grid_points_1d, config.kde.grid_points_2d);
        Self { config, estimator }
    }
}

impl Default for PairsPlot<GaussianKde> {
    fn default() -> Self {
        Self::new(PairsConfig::default())
    }
}

impl<E: DensityEstimator> PairsPlot<E> {
    /// Swap the density backend, keeping the configuration.
    pub fn with_estimator<F: DensityEstimator>(self, estimator: F) -> PairsPlot<F> {
        PairsPlot {
            config: self.config,
            estimator,
        }
    }

    /// Build the grid into a recorded [`Figure`].
    pub fn render<D: Dataset + ?Sized>(
        &self,
        dataset: &D,
        vars: &Variables<'_>,
    ) -> Result<Figure, PairsError> {
        self.render_with(dataset, vars, &Recorder)
    }

    /// Build the grid onto a surface allocated by `factory`.
    ///
    /// Inputs are checked before the surface exists. A later failure drops the partly
    /// drawn surface and returns the error for the failing panel.
    pub fn render_with<D, F>(
        &self,
        dataset: &D,
        vars: &Variables<'_>,
        factory: &F,
    ) -> Result<F::Surface, PairsError>
    where
        D: Dataset + ?Sized,
        F: SurfaceFactory,
    {
        self.config.validate()?;
        let keys = resolve_indices(dataset, vars.indices, vars.truths, vars.labels)?;
        let series = fetch_series(dataset, &keys)?;
        let labels = display_labels(&keys, vars.labels);
        let levels = SigmaLevels::new(&self.config.kde.levels)?;

        let geometry = GridGeometry::new(keys.len(), &self.config.layout);
        let mut pass = GridPass {
            config: &self.config,
            estimator: &self.estimator,
            keys: &keys,
            series: &series,
            labels: &labels,
            truths: vars.truths,
            levels: &levels,
            surface: factory.allocate(&geometry),
        };
        for row in 0..keys.len() {
            pass.row(row)?;
        }
        info!(n = keys.len(), "pairs grid complete");
        Ok(pass.surface)
    }
}

/// State of one grid construction.
struct GridPass<'a, E, S> {
    config: &'a PairsConfig,
    estimator: &'a E,
    keys: &'a [Key],
    series: &'a [&'a [f64]],
    labels: &'a [String],
    truths: Option<&'a [f64]>,
    levels: &'a SigmaLevels,
    surface: S,
}

impl<E: DensityEstimator, S: DrawingSurface> GridPass<'_, E, S> {
    fn n(&self) -> usize {
        self.keys.len()
    }

    /// Suppressed cells first, then the diagonal, then the lower cells left to right.
    fn row(&mut self, i: usize) -> Result<(), PairsError> {
        let n = self.n();
        for j in (i + 1..n).chain(iter::once(i)).chain(0..i) {
            let pos = PanelPos::new(i, j);
            let role = PanelRole::of(pos);
            match role {
                PanelRole::Suppressed => self.surface.hide_panel(pos),
                PanelRole::Diagonal => self.marginal(pos)?,
                PanelRole::Lower => self.joint(pos)?,
            }
            debug!(row = i, col = j, ?role, "panel drawn");
        }
        for j in 0..n {
            self.axis_rules(PanelPos::new(i, j));
        }
        Ok(())
    }

    fn marginal(&mut self, pos: PanelPos) -> Result<(), PairsError> {
        let config = self.config;
        let i = pos.row;
        let density = self
            .estimator
            .estimate_1d(self.series[i])
            .map_err(|source| PairsError::Estimation {
                row: pos.row,
                col: pos.col,
                source,
            })?;
        let marginal = &config.marginal;
        let line = LineSpec {
            color: marginal.color,
            width: marginal.linewidth,
            style: LineStyle::Solid,
            z_order: 2,
        };
        self.surface
            .plot_line(pos, &density.coords, &density.values, &line);
        if let Some(truths) = self.truths {
            let truth = self.truth_line();
            self.surface.vline(pos, truths[i], &truth);
        }
        self.surface.set_edge_color(pos, config.layout.edge_color);
        self.limits(pos, Axis::X, i)?;
        if marginal.annotate {
            let label = &self.labels[i];
            self.surface
                .annotate(pos, label, ANNOTATION_AT, config.fonts.annotation);
        }
        Ok(())
    }

    fn joint(&mut self, pos: PanelPos) -> Result<(), PairsError> {
        let config = self.config;
        let (i, j) = (pos.row, pos.col);
        let scatter = &config.scatter;
        if scatter.enabled {
            let xs: Vec<f64> = self.series[j].iter().step_by(scatter.thin).copied().collect();
            let ys: Vec<f64> = self.series[i].iter().step_by(scatter.thin).copied().collect();
            let spec = ScatterSpec {
                color: scatter.color,
                edge_color: scatter.edge_color.unwrap_or(scatter.color),
                alpha: scatter.alpha,
                size: scatter.marker_size,
                rasterized: scatter.rasterized,
            };
            self.surface.scatter(pos, &xs, &ys, &spec);
            self.limits(pos, Axis::X, j)?;
            self.limits(pos, Axis::Y, i)?;
            if let Some(truths) = self.truths {
                let line = self.truth_line();
                self.surface.vline(pos, truths[j], &line);
                self.surface.hline(pos, truths[i], &line);
            }
            self.surface.set_edge_color(pos, config.layout.edge_color);
        }

        let density = self
            .estimator
            .estimate_2d(self.series[j], self.series[i])
            .map_err(|source| PairsError::Estimation { row: i, col: j, source })?;
        let thresholds = self.levels.thresholds(density.peak());
        let kde = &config.kde;
        let paint = match kde.cmap {
            Colormap::None => ContourPaint::Solid(kde.color),
            map => ContourPaint::Colormap(map),
        };
        let spec = ContourSpec {
            paint,
            width: kde.linewidth,
        };
        self.surface.contour(pos, &density, &thresholds, &spec);
        Ok(())
    }

    /// Limits for `axis` of `pos` from variable `var`. x uses the x quantile policy and
    /// y the y policy, so every panel in a column shares its x-limits.
    fn limits(&mut self, pos: PanelPos, axis: Axis, var: usize) -> Result<(), PairsError> {
        let quantiles = match axis {
            Axis::X => self.config.limits.x_quantiles,
            Axis::Y => self.config.limits.y_quantiles,
        };
        let (lo, hi) = axis_range(self.series[var], quantiles).ok_or_else(|| {
            PairsError::EmptySeries {
                key: self.keys[var].clone(),
            }
        })?;
        self.surface.set_limits(pos, axis, lo, hi);
        Ok(())
    }

    fn truth_line(&self) -> LineSpec {
        let truths = &self.config.truths;
        LineSpec {
            color: truths.color,
            width: truths.linewidth,
            style: truths.linestyle,
            z_order: truths.z_order,
        }
    }

    fn axis_rules(&mut self, pos: PanelPos) {
        let edges = PanelEdges::of(pos, self.n());
        let diagonal = PanelRole::of(pos) == PanelRole::Diagonal;
        let config = self.config;
        let labels = self.labels;
        let fonts = &config.fonts;
        let ticks = TickLabelStyle {
            size: fonts.ticks,
            rotation: TICK_ROTATION_DEG,
        };
        let s = &mut self.surface;

        let max_ticks = config.layout.max_ticks;
        s.set_max_ticks(pos, Axis::X, max_ticks);
        s.set_max_ticks(pos, Axis::Y, max_ticks);

        if edges.first_column {
            if !diagonal {
                s.set_axis_label(pos, Axis::Y, &labels[pos.row], fonts.labels);
            }
            s.style_tick_labels(pos, Axis::Y, ticks);
        } else {
            s.hide_tick_labels(pos, Axis::Y);
        }

        if edges.last_row {
            s.set_axis_label(pos, Axis::X, &labels[pos.col], fonts.labels);
            s.style_tick_labels(pos, Axis::X, ticks);
        } else {
            s.hide_tick_labels(pos, Axis::X);
        }

        if diagonal {
            if !edges.last_column {
                s.hide_tick_labels(pos, Axis::X);
                s.hide_axis_label(pos, Axis::X);
            }
            s.hide_ticks(pos, Axis::Y);
            s.hide_tick_labels(pos, Axis::Y);
            s.hide_axis_label(pos, Axis::Y);
        }
    }
}
