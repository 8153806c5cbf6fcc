//! In-memory figure: the grid object returned to callers.
//!
//! Every [`DrawingSurface`] command is stored on its panel, so a figure can be inspected
//! in tests or replayed onto a real backend later. Contour requests are reduced to their
//! iso-line segments at draw time; the density grid itself is not kept.

use super::{
    Axis, ContourSpec, DrawingSurface, GridGeometry, LineSpec, PanelPos, ScatterSpec,
    SurfaceFactory, TickLabelStyle,
};
use crate::core::contour::{Segment, march_squares};
use crate::core::density::Density2d;
use crate::style::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub size: f64,
}

/// Per-axis state of one panel.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisState {
    pub limits: Option<(f64, f64)>,
    pub max_ticks: Option<usize>,
    pub label: Option<AxisLabel>,
    pub label_visible: bool,
    pub ticks_visible: bool,
    pub tick_labels_visible: bool,
    pub tick_label_style: Option<TickLabelStyle>,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            limits: None,
            max_ticks: None,
            label: None,
            label_visible: true,
            ticks_visible: true,
            tick_labels_visible: true,
            tick_label_style: None,
        }
    }
}

impl AxisState {
    /// Label text if one is set and not hidden.
    pub fn shown_label(&self) -> Option<&AxisLabel> {
        self.label.as_ref().filter(|_| self.label_visible)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContourLevel {
    pub threshold: f64,
    pub color: Color,
    pub segments: Vec<Segment>,
}

/// Iso-lines of one joint density, ordered by ascending threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourSet {
    pub levels: Vec<ContourLevel>,
    pub width: f64,
}

impl ContourSet {
    pub fn thresholds(&self) -> Vec<f64> {
        self.levels.iter().map(|l| l.threshold).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Artist {
    Line {
        xs: Vec<f64>,
        ys: Vec<f64>,
        spec: LineSpec,
    },
    VLine {
        x: f64,
        spec: LineSpec,
    },
    HLine {
        y: f64,
        spec: LineSpec,
    },
    Scatter {
        xs: Vec<f64>,
        ys: Vec<f64>,
        spec: ScatterSpec,
    },
    Contour(ContourSet),
}

impl Artist {
    /// Stacking order: collections below lines, reference lines on their own z.
    pub fn z_order(&self) -> i32 {
        match self {
            Artist::Scatter { .. } => 1,
            Artist::Contour(_) => 2,
            Artist::Line { spec, .. } | Artist::VLine { spec, .. } | Artist::HLine { spec, .. } => {
                spec.z_order
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub text: String,
    /// Position as a fraction of the axes.
    pub at: (f64, f64),
    pub size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub pos: PanelPos,
    pub visible: bool,
    pub artists: Vec<Artist>,
    pub annotations: Vec<Annotation>,
    pub x_axis: AxisState,
    pub y_axis: AxisState,
    pub edge_color: Option<Color>,
}

impl Panel {
    fn new(pos: PanelPos) -> Self {
        Self {
            pos,
            visible: true,
            artists: Vec::new(),
            annotations: Vec::new(),
            x_axis: AxisState::default(),
            y_axis: AxisState::default(),
            edge_color: None,
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::X => &self.x_axis,
            Axis::Y => &self.y_axis,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::X => &mut self.x_axis,
            Axis::Y => &mut self.y_axis,
        }
    }

    pub fn curves(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Line { xs, ys, .. } => Some((xs.as_slice(), ys.as_slice())),
            _ => None,
        })
    }

    pub fn vlines(&self) -> Vec<f64> {
        self.artists
            .iter()
            .filter_map(|a| match a {
                Artist::VLine { x, .. } => Some(*x),
                _ => None,
            })
            .collect()
    }

    pub fn hlines(&self) -> Vec<f64> {
        self.artists
            .iter()
            .filter_map(|a| match a {
                Artist::HLine { y, .. } => Some(*y),
                _ => None,
            })
            .collect()
    }

    pub fn contour_sets(&self) -> impl Iterator<Item = &ContourSet> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Contour(set) => Some(set),
            _ => None,
        })
    }

    pub fn scatter_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Scatter { .. }))
            .count()
    }
}

/// Figure plus its n×n panel array, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    geometry: GridGeometry,
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(geometry: GridGeometry) -> Self {
        let n = geometry.n;
        let panels = (0..n * n)
            .map(|k| Panel::new(PanelPos::new(k / n, k % n)))
            .collect();
        Self { geometry, panels }
    }

    pub fn n(&self) -> usize {
        self.geometry.n
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Panel at (`row`, `col`), or `None` outside the grid.
    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        let n = self.n();
        if row < n && col < n {
            self.panels.get(row * n + col)
        } else {
            None
        }
    }

    fn panel_mut(&mut self, pos: PanelPos) -> &mut Panel {
        let n = self.n();
        assert!(pos.row < n && pos.col < n, "panel {pos:?} outside grid");
        &mut self.panels[pos.row * n + pos.col]
    }
}

impl DrawingSurface for Figure {
    fn hide_panel(&mut self, pos: PanelPos) {
        let panel = self.panel_mut(pos);
        panel.visible = false;
        for axis in [Axis::X, Axis::Y] {
            let state = panel.axis_mut(axis);
            state.ticks_visible = false;
            state.tick_labels_visible = false;
            state.label_visible = false;
        }
    }

    fn plot_line(&mut self, pos: PanelPos, xs: &[f64], ys: &[f64], spec: &LineSpec) {
        self.panel_mut(pos).artists.push(Artist::Line {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            spec: spec.clone(),
        });
    }

    fn vline(&mut self, pos: PanelPos, x: f64, spec: &LineSpec) {
        self.panel_mut(pos).artists.push(Artist::VLine {
            x,
            spec: spec.clone(),
        });
    }

    fn hline(&mut self, pos: PanelPos, y: f64, spec: &LineSpec) {
        self.panel_mut(pos).artists.push(Artist::HLine {
            y,
            spec: spec.clone(),
        });
    }

    fn scatter(&mut self, pos: PanelPos, xs: &[f64], ys: &[f64], spec: &ScatterSpec) {
        self.panel_mut(pos).artists.push(Artist::Scatter {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            spec: spec.clone(),
        });
    }

    fn contour(&mut self, pos: PanelPos, surface: &Density2d, levels: &[f64], spec: &ContourSpec) {
        let colors = spec.paint.resolve(levels);
        let levels = levels
            .iter()
            .zip(colors)
            .map(|(&threshold, color)| ContourLevel {
                threshold,
                color,
                segments: march_squares(surface, threshold),
            })
            .collect();
        self.panel_mut(pos).artists.push(Artist::Contour(ContourSet {
            levels,
            width: spec.width,
        }));
    }

    fn set_limits(&mut self, pos: PanelPos, axis: Axis, lo: f64, hi: f64) {
        self.panel_mut(pos).axis_mut(axis).limits = Some((lo, hi));
    }

    fn set_max_ticks(&mut self, pos: PanelPos, axis: Axis, max_ticks: usize) {
        self.panel_mut(pos).axis_mut(axis).max_ticks = Some(max_ticks);
    }

    fn set_axis_label(&mut self, pos: PanelPos, axis: Axis, text: &str, size: f64) {
        let state = self.panel_mut(pos).axis_mut(axis);
        state.label = Some(AxisLabel {
            text: text.to_string(),
            size,
        });
    }

    fn hide_axis_label(&mut self, pos: PanelPos, axis: Axis) {
        self.panel_mut(pos).axis_mut(axis).label_visible = false;
    }

    fn style_tick_labels(&mut self, pos: PanelPos, axis: Axis, style: TickLabelStyle) {
        self.panel_mut(pos).axis_mut(axis).tick_label_style = Some(style);
    }

    fn hide_tick_labels(&mut self, pos: PanelPos, axis: Axis) {
        self.panel_mut(pos).axis_mut(axis).tick_labels_visible = false;
    }

    fn hide_ticks(&mut self, pos: PanelPos, axis: Axis) {
        self.panel_mut(pos).axis_mut(axis).ticks_visible = false;
    }

    fn annotate(&mut self, pos: PanelPos, text: &str, at: (f64, f64), size: f64) {
        self.panel_mut(pos).annotations.push(Annotation {
            text: text.to_string(),
            at,
            size,
        });
    }

    fn set_edge_color(&mut self, pos: PanelPos, color: Color) {
        self.panel_mut(pos).edge_color = Some(color);
    }
}

/// Factory for recording figures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recorder;

impl SurfaceFactory for Recorder {
    type Surface = Figure;

    fn allocate(&self, geometry: &GridGeometry) -> Figure {
        Figure::new(geometry.clone())
    }
}
