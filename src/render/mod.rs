//! Drawing-surface abstraction between the grid engine and a plotting backend.
//!
//! The engine only issues commands through [`DrawingSurface`]. [`figure::Figure`]
//! records them into an inspectable panel grid; [`raster::draw_figure`] replays a
//! recorded figure onto any plotters backend.

pub mod figure;
pub mod raster;

use crate::config::LayoutConfig;
use crate::core::density::Density2d;
use crate::style::{Color, Colormap, LineStyle};

/// Grid cell address: `row` is the y variable, `col` the x variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PanelPos {
    pub row: usize,
    pub col: usize,
}

impl PanelPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Size and spacing of an n×n grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    pub n: usize,
    /// Figure width and height in figure units (inches at `dpi`).
    pub figsize: (f64, f64),
    /// Vertical gap between rows as a fraction of the mean panel height.
    pub hspace: f64,
    /// Horizontal gap between columns as a fraction of the mean panel width.
    pub wspace: f64,
    pub dpi: u32,
}

impl GridGeometry {
    /// Figure side grows linearly with `n`: `n * figsize_scaling + 1`.
    pub fn new(n: usize, layout: &LayoutConfig) -> Self {
        let side = n as f64 * layout.figsize_scaling + 1.0;
        Self {
            n,
            figsize: (side, side),
            hspace: layout.hspace,
            wspace: layout.wspace,
            dpi: layout.dpi,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f64| (v * self.dpi as f64).round().max(1.0) as u32;
        (px(self.figsize.0), px(self.figsize.1))
    }

    /// Convert a font size in points to pixels at this figure's dpi.
    pub fn points_to_pixels(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineSpec {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    /// Larger values draw later (on top).
    pub z_order: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSpec {
    pub color: Color,
    pub edge_color: Color,
    pub alpha: f64,
    /// Marker area in points squared.
    pub size: f64,
    /// Passed through for custom surfaces. `draw_figure` ignores it on every plotters
    /// backend, SVG included.
    pub rasterized: bool,
}

/// How contour levels are colored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContourPaint {
    Colormap(Colormap),
    Solid(Color),
}

impl ContourPaint {
    /// One color per threshold. Colormaps are normalized over the threshold range.
    pub fn resolve(&self, thresholds: &[f64]) -> Vec<Color> {
        match self {
            ContourPaint::Solid(c) => vec![*c; thresholds.len()],
            ContourPaint::Colormap(map) => {
                let lo = thresholds.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = thresholds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let span = hi - lo;
                thresholds
                    .iter()
                    .map(|&t| {
                        let u = if span > 0.0 { (t - lo) / span } else { 0.0 };
                        map.sample(u).unwrap_or(Color::BLACK)
                    })
                    .collect()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContourSpec {
    pub paint: ContourPaint,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickLabelStyle {
    /// Font size in points.
    pub size: f64,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
}

/// Command sink for one pre-allocated n×n grid of panels.
pub trait DrawingSurface {
    /// Turn the panel off entirely: no frame, ticks, labels or artists.
    fn hide_panel(&mut self, pos: PanelPos);

    fn plot_line(&mut self, pos: PanelPos, xs: &[f64], ys: &[f64], spec: &LineSpec);
    fn vline(&mut self, pos: PanelPos, x: f64, spec: &LineSpec);
    fn hline(&mut self, pos: PanelPos, y: f64, spec: &LineSpec);
    fn scatter(&mut self, pos: PanelPos, xs: &[f64], ys: &[f64], spec: &ScatterSpec);

    /// Iso-lines of `surface` at each of `levels` (ascending).
    fn contour(&mut self, pos: PanelPos, surface: &Density2d, levels: &[f64], spec: &ContourSpec);

    fn set_limits(&mut self, pos: PanelPos, axis: Axis, lo: f64, hi: f64);
    fn set_max_ticks(&mut self, pos: PanelPos, axis: Axis, max_ticks: usize);

    fn set_axis_label(&mut self, pos: PanelPos, axis: Axis, text: &str, size: f64);
    fn hide_axis_label(&mut self, pos: PanelPos, axis: Axis);
    fn style_tick_labels(&mut self, pos: PanelPos, axis: Axis, style: TickLabelStyle);
    fn hide_tick_labels(&mut self, pos: PanelPos, axis: Axis);
    fn hide_ticks(&mut self, pos: PanelPos, axis: Axis);

    /// Text placed at `at`, given as a fraction of the panel's axes (0..1 each way).
    fn annotate(&mut self, pos: PanelPos, text: &str, at: (f64, f64), size: f64);

    /// Color of the panel frame and its tick marks.
    fn set_edge_color(&mut self, pos: PanelPos, color: Color);
}

/// Allocates a surface for a given grid geometry.
pub trait SurfaceFactory {
    type Surface: DrawingSurface;

    fn allocate(&self, geometry: &GridGeometry) -> Self::Surface;
}
