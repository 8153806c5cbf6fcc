//! Replays a recorded [`Figure`] onto a plotters drawing area.
//!
//! Panels share one plotting size: the first column and the last row get extra room for
//! their axis labels through uneven breakpoints. Tick-label rotation is not reproduced;
//! plotters only lays text out horizontally here.

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::figure::{Artist, AxisState, ContourSet, Figure, Panel};
use super::{GridGeometry, LineSpec, PanelPos, ScatterSpec};
use crate::error::PairsError;
use crate::style::Color as PairsColor;

type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const DEFAULT_TICK_PT: f64 = 10.0;

/// Draw every visible panel of `figure` onto `root`, which should span the whole figure
/// (see [`GridGeometry::pixel_size`]).
pub fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), PairsError> {
    root.fill(&WHITE).map_err(PairsError::from_drawing)?;
    let n = figure.n();
    if n == 0 {
        return Ok(());
    }

    let frame = Frame::measure(figure, root.dim_in_pixel());
    let (xs, ys) = frame.breakpoints();
    let cells = root.split_by_breakpoints(xs, ys);

    for (panel, cell) in figure.panels().iter().zip(cells.iter()) {
        if !panel.visible {
            continue;
        }
        draw_panel(panel, cell, figure.geometry(), frame.cell(panel.pos))?;
    }
    Ok(())
}

/// Pixel budget of the grid.
struct Frame {
    n: i32,
    top: i32,
    left: i32,
    bottom: i32,
    cell_w: i32,
    cell_h: i32,
    gap_w: i32,
    gap_h: i32,
    /// Right margin plus the width lost to integer division, taken up by the last column.
    spare_w: i32,
    /// Height lost to integer division, taken up by the last row.
    spare_h: i32,
}

/// Insets applied inside one cell: margins first, then the label areas.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellLayout {
    width: i32,
    height: i32,
    margin_left: i32,
    margin_right: i32,
    margin_top: i32,
    margin_bottom: i32,
    y_label_area: i32,
    x_label_area: i32,
}

impl CellLayout {
    fn plot_size(&self) -> (i32, i32) {
        (
            self.width - self.margin_left - self.margin_right - self.y_label_area,
            self.height - self.margin_top - self.margin_bottom - self.x_label_area,
        )
    }
}

impl Frame {
    fn measure(figure: &Figure, (w, h): (u32, u32)) -> Self {
        let g = figure.geometry();
        let n = figure.n().max(1) as i32;
        let (w, h) = (w as i32, h as i32);
        let tick_px = g.points_to_pixels(max_tick_pt(figure));
        let label_px = g.points_to_pixels(max_label_pt(figure));

        // Room for tick text plus an axis description.
        let left = (tick_px * 3.5 + label_px * 1.6).round() as i32;
        let bottom = (tick_px * 2.0 + label_px * 1.6).round() as i32;
        let top = (h as f64 * 0.02).round() as i32;
        let right = (w as f64 * 0.02).round() as i32;

        let cell_w = ((w - left - right) / n).max(1);
        let cell_h = ((h - top - bottom) / n).max(1);
        Self {
            n,
            top,
            left,
            bottom,
            cell_w,
            cell_h,
            gap_w: (g.wspace * cell_w as f64 / 2.0).round() as i32,
            gap_h: (g.hspace * cell_h as f64 / 2.0).round() as i32,
            spare_w: (w - left - n * cell_w).max(0),
            spare_h: (h - top - bottom - n * cell_h).max(0),
        }
    }

    /// Column and row breakpoints for `split_by_breakpoints`.
    fn breakpoints(&self) -> (Vec<i32>, Vec<i32>) {
        let xs = (1..self.n).map(|k| self.left + k * self.cell_w).collect();
        let ys = (1..self.n).map(|k| self.top + k * self.cell_h).collect();
        (xs, ys)
    }

    fn cell(&self, pos: PanelPos) -> CellLayout {
        let (col, row) = (pos.col as i32, pos.row as i32);
        let first_column = col == 0;
        let last_column = col + 1 == self.n;
        let first_row = row == 0;
        let last_row = row + 1 == self.n;

        let mut width = self.cell_w;
        if first_column {
            width += self.left;
        }
        if last_column {
            width += self.spare_w;
        }
        let mut height = self.cell_h;
        if first_row {
            height += self.top;
        }
        if last_row {
            height += self.bottom + self.spare_h;
        }

        CellLayout {
            width,
            height,
            margin_left: self.gap_w,
            margin_right: self.gap_w + if last_column { self.spare_w } else { 0 },
            margin_top: self.gap_h + if first_row { self.top } else { 0 },
            margin_bottom: self.gap_h + if last_row { self.spare_h } else { 0 },
            y_label_area: if first_column { self.left } else { 0 },
            x_label_area: if last_row { self.bottom } else { 0 },
        }
    }
}

fn max_tick_pt(figure: &Figure) -> f64 {
    figure
        .panels()
        .iter()
        .flat_map(|p| [&p.x_axis, &p.y_axis])
        .filter_map(|a| a.tick_label_style.map(|s| s.size))
        .fold(DEFAULT_TICK_PT, f64::max)
}

fn max_label_pt(figure: &Figure) -> f64 {
    figure
        .panels()
        .iter()
        .flat_map(|p| [&p.x_axis, &p.y_axis])
        .filter_map(|a| a.label.as_ref().map(|l| l.size))
        .fold(0.0, f64::max)
}

fn draw_panel<DB: DrawingBackend>(
    panel: &Panel,
    cell: &DrawingArea<DB, Shift>,
    geometry: &GridGeometry,
    layout: CellLayout,
) -> Result<(), PairsError> {
    let (x_range, y_range) = panel_ranges(panel);

    let mut builder = ChartBuilder::on(cell);
    builder
        .margin_left(layout.margin_left)
        .margin_right(layout.margin_right)
        .margin_top(layout.margin_top)
        .margin_bottom(layout.margin_bottom);
    if layout.y_label_area > 0 {
        builder.y_label_area_size(layout.y_label_area);
    }
    if layout.x_label_area > 0 {
        builder.x_label_area_size(layout.x_label_area);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(PairsError::from_drawing)?;

    configure_axes(&mut chart, panel, geometry)?;

    let mut artists: Vec<&Artist> = panel.artists.iter().collect();
    artists.sort_by_key(|a| a.z_order());
    let bounds = Bounds {
        x: x_range,
        y: y_range,
    };
    for artist in artists {
        draw_artist(&mut chart, artist, &bounds, geometry)?;
    }

    for note in &panel.annotations {
        let at = (
            x_range.0 + note.at.0 * (x_range.1 - x_range.0),
            y_range.0 + note.at.1 * (y_range.1 - y_range.0),
        );
        let style = font(geometry.points_to_pixels(note.size));
        chart
            .draw_series(std::iter::once(Text::new(note.text.clone(), at, style)))
            .map_err(PairsError::from_drawing)?;
    }

    if let Some(edge) = panel.edge_color {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x_range.0, y_range.0), (x_range.1, y_range.1)],
                rgb(edge).stroke_width(1),
            )))
            .map_err(PairsError::from_drawing)?;
    }
    Ok(())
}

fn configure_axes<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    panel: &Panel,
    geometry: &GridGeometry,
) -> Result<(), PairsError> {
    let plain = |v: &f64| tick_text(*v);
    let blank = |_: &f64| String::new();
    let x_fmt: &dyn Fn(&f64) -> String = if panel.x_axis.tick_labels_visible {
        &plain
    } else {
        &blank
    };
    let y_fmt: &dyn Fn(&f64) -> String = if panel.y_axis.tick_labels_visible {
        &plain
    } else {
        &blank
    };
    let edge = rgb(panel.edge_color.unwrap_or(PairsColor::BLACK));
    let tick_font = |axis: &AxisState| {
        let pt = axis.tick_label_style.map_or(DEFAULT_TICK_PT, |s| s.size);
        font(geometry.points_to_pixels(pt))
    };
    let desc_pt = [&panel.x_axis, &panel.y_axis]
        .iter()
        .filter_map(|a| a.shown_label().map(|l| l.size))
        .fold(0.0, f64::max);

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(tick_count(&panel.x_axis))
        .y_labels(tick_count(&panel.y_axis))
        .x_label_formatter(x_fmt)
        .y_label_formatter(y_fmt)
        .x_label_style(tick_font(&panel.x_axis))
        .y_label_style(tick_font(&panel.y_axis))
        .axis_style(edge.stroke_width(1));
    if desc_pt > 0.0 {
        mesh.axis_desc_style(font(geometry.points_to_pixels(desc_pt)));
    }
    if let Some(label) = panel.x_axis.shown_label() {
        mesh.x_desc(label.text.clone());
    }
    if let Some(label) = panel.y_axis.shown_label() {
        mesh.y_desc(label.text.clone());
    }
    if !panel.x_axis.ticks_visible {
        mesh.disable_x_axis();
    }
    if !panel.y_axis.ticks_visible {
        mesh.disable_y_axis();
    }
    mesh.draw().map_err(PairsError::from_drawing)
}

fn tick_count(axis: &AxisState) -> usize {
    if axis.ticks_visible {
        axis.max_ticks.unwrap_or(5)
    } else {
        0
    }
}

fn draw_artist<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    artist: &Artist,
    bounds: &Bounds,
    geometry: &GridGeometry,
) -> Result<(), PairsError> {
    match artist {
        Artist::Line { xs, ys, spec } => {
            let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
            let pieces: Vec<_> = points
                .windows(2)
                .filter_map(|w| bounds.clip(w[0], w[1]))
                .collect();
            stroke(chart, &pieces, spec, geometry)
        }
        Artist::VLine { x, spec } => {
            let piece = bounds.clip((*x, bounds.y.0), (*x, bounds.y.1));
            stroke(chart, piece.as_slice(), spec, geometry)
        }
        Artist::HLine { y, spec } => {
            let piece = bounds.clip((bounds.x.0, *y), (bounds.x.1, *y));
            stroke(chart, piece.as_slice(), spec, geometry)
        }
        Artist::Scatter { xs, ys, spec } => scatter(chart, xs, ys, spec, bounds, geometry),
        Artist::Contour(set) => contour(chart, set, bounds, geometry),
    }
}

fn stroke<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    pieces: &[((f64, f64), (f64, f64))],
    spec: &LineSpec,
    geometry: &GridGeometry,
) -> Result<(), PairsError> {
    let style = rgb(spec.color).stroke_width(line_px(spec.width, geometry));
    let paths: Vec<Vec<(f64, f64)>> = match spec.style.dash_pattern() {
        None => join_runs(pieces),
        Some(pattern) => {
            let scale = geometry.points_to_pixels(spec.width.max(1.0));
            let view = &*chart;
            pieces
                .iter()
                .flat_map(|&(a, b)| dash(view, a, b, pattern, scale))
                .collect()
        }
    };
    chart
        .draw_series(paths.into_iter().map(|p| PathElement::new(p, style)))
        .map_err(PairsError::from_drawing)?;
    Ok(())
}

/// Merge consecutive clipped pieces that share endpoints into polylines.
fn join_runs(pieces: &[((f64, f64), (f64, f64))]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    for &(a, b) in pieces {
        match runs.last_mut() {
            Some(run) if run.last() == Some(&a) => run.push(b),
            _ => runs.push(vec![a, b]),
        }
    }
    runs
}

/// Split a segment into on/off pieces measured in backend pixels.
fn dash<DB: DrawingBackend>(
    chart: &PanelChart<'_, DB>,
    a: (f64, f64),
    b: (f64, f64),
    pattern: &[f64],
    scale: f64,
) -> Vec<Vec<(f64, f64)>> {
    let (pa, pb) = (chart.backend_coord(&a), chart.backend_coord(&b));
    let len = (((pb.0 - pa.0) as f64).powi(2) + ((pb.1 - pa.1) as f64).powi(2)).sqrt();
    if len < 1.0 {
        return vec![vec![a, b]];
    }
    let lerp = |t: f64| (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1));
    let mut out = Vec::new();
    let mut at = 0.0;
    let mut on = true;
    for step in pattern.iter().cycle() {
        if at >= len {
            break;
        }
        let next = (at + step * scale).min(len);
        if on {
            out.push(vec![lerp(at / len), lerp(next / len)]);
        }
        at = next;
        on = !on;
    }
    out
}

fn scatter<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    xs: &[f64],
    ys: &[f64],
    spec: &ScatterSpec,
    bounds: &Bounds,
    geometry: &GridGeometry,
) -> Result<(), PairsError> {
    // Marker size is an area in points squared.
    let radius = (geometry.points_to_pixels(spec.size.max(0.0).sqrt()) / 2.0)
        .round()
        .max(1.0) as i32;
    let fill = rgb(spec.color).mix(spec.alpha.clamp(0.0, 1.0)).filled();
    let points = xs
        .iter()
        .copied()
        .zip(ys.iter().copied())
        .filter(|&p| bounds.contains(p));
    chart
        .draw_series(points.map(|p| Circle::new(p, radius, fill)))
        .map_err(PairsError::from_drawing)?;
    if spec.edge_color != spec.color {
        let edge = rgb(spec.edge_color).mix(spec.alpha.clamp(0.0, 1.0));
        let points = xs
            .iter()
            .copied()
            .zip(ys.iter().copied())
            .filter(|&p| bounds.contains(p));
        chart
            .draw_series(points.map(|p| Circle::new(p, radius, edge.stroke_width(1))))
            .map_err(PairsError::from_drawing)?;
    }
    Ok(())
}

fn contour<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    set: &ContourSet,
    bounds: &Bounds,
    geometry: &GridGeometry,
) -> Result<(), PairsError> {
    let width = line_px(set.width, geometry);
    for level in &set.levels {
        let style = rgb(level.color).stroke_width(width);
        let pieces = level
            .segments
            .iter()
            .filter_map(|s| bounds.clip(s.start, s.end));
        chart
            .draw_series(pieces.map(|(a, b)| PathElement::new(vec![a, b], style)))
            .map_err(PairsError::from_drawing)?;
    }
    Ok(())
}

/// Visible data rectangle of one panel.
struct Bounds {
    x: (f64, f64),
    y: (f64, f64),
}

impl Bounds {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        let (x0, x1) = ordered(self.x);
        let (y0, y1) = ordered(self.y);
        (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
    }

    /// Liang-Barsky clip of segment `a`-`b`.
    fn clip(&self, a: (f64, f64), b: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (x0, x1) = ordered(self.x);
        let (y0, y1) = ordered(self.y);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [
            (-dx, a.0 - x0),
            (dx, x1 - a.0),
            (-dy, a.1 - y0),
            (dy, y1 - a.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| (a.0 + t * dx, a.1 + t * dy);
        Some((at(t0), at(t1)))
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Explicit limits where set, otherwise the extent of the panel's artists padded by 5%.
fn panel_ranges(panel: &Panel) -> ((f64, f64), (f64, f64)) {
    let mut ext = Extent::default();
    for artist in &panel.artists {
        match artist {
            Artist::Line { xs, ys, .. } | Artist::Scatter { xs, ys, .. } => {
                xs.iter().for_each(|&v| ext.x.push(v));
                ys.iter().for_each(|&v| ext.y.push(v));
            }
            Artist::VLine { x, .. } => ext.x.push(*x),
            Artist::HLine { y, .. } => ext.y.push(*y),
            Artist::Contour(set) => {
                for s in set.levels.iter().flat_map(|l| &l.segments) {
                    for (x, y) in [s.start, s.end] {
                        ext.x.push(x);
                        ext.y.push(y);
                    }
                }
            }
        }
    }
    let x = panel.x_axis.limits.unwrap_or_else(|| ext.x.padded());
    let y = panel.y_axis.limits.unwrap_or_else(|| ext.y.padded());
    (widen(x), widen(y))
}

#[derive(Default)]
struct Extent {
    x: Span,
    y: Span,
}

#[derive(Default)]
struct Span(Option<(f64, f64)>);

impl Span {
    fn push(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.0 = Some(match self.0 {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    fn padded(&self) -> (f64, f64) {
        match self.0 {
            Some((lo, hi)) => {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
            None => (0.0, 1.0),
        }
    }
}

/// Plotters needs a non-empty range.
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn tick_text(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn line_px(width_pt: f64, geometry: &GridGeometry) -> u32 {
    geometry.points_to_pixels(width_pt).round().max(1.0) as u32
}

fn font(px: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, px.max(1.0), FontStyle::Normal)
}

fn rgb(c: PairsColor) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}
