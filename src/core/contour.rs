//! Iso-line extraction (marching squares) over a sampled joint density.

use crate::core::density::Density2d;

/// Straight piece of an iso-line in data coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// All segments where `surface` crosses `level`.
///
/// Crossing points are linearly interpolated along cell edges. Cells with a NaN corner
/// are skipped. Saddle cells emit two disjoint segments.
pub fn march_squares(surface: &Density2d, level: f64) -> Vec<Segment> {
    let (x, y, z) = (&surface.x, &surface.y, &surface.z);
    if x.len() < 2 || y.len() < 2 || z.len() != y.len() {
        return vec![];
    }

    let mut segments = Vec::new();
    for iy in 0..y.len() - 1 {
        let (row0, row1) = (&z[iy], &z[iy + 1]);
        if row0.len() != x.len() || row1.len() != x.len() {
            continue;
        }
        for ix in 0..x.len() - 1 {
            let c = Cell {
                x0: x[ix],
                x1: x[ix + 1],
                y0: y[iy],
                y1: y[iy + 1],
                tl: row0[ix],
                tr: row0[ix + 1],
                bl: row1[ix],
                br: row1[ix + 1],
            };
            if [c.tl, c.tr, c.bl, c.br].iter().any(|v| v.is_nan()) {
                continue;
            }
            c.segments(level, &mut segments);
        }
    }
    segments
}

/// One grid cell. "top" is the `y0` edge and "bottom" the `y1` edge.
struct Cell {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    tl: f64,
    tr: f64,
    bl: f64,
    br: f64,
}

impl Cell {
    fn segments(&self, level: f64, out: &mut Vec<Segment>) {
        let mut case = 0u8;
        if self.tl >= level {
            case |= 1;
        }
        if self.tr >= level {
            case |= 2;
        }
        if self.br >= level {
            case |= 4;
        }
        if self.bl >= level {
            case |= 8;
        }
        if case == 0 || case == 15 {
            return;
        }

        let top = edge_point((self.x0, self.y0), (self.x1, self.y0), self.tl, self.tr, level);
        let right = edge_point((self.x1, self.y0), (self.x1, self.y1), self.tr, self.br, level);
        let bottom = edge_point((self.x0, self.y1), (self.x1, self.y1), self.bl, self.br, level);
        let left = edge_point((self.x0, self.y0), (self.x0, self.y1), self.tl, self.bl, level);

        let mut push = |start, end| out.push(Segment { start, end });
        match case {
            1 | 14 => push(left, top),
            2 | 13 => push(top, right),
            3 | 12 => push(left, right),
            4 | 11 => push(right, bottom),
            5 => {
                push(left, top);
                push(right, bottom);
            }
            6 | 9 => push(top, bottom),
            7 | 8 => push(left, bottom),
            10 => {
                push(top, right);
                push(left, bottom);
            }
            _ => {}
        }
    }
}

fn edge_point(p1: (f64, f64), p2: (f64, f64), v1: f64, v2: f64, level: f64) -> (f64, f64) {
    if (v2 - v1).abs() < f64::EPSILON {
        return ((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Cone peaking at the origin: z = 1 - r on a 21x21 grid over [-1, 1]^2.
    fn cone() -> Density2d {
        let axis: Vec<f64> = (0..21).map(|i| -1.0 + i as f64 * 0.1).collect();
        let z = axis
            .iter()
            .map(|&y| axis.iter().map(|&x| 1.0 - (x * x + y * y).sqrt()).collect())
            .collect();
        Density2d {
            x: axis.clone(),
            y: axis,
            z,
        }
    }

    #[test]
    fn level_above_peak_has_no_segments() {
        assert!(march_squares(&cone(), 1.5).is_empty());
    }

    #[test]
    fn cone_iso_line_is_circle() {
        let segments = march_squares(&cone(), 0.5);
        assert!(!segments.is_empty());
        for s in &segments {
            for (px, py) in [s.start, s.end] {
                let r = (px * px + py * py).sqrt();
                assert_abs_diff_eq!(r, 0.5, epsilon = 0.03);
            }
        }
    }

    #[test]
    fn saddle_cell_emits_two_segments() {
        let d = Density2d {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            z: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        };
        assert_eq!(march_squares(&d, 0.5).len(), 2);
    }

    #[test]
    fn nan_cells_are_skipped() {
        let d = Density2d {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            z: vec![vec![f64::NAN, 0.0], vec![0.0, 1.0]],
        };
        assert!(march_squares(&d, 0.5).is_empty());
    }
}
