//! Density estimation adapter.
//! density: probability per unit coordinate, sampled on a grid; mass: its integral.
//!
//! The grid engine only sees [`DensityEstimator`]. [`GaussianKde`] is the default
//! backend: fixed-bandwidth Gaussian kernels evaluated on an evenly spaced grid.

use crate::core::limits::quantile_sorted;
use std::f64::consts::PI;

/// Kernel contributions beyond this many bandwidths are dropped (exp(-18) ~ 1.5e-8).
const GAUSSIAN_CUTOFF: f64 = 6.0;

/// Grid padding beyond the sample extremes, in bandwidths.
const GRID_PAD_BANDWIDTHS: f64 = 3.0;

/// Marginal density sampled on `coords`.
#[derive(Clone, Debug, PartialEq)]
pub struct Density1d {
    pub coords: Vec<f64>,
    pub values: Vec<f64>,
}

/// Joint density on the `x` × `y` grid. `z[iy][ix]` is the value at (`x[ix]`, `y[iy]`).
#[derive(Clone, Debug, PartialEq)]
pub struct Density2d {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl Density2d {
    /// Largest density value on the grid (0 for an empty grid).
    pub fn peak(&self) -> f64 {
        self.z
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0f64, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DensityError {
    #[error("need at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("samples contain non-finite values")]
    NonFinite,
    #[error("series has zero variance")]
    ZeroVariance,
    #[error("paired series differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("density values exceed the f64 range")]
    OutOfRange,
}

/// Capability interface for marginal and joint density estimation.
pub trait DensityEstimator {
    fn estimate_1d(&self, samples: &[f64]) -> Result<Density1d, DensityError>;
    fn estimate_2d(&self, xs: &[f64], ys: &[f64]) -> Result<Density2d, DensityError>;
}

impl<E: DensityEstimator + ?Sized> DensityEstimator for &E {
    fn estimate_1d(&self, samples: &[f64]) -> Result<Density1d, DensityError> {
        (**self).estimate_1d(samples)
    }

    fn estimate_2d(&self, xs: &[f64], ys: &[f64]) -> Result<Density2d, DensityError> {
        (**self).estimate_2d(xs, ys)
    }
}

/// Gaussian kernel density estimator.
///
/// Marginals use Silverman's rule of thumb, joints use a per-axis Scott bandwidth with a
/// product kernel. Output is deterministic for identical input.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKde {
    pub grid_points_1d: usize,
    pub grid_points_2d: usize,
}

impl Default for GaussianKde {
    fn default() -> Self {
        Self {
            grid_points_1d: 256,
            grid_points_2d: 64,
        }
    }
}

impl GaussianKde {
    pub fn new(grid_points_1d: usize, grid_points_2d: usize) -> Self {
        Self {
            grid_points_1d: grid_points_1d.max(2),
            grid_points_2d: grid_points_2d.max(2),
        }
    }
}

struct Moments {
    min: f64,
    max: f64,
    std: f64,
}

fn check_samples(samples: &[f64]) -> Result<Moments, DensityError> {
    let n = samples.len();
    if n < 2 {
        return Err(DensityError::TooFewSamples(n));
    }
    if samples.iter().any(|v| !v.is_finite()) {
        return Err(DensityError::NonFinite);
    }
    // Moments of samples / scale, so sums stay finite near f64::MAX and squares of tiny
    // values do not underflow.
    let scale = samples.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Err(DensityError::ZeroVariance);
    }
    let mean = samples.iter().map(|v| v / scale).sum::<f64>() / n as f64;
    let var = samples
        .iter()
        .map(|v| (v / scale - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let std = scale * var.sqrt();
    if std <= 0.0 || !std.is_finite() {
        return Err(DensityError::ZeroVariance);
    }
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Ok(Moments { min, max, std })
}

/// Silverman's rule: 0.9 * min(sd, IQR/1.34) * n^(-1/5), falling back to sd when IQR is 0.
pub fn silverman_bandwidth(samples: &[f64], std: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let spread = if iqr > 0.0 { std.min(iqr / 1.34) } else { std };
    0.9 * spread * (samples.len() as f64).powf(-0.2)
}

/// Scott's rule for a 2-D product kernel: sd * n^(-1/6).
pub fn scott_bandwidth_2d(std: f64, n: usize) -> f64 {
    std * (n as f64).powf(-1.0 / 6.0)
}

fn checked_norm(norm: f64) -> Result<f64, DensityError> {
    if norm.is_finite() && norm > 0.0 {
        Ok(norm)
    } else {
        Err(DensityError::OutOfRange)
    }
}

fn linspace(lo: f64, hi: f64, num: usize) -> Vec<f64> {
    let step = (hi - lo) / (num - 1) as f64;
    (0..num).map(|i| lo + i as f64 * step).collect()
}

fn padded_grid(m: &Moments, h: f64, num: usize) -> Vec<f64> {
    let pad = GRID_PAD_BANDWIDTHS * h;
    linspace(m.min - pad, m.max + pad, num)
}

/// Unnormalized kernel weights of one sample over a grid.
fn kernel_row(sample: f64, h: f64, grid: &[f64]) -> Vec<f64> {
    grid.iter()
        .map(|&g| {
            let u = (g - sample) / h;
            if u.abs() > GAUSSIAN_CUTOFF {
                0.0
            } else {
                (-0.5 * u * u).exp()
            }
        })
        .collect()
}

impl DensityEstimator for GaussianKde {
    fn estimate_1d(&self, samples: &[f64]) -> Result<Density1d, DensityError> {
        let m = check_samples(samples)?;
        let h = silverman_bandwidth(samples, m.std);
        let norm = checked_norm(1.0 / (samples.len() as f64 * h * (2.0 * PI).sqrt()))?;
        let coords = padded_grid(&m, h, self.grid_points_1d);

        let mut values = vec![0.0f64; coords.len()];
        for &s in samples {
            for (v, k) in values.iter_mut().zip(kernel_row(s, h, &coords)) {
                *v += k;
            }
        }
        for v in &mut values {
            *v *= norm;
        }
        Ok(Density1d { coords, values })
    }

    fn estimate_2d(&self, xs: &[f64], ys: &[f64]) -> Result<Density2d, DensityError> {
        if xs.len() != ys.len() {
            return Err(DensityError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let mx = check_samples(xs)?;
        let my = check_samples(ys)?;
        let n = xs.len();
        let hx = scott_bandwidth_2d(mx.std, n);
        let hy = scott_bandwidth_2d(my.std, n);
        let norm = checked_norm(1.0 / (n as f64 * 2.0 * PI) / hx / hy)?;
        let x = padded_grid(&mx, hx, self.grid_points_2d);
        let y = padded_grid(&my, hy, self.grid_points_2d);

        let mut z = vec![vec![0.0f64; x.len()]; y.len()];
        for (&sx, &sy) in xs.iter().zip(ys) {
            let kx = kernel_row(sx, hx, &x);
            let ky = kernel_row(sy, hy, &y);
            for (row, &wy) in z.iter_mut().zip(&ky) {
                if wy == 0.0 {
                    continue;
                }
                for (cell, &wx) in row.iter_mut().zip(&kx) {
                    *cell += wx * wy;
                }
            }
        }
        for row in &mut z {
            for cell in row.iter_mut() {
                *cell *= norm;
            }
        }
        Ok(Density2d { x, y, z })
    }
}

/// Integrate a density sampled on `coords` (trapezoid rule) to produce total mass.
pub fn density_to_mass(coords: &[f64], density: &[f64]) -> f64 {
    coords
        .windows(2)
        .zip(density.windows(2))
        .map(|(c, d)| 0.5 * (d[0] + d[1]) * (c[1] - c[0]))
        .sum()
}

/// Joint mass over the grid: trapezoid along x for each row, then along y.
pub fn density_to_mass_2d(d: &Density2d) -> f64 {
    let row_mass: Vec<f64> = d.z.iter().map(|row| density_to_mass(&d.x, row)).collect();
    density_to_mass(&d.y, &row_mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};

    fn uniform_samples(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    #[test]
    fn marginal_integrates_to_one() {
        let samples = uniform_samples(500, 42);
        let d = GaussianKde::default().estimate_1d(&samples).unwrap();
        assert_eq!(d.coords.len(), 256);
        assert_eq!(d.values.len(), 256);
        assert_abs_diff_eq!(density_to_mass(&d.coords, &d.values), 1.0, epsilon = 1e-2);
        assert!(d.values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn grid_covers_samples_with_padding() {
        let samples = uniform_samples(200, 7);
        let d = GaussianKde::default().estimate_1d(&samples).unwrap();
        let lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(d.coords[0] < lo);
        assert!(*d.coords.last().unwrap() > hi);
        assert!(d.coords.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn joint_integrates_to_one() {
        let xs = uniform_samples(300, 1);
        let ys: Vec<f64> = xs
            .iter()
            .zip(uniform_samples(300, 2))
            .map(|(x, e)| 0.5 * x + e)
            .collect();
        let d = GaussianKde::default().estimate_2d(&xs, &ys).unwrap();
        assert_eq!(d.z.len(), d.y.len());
        assert!(d.z.iter().all(|row| row.len() == d.x.len()));
        assert_abs_diff_eq!(density_to_mass_2d(&d), 1.0, epsilon = 2e-2);
        assert!(d.peak() > 0.0);
    }

    #[test]
    fn estimation_is_deterministic() {
        let xs = uniform_samples(100, 3);
        let ys = uniform_samples(100, 4);
        let kde = GaussianKde::default();
        assert_eq!(
            kde.estimate_2d(&xs, &ys).unwrap(),
            kde.estimate_2d(&xs, &ys).unwrap()
        );
    }

    #[test]
    fn degenerate_inputs_fail() {
        let kde = GaussianKde::default();
        assert_eq!(
            kde.estimate_1d(&[1.0, 1.0, 1.0]),
            Err(DensityError::ZeroVariance)
        );
        assert_eq!(kde.estimate_1d(&[1.0]), Err(DensityError::TooFewSamples(1)));
        assert_eq!(
            kde.estimate_1d(&[1.0, f64::NAN]),
            Err(DensityError::NonFinite)
        );
        assert_eq!(
            kde.estimate_2d(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(DensityError::LengthMismatch { x: 3, y: 2 })
        );
    }

    #[test]
    fn marginal_holds_at_extreme_magnitudes() {
        let kde = GaussianKde::default();
        for scale in [1e300, 1e-300] {
            let samples: Vec<f64> = uniform_samples(500, 42).iter().map(|v| v * scale).collect();
            let d = kde.estimate_1d(&samples).unwrap();
            assert!(d.coords.iter().chain(&d.values).all(|v| v.is_finite()));
            assert_abs_diff_eq!(density_to_mass(&d.coords, &d.values), 1.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn joint_density_beyond_f64_is_an_error() {
        let xs: Vec<f64> = uniform_samples(200, 5).iter().map(|v| v * 1e-300).collect();
        let ys: Vec<f64> = uniform_samples(200, 6).iter().map(|v| v * 1e-300).collect();
        assert_eq!(
            GaussianKde::default().estimate_2d(&xs, &ys),
            Err(DensityError::OutOfRange)
        );
    }

    #[test]
    fn silverman_matches_hand_computation() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let std = (2.5f64).sqrt();
        // IQR = 4 - 2 = 2; 2 / 1.34 < sd
        let expected = 0.9 * (2.0 / 1.34) * 5f64.powf(-0.2);
        assert_abs_diff_eq!(silverman_bandwidth(&samples, std), expected, epsilon = 1e-12);
    }
}
