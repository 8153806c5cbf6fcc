//! Sigma levels → probability mass fractions → per-panel density thresholds.
//!
//! For a 2-D Gaussian the region inside k standard deviations holds mass
//! `1 - exp(-k^2 / 2)`. Fractions are computed once; each joint panel scales them by
//! its own density peak, so contours are panel-relative rather than globally scaled.

use crate::error::PairsError;
use tracing::debug;

/// Mass enclosed by the `k`-sigma region of a 2-D Gaussian.
pub fn sigma_to_mass(k: f64) -> f64 {
    1.0 - (-0.5 * k * k).exp()
}

/// Validated, ascending sigma levels with their mass fractions precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct SigmaLevels {
    sigmas: Vec<f64>,
    fractions: Vec<f64>,
}

impl SigmaLevels {
    /// Levels must be non-empty, positive and finite. They are sorted ascending so nested contours
    /// are always handed to the renderer from the outermost (lowest density) inward.
    pub fn new(levels: &[f64]) -> Result<Self, PairsError> {
        if levels.is_empty() {
            return Err(PairsError::InvalidConfig(
                "at least one sigma level is required".into(),
            ));
        }
        if let Some(bad) = levels.iter().find(|k| !(k.is_finite() && **k > 0.0)) {
            return Err(PairsError::InvalidConfig(format!(
                "sigma level {bad} must be positive and finite"
            )));
        }
        let mut sigmas = levels.to_vec();
        if sigmas.windows(2).any(|w| w[1] < w[0]) {
            debug!(?levels, "sigma levels not ascending; sorting");
            sigmas.sort_by(f64::total_cmp);
        }
        let fractions = sigmas.iter().map(|&k| sigma_to_mass(k)).collect();
        Ok(Self { sigmas, fractions })
    }

    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    /// Absolute contour thresholds for a panel whose density peaks at `peak`.
    pub fn thresholds(&self, peak: f64) -> Vec<f64> {
        self.fractions.iter().map(|m| m * peak).collect()
    }
}
