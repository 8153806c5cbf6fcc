//! Crate-level error type.

use crate::core::dataset::Key;
use crate::core::density::DensityError;

/// Errors returned while building a pairs plot.
#[derive(Debug, thiserror::Error)]
pub enum PairsError {
    /// Caller supplied inputs that disagree with the resolved variable set.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A requested key does not exist in the dataset.
    #[error("cannot resolve variable {key} in dataset")]
    IndexResolution { key: Key },

    /// The density estimator failed for the panel at (`row`, `col`).
    #[error("density estimation failed for panel ({row}, {col})")]
    Estimation {
        row: usize,
        col: usize,
        #[source]
        source: DensityError,
    },

    /// Axis limits requested for a series with no samples.
    #[error("variable {key} has no samples")]
    EmptySeries { key: Key },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Backend failure while rasterizing a figure.
    #[error("render failed: {0}")]
    Render(String),
}

impl PairsError {
    pub fn from_drawing<E: std::error::Error + Send + Sync>(
        err: plotters::drawing::DrawingAreaErrorKind<E>,
    ) -> Self {
        PairsError::Render(err.to_string())
    }
}
