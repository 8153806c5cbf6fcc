//! Corner plots ("pairs plots") of multivariate samples.
//!
//! A [`PairsPlot`] turns a [`Dataset`] into an n×n grid: a marginal density on each
//! diagonal panel, joint-density contours (with optional scatter) below it, and the upper
//! triangle hidden. The grid is issued as commands to a [`render::DrawingSurface`]; the
//! default surface records them into a [`Figure`], which [`render::raster::draw_figure`]
//! can rasterize with plotters.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod render;
pub mod style;

pub use crate::config::PairsConfig;
pub use crate::core::dataset::{Dataset, Key};
pub use crate::core::density::{DensityEstimator, GaussianKde};
pub use crate::error::PairsError;
pub use crate::grid::{PairsPlot, Variables};
pub use crate::render::figure::Figure;
