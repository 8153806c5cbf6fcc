//! Numerical building blocks without any notion of panels or drawing.

pub mod contour;
pub mod dataset;
pub mod density;
pub mod index;
pub mod levels;
pub mod limits;
