//! Grid layout engine: walks the n×n panel grid and issues drawing commands.

pub mod layout;
pub mod role;

pub use layout::{PairsPlot, Variables};
pub use role::{PanelEdges, PanelRole};
