use crate::render::PanelPos;

/// What a grid cell shows, decided once from its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelRole {
    /// `row == col`: marginal density of one variable.
    Diagonal,
    /// `row > col`: joint density of (col, row).
    Lower,
    /// `row < col`: upper triangle, hidden.
    Suppressed,
}

impl PanelRole {
    pub fn of(pos: PanelPos) -> Self {
        use std::cmp::Ordering::*;
        match pos.row.cmp(&pos.col) {
            Equal => PanelRole::Diagonal,
            Greater => PanelRole::Lower,
            Less => PanelRole::Suppressed,
        }
    }
}

/// Where a panel sits on the grid border; drives tick and label placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelEdges {
    pub first_column: bool,
    pub last_row: bool,
    pub last_column: bool,
}

impl PanelEdges {
    pub fn of(pos: PanelPos, n: usize) -> Self {
        Self {
            first_column: pos.col == 0,
            last_row: pos.row + 1 == n,
            last_column: pos.col + 1 == n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_split_the_grid() {
        assert_eq!(PanelRole::of(PanelPos::new(1, 1)), PanelRole::Diagonal);
        assert_eq!(PanelRole::of(PanelPos::new(2, 0)), PanelRole::Lower);
        assert_eq!(PanelRole::of(PanelPos::new(0, 2)), PanelRole::Suppressed);
    }

    #[test]
    fn single_panel_touches_every_edge() {
        let e = PanelEdges::of(PanelPos::new(0, 0), 1);
        assert!(e.first_column && e.last_row && e.last_column);
        let e = PanelEdges::of(PanelPos::new(1, 0), 3);
        assert!(e.first_column && !e.last_row && !e.last_column);
    }
}
