#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive, 0-based rectangle of cells occupied by a table on one page.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl GridRect {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row: start_row.min(end_row),
            start_col: start_col.min(end_col),
            end_row: end_row.max(start_row),
            end_col: end_col.max(start_col),
        }
    }

    /// Grow the rectangle by `margin` cells on every side, clamped at row/col 0.
    pub fn expand(&self, margin: u32) -> Self {
        Self {
            start_row: self.start_row.saturating_sub(margin),
            start_col: self.start_col.saturating_sub(margin),
            end_row: self.end_row.saturating_add(margin),
            end_col: self.end_col.saturating_add(margin),
        }
    }

    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_clamps_at_origin() {
        let r = GridRect::new(0, 0, 2, 3).expand(1);
        assert_eq!(r, GridRect::new(0, 0, 3, 4));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = GridRect::new(0, 0, 4, 3);
        let b = GridRect::new(4, 3, 6, 6);
        let c = GridRect::new(6, 0, 8, 2);
        assert!(a.overlaps(&b) && b.overlaps(&a));
        assert!(!a.overlaps(&c) && !c.overlaps(&a));
        assert!(a.expand(1).overlaps(&GridRect::new(5, 0, 6, 0)));
    }
}
