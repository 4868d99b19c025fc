#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sheet's raw grid, row-major. Rows may be ragged; missing cells and
/// `None` cells are both blank.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Page {
    pub name: String,
    pub cells: Vec<Vec<Option<String>>>,
}

impl Page {
    pub fn new(name: impl Into<String>, cells: Vec<Vec<Option<String>>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a page from string literals; empty strings become blank cells.
    pub fn from_rows<R, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| {
                        let s = s.as_ref();
                        if s.is_empty() {
                            None
                        } else {
                            Some(s.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(name, cells)
    }

    pub fn rows(&self) -> u32 {
        self.cells.len() as u32
    }

    /// Number of cells in the given row (0 if the row does not exist).
    pub fn cols(&self, row: u32) -> u32 {
        self.cells.get(row as usize).map_or(0, |r| r.len() as u32)
    }

    /// Trimmed cell text, or `None` if the cell is outside the grid or unset.
    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        self.cells
            .get(row as usize)?
            .get(col as usize)?
            .as_deref()
            .map(str::trim)
    }

    /// Trimmed cell text with missing cells read as `""`.
    pub fn text(&self, row: u32, col: u32) -> &str {
        self.cell(row, col).unwrap_or("")
    }

    pub fn is_blank(&self, row: u32, col: u32) -> bool {
        self.text(row, col).is_empty()
    }
}
