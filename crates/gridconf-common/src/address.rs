//! Spreadsheet-style cell naming (`A1`, `AB12`) for diagnostics.
//!
//! Grid coordinates are 0-based everywhere in gridconf; these helpers are
//! the only place they turn into the 1-based, lettered form a user sees.

/// Convert a 0-based column index into its spreadsheet letter (`0` → `A`,
/// `25` → `Z`, `26` → `AA`).
pub fn column_letter(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style name for a 0-based `(row, col)` pair.
pub fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row as u64 + 1)
}
