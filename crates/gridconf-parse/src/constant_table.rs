use gridconf_common::{GridRect, Page};

use crate::ParseOptions;
use crate::names::field_name;
use crate::table::{ConstantItem, ConstantTable};

/// Read a Constant Table whose `const | value` header sits at `(row, col)`.
///
/// Values are left at 0 here; ID normalization assigns them.
pub(crate) fn parse_constant_table(
    page: &Page,
    name: String,
    row: u32,
    col: u32,
    opts: &ParseOptions,
) -> ConstantTable {
    let mut items = Vec::new();
    let mut check = row + 1;

    while check < page.rows() {
        let key = page.text(check, col);
        if key.is_empty() || opts.is_end(key) {
            break;
        }
        if !opts.is_disabled(key) {
            let raw_value = page.cell(check, col + 1).filter(|s| !s.is_empty());
            let comment = page.cell(check, col + 2).filter(|s| !s.is_empty());
            items.push(ConstantItem {
                name: field_name(key),
                raw_value: raw_value.map(str::to_string),
                value: 0,
                row: check,
                comment: comment.map(str::to_string),
            });
        }
        check += 1;
    }

    ConstantTable {
        name,
        page: page.name.clone(),
        bounds: GridRect::new(row, col, check - 1, col + 2),
        items,
    }
}
