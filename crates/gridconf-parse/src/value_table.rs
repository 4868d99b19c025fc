use gridconf_common::{GridRect, Page};

use crate::ParseOptions;
use crate::names::field_name;
use crate::schema::{ArrayKind, TypeDecl};
use crate::table::{ValueItem, ValueTable};

const TYPE_COL: u32 = 1;
const VALUE_COL: u32 = 2;
const COMMENT_COL: u32 = 3;

/// One item as read from the grid, before the disabled filter.
struct RawItem {
    id: String,
    row: u32,
    height: u32,
    type_text: String,
    values: Vec<(u32, String)>,
    comments: Vec<String>,
}

fn read_item(page: &Page, row: u32, col: u32, opts: &ParseOptions) -> Option<RawItem> {
    let id = page.text(row, col);
    if id.is_empty() || opts.is_end(id) {
        return None;
    }

    let mut item = RawItem {
        id: id.to_string(),
        row,
        height: 1,
        type_text: String::new(),
        values: Vec::new(),
        comments: Vec::new(),
    };

    let mut last_content = row;
    let mut check = row;
    loop {
        let ty = page.text(check, col + TYPE_COL);
        let value = page.text(check, col + VALUE_COL);
        let comment = page.text(check, col + COMMENT_COL);

        if item.type_text.is_empty() && !ty.is_empty() {
            item.type_text = ty.to_string();
        }
        if !value.is_empty() {
            item.values.push((check, value.to_string()));
        }
        if !comment.is_empty() {
            item.comments.push(comment.to_string());
        }
        if !(ty.is_empty() && value.is_empty() && comment.is_empty()) {
            last_content = check;
        }

        check += 1;
        if check >= page.rows() || !page.is_blank(check, col) {
            break;
        }
    }

    // trailing fully blank rows separate tables, they are not continuation
    item.height = last_content - row + 1;
    Some(item)
}

impl RawItem {
    fn into_item(self) -> ValueItem {
        let decl = TypeDecl::parse(&self.type_text, false);
        let tokenizer = decl.tokenizer();

        let (values, value_rows) = match decl.array {
            ArrayKind::Multicell => self.values.into_iter().map(|(r, v)| (v, r)).unzip(),
            ArrayKind::OneCell => match self.values.into_iter().next() {
                Some((r, v)) => (tokenizer.tokenize(&v), vec![r]),
                None => (Vec::new(), Vec::new()),
            },
            ArrayKind::None => match self.values.into_iter().next() {
                Some((r, v)) => (vec![v], vec![r]),
                None => (Vec::new(), Vec::new()),
            },
        };

        ValueItem {
            id: field_name(&self.id),
            declared_type: decl.base,
            array: decl.array,
            delimiter: decl.delimiter,
            values,
            value_rows,
            row: self.row,
            height: self.height,
            comment: if self.comments.is_empty() {
                None
            } else {
                Some(self.comments.join("\n"))
            },
        }
    }
}

/// Read a Value Table whose `id | type | value` header sits at `(row, col)`.
pub(crate) fn parse_value_table(
    page: &Page,
    name: String,
    row: u32,
    col: u32,
    opts: &ParseOptions,
) -> ValueTable {
    let mut items = Vec::new();
    let mut check = row + 1;
    let mut end_row = row;

    while let Some(raw) = read_item(page, check, col, opts) {
        check = raw.row + raw.height;
        end_row = check - 1;
        if opts.is_disabled(&raw.id) {
            continue;
        }
        items.push(raw.into_item());
    }

    ValueTable {
        name,
        page: page.name.clone(),
        bounds: GridRect::new(row, col, end_row, col + COMMENT_COL),
        items,
    }
}
