use gridconf_common::{GridRect, Page};

use crate::ParseOptions;
use crate::names::field_name;
use crate::object::{DataArray, DataField, DataObject};
use crate::schema::{ArrayKind, FieldNode, TypeDecl, header_path};
use crate::table::DatabaseTable;

/// Read a Database Table whose `id` header sits at `(row, col)`.
///
/// Layout: optional comment row above the header, the header row with
/// (dotted) field names, a type row, then row-blocks of data.
pub(crate) fn parse_database_table(
    page: &Page,
    name: String,
    row: u32,
    col: u32,
    opts: &ParseOptions,
) -> DatabaseTable {
    let type_row = row + 1;
    let mut root = FieldNode::root(&name, col);

    // An untyped ID column means int IDs and one row per record.
    let id_cell = page.text(type_row, col);
    let (id_decl, max_height) = if id_cell.is_empty() {
        (TypeDecl::parse("int", false), 1)
    } else {
        (TypeDecl::parse(id_cell, false), u32::MAX)
    };
    let int_ids = id_decl.base.eq_ignore_ascii_case("int");
    // The cell above the ID column is the table's own anchor.
    root.insert_path(&[field_name("id")], &id_decl, col, None);

    let mut end_col = col;
    let mut header_col = col + 1;
    loop {
        let header = page.text(row, header_col);
        if header.is_empty() {
            break;
        }
        end_col = header_col;
        if !opts.is_disabled(header) {
            let decl = TypeDecl::parse(page.text(type_row, header_col), true);
            root.insert_path(
                &header_path(header),
                &decl,
                header_col,
                comment_above(page, row, header_col),
            );
        }
        header_col += 1;
    }

    root.sort_leaves_first();
    root.fill_base_types();

    let rows = page.rows();
    let mut objects = Vec::new();
    let mut end_row = type_row;
    let mut check = type_row + 1;

    while check < rows {
        let id = page.text(check, col);
        if opts.is_end(id) {
            break;
        }
        if id.is_empty() && (!int_ids || row_is_blank(page, check, col, end_col)) {
            break;
        }

        let height = block_height(page, check, col, end_col, max_height, opts);
        let obj = parse_object(page, &root, check, height, opts);
        let consumed = obj.height.max(1);
        end_row = check + consumed - 1;
        if !opts.is_disabled(id) {
            objects.push(obj);
        }
        check += consumed;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(table = %name, objects = objects.len(), "database table parsed");

    DatabaseTable {
        name,
        page: page.name.clone(),
        bounds: GridRect::new(row, col, end_row, end_col),
        root,
        objects,
    }
}

fn comment_above(page: &Page, row: u32, col: u32) -> Option<String> {
    let above = row.checked_sub(1)?;
    page.cell(above, col)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn row_is_blank(page: &Page, row: u32, start_col: u32, end_col: u32) -> bool {
    (start_col..=end_col).all(|c| page.is_blank(row, c))
}

/// Rows owned by the block starting at `row`: up to the next non-blank ID
/// (or end marker), without trailing fully blank rows.
fn block_height(
    page: &Page,
    row: u32,
    col: u32,
    end_col: u32,
    max_height: u32,
    opts: &ParseOptions,
) -> u32 {
    let rows = page.rows();
    let limit = max_height.min(rows - row);
    let mut last_content = row;
    let mut h = 1;
    while h < limit {
        let r = row + h;
        if !page.is_blank(r, col) || opts.is_end(page.text(r, col)) {
            break;
        }
        if !row_is_blank(page, r, col, end_col) {
            last_content = r;
        }
        h += 1;
    }
    last_content - row + 1
}

/// Parse one record against `node`. The first leaf fixes the record height;
/// every sibling is read within it.
fn parse_object(
    page: &Page,
    node: &FieldNode,
    row: u32,
    max_height: u32,
    opts: &ParseOptions,
) -> DataObject {
    let mut obj = DataObject {
        row,
        column: node.column,
        height: max_height,
        fields: Vec::new(),
        arrays: Vec::new(),
    };
    let mut sized = false;

    for child in &node.children {
        if child.is_leaf() {
            let field = read_field(page, child, row, obj.height, opts);
            if !sized {
                obj.height = field.height;
                sized = true;
            }
            obj.fields.push(field);
        } else {
            let array = parse_array(page, child, row, obj.height, opts);
            obj.arrays.push(array);
        }
    }
    obj
}

fn parse_array(
    page: &Page,
    node: &FieldNode,
    row: u32,
    max_height: u32,
    opts: &ParseOptions,
) -> DataArray {
    let mut array = DataArray {
        name: node.name.clone(),
        row,
        column: node.column,
        height: max_height,
        items: Vec::new(),
    };

    let end = row.saturating_add(max_height).min(page.rows());
    let mut check = row;
    while check < end {
        let item = parse_object(page, node, check, end - check, opts);
        if item.height == 0 {
            break;
        }
        check += item.height;
        array.items.push(item);
    }
    array
}

/// Read one leaf column starting at `row`, at most `max_height` rows.
///
/// Multi-row arrays take every non-blank cell. Scalars and one-cell arrays
/// take the first non-blank cell and stop before the next one, which is how
/// nested records split.
fn read_field(
    page: &Page,
    node: &FieldNode,
    row: u32,
    max_height: u32,
    opts: &ParseOptions,
) -> DataField {
    let mut field = DataField {
        name: node.name.clone(),
        row,
        column: node.column,
        ..Default::default()
    };
    let tokenizer = node.tokenizer();
    let rows = page.rows();
    let mut check = row;
    let mut height = 0;

    while check < rows && height < max_height {
        let text = page.text(check, node.column);
        if !text.is_empty() {
            if opts.is_end(text) {
                break;
            }
            if node.array == ArrayKind::Multicell {
                field.values.push(text.to_string());
            } else {
                if !field.value_rows.is_empty() {
                    break;
                }
                field.values.extend(tokenizer.tokenize(text));
            }
            field.value_rows.push(check);
        }
        check += 1;
        height += 1;
    }

    field.height = height;
    field
}
