use gridconf_common::Page;
use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#([A-Za-z][A-Za-z0-9 ]*)$").unwrap());

/// Primary-key marker found at a table's origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `id`: a Value or Database Table.
    Id,
    /// `const`: a Constant Table.
    Const,
}

impl AnchorKind {
    pub fn from_marker(text: &str) -> Option<Self> {
        let t = text.trim();
        if t.eq_ignore_ascii_case("id") {
            Some(AnchorKind::Id)
        } else if t.eq_ignore_ascii_case("const") {
            Some(AnchorKind::Const)
        } else {
            None
        }
    }
}

/// Detected origin of one table. `row`/`col` point at the primary-key cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAnchor {
    /// Raw (unnormalized) table name.
    pub name: String,
    pub kind: AnchorKind,
    pub row: u32,
    pub col: u32,
}

/// Scan a page for table anchors in row-major order.
///
/// A page-level table has its marker at `A1` (or at `A2` under a blank
/// `A1`) and takes the page name. Any other table is introduced by a
/// `#Name` cell directly above its marker.
pub fn find_anchors(page: &Page) -> Vec<TableAnchor> {
    let mut anchors = Vec::new();

    let origin = page.text(0, 0);
    if let Some(kind) = AnchorKind::from_marker(origin) {
        anchors.push(TableAnchor {
            name: page.name.clone(),
            kind,
            row: 0,
            col: 0,
        });
    } else if origin.is_empty() {
        if let Some(kind) = AnchorKind::from_marker(page.text(1, 0)) {
            anchors.push(TableAnchor {
                name: page.name.clone(),
                kind,
                row: 1,
                col: 0,
            });
        }
    }

    for row in 0..page.rows() {
        for col in 0..page.cols(row) {
            let text = page.text(row, col);
            if !text.starts_with('#') {
                continue;
            }
            let Some(caps) = TABLE_HEADER.captures(text) else {
                continue;
            };
            let Some(kind) = AnchorKind::from_marker(page.text(row + 1, col)) else {
                continue;
            };
            let name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            #[cfg(feature = "tracing")]
            tracing::debug!(page = %page.name, name = %name, row, col, "table anchor");
            anchors.push(TableAnchor {
                name,
                kind,
                row: row + 1,
                col,
            });
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_level_anchor() {
        let page = Page::from_rows("Bots", vec![vec!["id", "name"], vec!["", "string"]]);
        let anchors = find_anchors(&page);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].name, "Bots");
        assert_eq!(anchors[0].kind, AnchorKind::Id);
        assert_eq!((anchors[0].row, anchors[0].col), (0, 0));
    }

    #[test]
    fn page_level_anchor_below_blank_origin() {
        let page = Page::from_rows("Limits", vec![vec![""], vec!["CONST", "value"]]);
        let anchors = find_anchors(&page);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].kind, AnchorKind::Const);
        assert_eq!(anchors[0].row, 1);
    }

    #[test]
    fn named_anchors_anywhere() {
        let page = Page::from_rows(
            "Sheet",
            vec![
                vec!["#Settings", "", "", "", "", "#Weapon kinds"],
                vec!["id", "type", "value", "", "", "const", "value"],
                vec!["#Not a table"],
                vec!["x"],
                vec!["#bad-name"],
                vec!["id"],
            ],
        );
        let anchors = find_anchors(&page);
        let found: Vec<_> = anchors
            .iter()
            .map(|a| (a.name.as_str(), a.kind, a.row, a.col))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Settings", AnchorKind::Id, 1, 0),
                ("Weapon kinds", AnchorKind::Const, 1, 5),
            ]
        );
    }

    #[test]
    fn origin_with_other_text_is_not_page_level() {
        let page = Page::from_rows("Sheet", vec![vec!["notes"], vec!["id"]]);
        assert!(find_anchors(&page).is_empty());
    }
}
