use gridconf_common::{Diagnostic, DiagnosticKind, Page};

use crate::anchor::{AnchorKind, TableAnchor, find_anchors};
use crate::constant_table::parse_constant_table;
use crate::database_table::parse_database_table;
use crate::names::type_name;
use crate::options::ParseOptions;
use crate::table::TableDefinition;
use crate::value_table::parse_value_table;

/// Tables and scan diagnostics for one or more pages, in page then anchor order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    pub tables: Vec<TableDefinition>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedPage {
    pub fn into_parts(self) -> (Vec<TableDefinition>, Vec<Diagnostic>) {
        (self.tables, self.diagnostics)
    }

    fn extend(&mut self, other: ParsedPage) {
        self.tables.extend(other.tables);
        self.diagnostics.extend(other.diagnostics);
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridParser {
    options: ParseOptions,
}

impl GridParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, page: &Page) -> ParsedPage {
        let mut out = ParsedPage::default();
        for anchor in find_anchors(page) {
            if let Some(table) = self.build(page, &anchor, &mut out.diagnostics) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    page = %page.name,
                    table = %table.name(),
                    kind = %table.kind(),
                    "table parsed"
                );
                out.tables.push(table);
            }
        }
        out
    }

    pub fn parse_pages<'a, I>(&self, pages: I) -> ParsedPage
    where
        I: IntoIterator<Item = &'a Page>,
    {
        let mut out = ParsedPage::default();
        for page in pages {
            out.extend(self.parse(page));
        }
        out
    }

    fn build(
        &self,
        page: &Page,
        anchor: &TableAnchor,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<TableDefinition> {
        let (row, col) = (anchor.row, anchor.col);
        let name = type_name(&anchor.name);
        let opts = &self.options;

        match anchor.kind {
            AnchorKind::Id => {
                let is_type = page.text(row, col + 1).eq_ignore_ascii_case("type");
                let is_value = page.text(row, col + 2).eq_ignore_ascii_case("value");
                if is_type && is_value {
                    return Some(TableDefinition::Value(parse_value_table(
                        page, name, row, col, opts,
                    )));
                }
                if (is_type || is_value) && opts.diagnose_ambiguous_anchors {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::AmbiguousAnchor,
                            format!(
                                "header only partially matches a value table (\"type\": {is_type}, \"value\": {is_value}); reading \"{name}\" as a database table"
                            ),
                        )
                        .with_page(page.name.clone())
                        .with_location(row, col),
                    );
                }
                Some(TableDefinition::Database(parse_database_table(
                    page, name, row, col, opts,
                )))
            }
            AnchorKind::Const => {
                if page.text(row, col + 1).eq_ignore_ascii_case("value") {
                    return Some(TableDefinition::Constant(parse_constant_table(
                        page, name, row, col, opts,
                    )));
                }
                if opts.diagnose_ambiguous_anchors {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::AmbiguousAnchor,
                            format!("const marker for \"{name}\" has no \"value\" header; not a table"),
                        )
                        .with_page(page.name.clone())
                        .with_location(row, col),
                    );
                }
                None
            }
        }
    }
}

/// Parse one page with default options.
pub fn parse(page: &Page) -> ParsedPage {
    GridParser::default().parse(page)
}

/// Parse a named raw grid with default options.
pub fn parse_grid(
    page_name: &str,
    cells: Vec<Vec<Option<String>>>,
) -> (Vec<TableDefinition>, Vec<Diagnostic>) {
    parse(&Page::new(page_name, cells)).into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_selection() {
        let page = Page::from_rows(
            "Sheet",
            vec![
                vec!["#Settings", "", "", "", "", "#Bots"],
                vec!["id", "Type", "VALUE", "", "", "id", "name"],
                vec!["a", "int", "1", "", "", "", ""],
                vec![],
                vec!["#Kinds"],
                vec!["const", "value"],
                vec!["melee"],
            ],
        );
        let (tables, diags) = parse(&page).into_parts();
        assert!(diags.is_empty());
        let kinds: Vec<_> = tables.iter().map(|t| (t.name(), t.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                ("Settings", crate::TableKind::Value),
                ("Bots", crate::TableKind::Database),
                ("Kinds", crate::TableKind::Constant),
            ]
        );
    }

    #[test]
    fn ambiguous_anchors_warn() {
        let page = Page::from_rows(
            "Sheet",
            vec![
                vec!["#Half", "", "", "", "#NoValue"],
                vec!["id", "type", "values", "", "const", "val"],
            ],
        );
        let (tables, diags) = parse(&page).into_parts();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].kind(), crate::TableKind::Database);
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.kind == DiagnosticKind::AmbiguousAnchor));
        assert!(diags.iter().all(Diagnostic::is_warning));

        let quiet = GridParser::new(ParseOptions {
            diagnose_ambiguous_anchors: false,
            ..Default::default()
        });
        assert!(quiet.parse(&page).diagnostics.is_empty());
    }

    #[test]
    fn table_names_are_normalized() {
        let page = Page::from_rows("Sheet", vec![vec!["#bot stats"], vec!["id"]]);
        let parsed = parse(&page);
        assert_eq!(parsed.tables[0].name(), "BotStats");
    }
}
