//! Integer-ID normalization, run once on the parsed tables before
//! validation.
//!
//! For every `int`-keyed Database Table and every Constant Table, walk items
//! in row order: a blank ID takes the smallest free value at or after the
//! cursor, an explicit ID keeps its value unless already taken, in which case
//! it is displaced forward to the next free value. Running the pass again
//! changes nothing.

use gridconf_common::{Diagnostic, DiagnosticKind};
use gridconf_parse::{ConstantTable, DatabaseTable, TableDefinition};
use gridconf_types::parse_int_literal;
use rustc_hash::FxHashSet;

#[derive(Debug)]
struct IdAllocator {
    used: FxHashSet<i64>,
    cursor: i64,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            used: FxHashSet::default(),
            cursor: 1,
        }
    }

    fn next_free(&mut self) -> i64 {
        let mut id = self.cursor;
        while self.used.contains(&id) {
            id += 1;
        }
        self.used.insert(id);
        self.cursor = id + 1;
        id
    }

    /// Keep `id` if free, otherwise displace it forward.
    fn claim(&mut self, id: i64) -> i64 {
        if self.used.insert(id) {
            id
        } else {
            self.next_free()
        }
    }
}

/// Normalize IDs in place. Returns warnings for constant values that could
/// not be read and were reassigned.
pub fn normalize_ids(tables: &mut [TableDefinition]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for table in tables.iter_mut() {
        match table {
            TableDefinition::Database(t) if t.has_int_ids() => normalize_database(t),
            TableDefinition::Constant(t) => normalize_constants(t, &mut diagnostics),
            _ => {}
        }
    }
    diagnostics
}

fn normalize_database(table: &mut DatabaseTable) {
    let mut ids = IdAllocator::new();
    for obj in &mut table.objects {
        let Some(id_field) = obj.fields.first_mut() else {
            continue;
        };
        let raw = id_field.values.first().map(|s| s.trim().to_string()).unwrap_or_default();

        let assigned = if raw.is_empty() {
            ids.next_free()
        } else if let Some(explicit) = parse_int_literal(&raw) {
            ids.claim(explicit)
        } else {
            // left for the validator to report
            continue;
        };

        let text = assigned.to_string();
        #[cfg(feature = "tracing")]
        if text != raw {
            tracing::debug!(table = %table.name, row = obj.row, from = %raw, to = %text, "id assigned");
        }
        match id_field.values.first_mut() {
            Some(slot) => *slot = text,
            None => id_field.values.push(text),
        }
    }
}

fn normalize_constants(table: &mut ConstantTable, diagnostics: &mut Vec<Diagnostic>) {
    let mut ids = IdAllocator::new();
    let value_col = table.bounds.start_col + 1;
    for item in &mut table.items {
        let raw = item.raw_value.as_deref().map(str::trim).unwrap_or("");
        item.value = if raw.is_empty() {
            ids.next_free()
        } else if let Some(explicit) = parse_int_literal(raw) {
            ids.claim(explicit)
        } else {
            let assigned = ids.next_free();
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::InvalidConstant,
                    format!(
                        "invalid int value \"{raw}\" for constant \"{}\"; using next free value {assigned}",
                        item.name
                    ),
                )
                .with_table(table.name.clone())
                .with_location(item.row, value_col),
            );
            assigned
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(table = %table.name, name = %item.name, value = item.value, "constant value");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridconf_common::Page;
    use gridconf_parse::parse;

    fn ids_of(table: &TableDefinition) -> Vec<String> {
        table.as_database().unwrap().ids().map(str::to_string).collect()
    }

    #[test]
    fn blank_and_colliding_ids() {
        let page = Page::from_rows(
            "Bots",
            vec![
                vec!["id", "name"],
                vec!["", ""],
                vec!["", "a"],
                vec!["", "b"],
                vec!["1", "c"],
                vec!["0x5", "d"],
                vec!["", "e"],
                vec!["5", "f"],
            ],
        );
        let mut tables = parse(&page).tables;
        assert!(normalize_ids(&mut tables).is_empty());
        assert_eq!(ids_of(&tables[0]), vec!["1", "2", "3", "5", "4", "6"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let page = Page::from_rows(
            "Bots",
            vec![
                vec!["id", "x"],
                vec!["", ""],
                vec!["3", "a"],
                vec!["", "b"],
                vec!["3", "c"],
                vec!["", "d"],
            ],
        );
        let mut tables = parse(&page).tables;
        normalize_ids(&mut tables);
        let once = tables.clone();
        normalize_ids(&mut tables);
        assert_eq!(once, tables);
        assert_eq!(ids_of(&tables[0]), vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn string_keyed_tables_are_untouched() {
        let page = Page::from_rows(
            "Rarity",
            vec![vec!["id"], vec!["string"], vec!["common"], vec!["rare"]],
        );
        let mut tables = parse(&page).tables;
        let before = tables.clone();
        normalize_ids(&mut tables);
        assert_eq!(before, tables);
    }

    #[test]
    fn constants_fill_and_warn() {
        let page = Page::from_rows(
            "Kinds",
            vec![
                vec!["const", "value"],
                vec!["melee", ""],
                vec!["ranged", "1"],
                vec!["magic", "lots"],
                vec!["siege", "10"],
            ],
        );
        let mut tables = parse(&page).tables;
        let diags = normalize_ids(&mut tables);
        let values: Vec<_> = tables[0]
            .as_constant()
            .unwrap()
            .items
            .iter()
            .map(|i| i.value)
            .collect();
        assert_eq!(values, vec![1, 2, 3, 10]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidConstant);
        assert!(diags[0].is_warning());
    }
}
