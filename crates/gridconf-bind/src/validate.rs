//! Table-set validation. Every check runs and accumulates; nothing here
//! stops early.

use gridconf_common::{Diagnostic, DiagnosticKind};
use gridconf_parse::{
    ConstantTable, DataObject, DatabaseTable, FieldNode, TableDefinition, ValueTable,
};
use gridconf_types::TypeRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

static TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(\[\])?$").expect("type name regex must compile"));
static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name regex must compile"));

/// Margin kept free around every table.
pub const OVERLAP_MARGIN: u32 = 1;

pub fn is_valid_type_name(name: &str) -> bool {
    !name.eq_ignore_ascii_case("id") && TYPE_NAME.is_match(name)
}

pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME.is_match(name)
}

/// Run every check over the table set.
pub fn validate(tables: &[TableDefinition], registry: &TypeRegistry) -> Vec<Diagnostic> {
    let mut v = Validator {
        registry,
        issues: Vec::new(),
    };
    v.check_overlaps(tables);
    v.check_table_names(tables);
    for table in tables {
        match table {
            TableDefinition::Value(t) => v.check_value_table(t),
            TableDefinition::Database(t) => v.check_database_table(t),
            TableDefinition::Constant(t) => v.check_constant_table(t),
        }
    }
    v.issues
}

struct Validator<'a> {
    registry: &'a TypeRegistry,
    issues: Vec<Diagnostic>,
}

impl Validator<'_> {
    fn push(&mut self, kind: DiagnosticKind, table: &str, row: u32, col: u32, message: String) {
        self.issues.push(
            Diagnostic::new(kind, message)
                .with_table(table)
                .with_location(row, col),
        );
    }

    fn check_overlaps(&mut self, tables: &[TableDefinition]) {
        for (i, a) in tables.iter().enumerate() {
            for b in &tables[i + 1..] {
                if a.page() != b.page() {
                    continue;
                }
                let (ra, rb) = (a.bounds(), b.bounds());
                if ra.expand(OVERLAP_MARGIN).overlaps(&rb) || rb.expand(OVERLAP_MARGIN).overlaps(&ra) {
                    self.issues.push(
                        Diagnostic::new(
                            DiagnosticKind::Overlap,
                            format!(
                                "tables \"{}\" and \"{}\" overlap or touch on page \"{}\"",
                                a.name(),
                                b.name(),
                                a.page()
                            ),
                        )
                        .with_table(b.name())
                        .with_page(a.page())
                        .with_location(rb.start_row, rb.start_col),
                    );
                }
            }
        }
    }

    fn check_table_names(&mut self, tables: &[TableDefinition]) {
        let mut seen: FxHashMap<String, &TableDefinition> = FxHashMap::default();
        for table in tables {
            let bounds = table.bounds();
            if !is_valid_type_name(table.name()) {
                self.push(
                    DiagnosticKind::InvalidName,
                    table.name(),
                    bounds.start_row,
                    bounds.start_col,
                    format!("invalid table name \"{}\"", table.name()),
                );
            }
            let key = table.name().to_ascii_lowercase();
            if let Some(first) = seen.get(&key) {
                self.issues.push(
                    Diagnostic::new(
                        DiagnosticKind::DuplicateTable,
                        format!(
                            "table \"{}\" already defined on page \"{}\"",
                            table.name(),
                            first.page()
                        ),
                    )
                    .with_table(table.name())
                    .with_page(table.page())
                    .with_location(bounds.start_row, bounds.start_col),
                );
            } else {
                seen.insert(key, table);
            }
        }
    }

    fn check_value_table(&mut self, table: &ValueTable) {
        let name = table.name.as_str();
        let mut ids: FxHashMap<&str, u32> = FxHashMap::default();

        for item in &table.items {
            if !is_valid_field_name(&item.id) {
                self.push(
                    DiagnosticKind::InvalidName,
                    name,
                    item.row,
                    table.id_column(),
                    format!("invalid id \"{}\"", item.id),
                );
            }
            if !is_valid_type_name(&item.type_spec()) {
                self.push(
                    DiagnosticKind::InvalidName,
                    name,
                    item.row,
                    table.type_column(),
                    format!("invalid type name \"{}\"", item.declared_type),
                );
            }
            if let Some(first) = ids.get(item.id.as_str()) {
                self.push(
                    DiagnosticKind::DuplicateId,
                    name,
                    item.row,
                    table.id_column(),
                    format!("duplicate id \"{}\" (first seen at row {})", item.id, first + 1),
                );
            } else {
                ids.insert(&item.id, item.row);
            }

            let Some(descriptor) = self.registry.resolve(&item.declared_type) else {
                self.push(
                    DiagnosticKind::UnknownType,
                    name,
                    item.row,
                    table.type_column(),
                    format!("unknown type \"{}\" for \"{}\"", item.declared_type, item.id),
                );
                continue;
            };

            let tokens: Vec<&str> = if item.array.is_array() {
                item.values.iter().map(String::as_str).collect()
            } else {
                vec![item.values.first().map_or("", String::as_str)]
            };
            for (i, token) in tokens.into_iter().enumerate() {
                if let Err(err) = descriptor.parse(token) {
                    self.push(
                        DiagnosticKind::InvalidValue,
                        name,
                        item.row_of(i),
                        table.value_column(),
                        format!(
                            "invalid value \"{token}\" for {} \"{}\": {err}",
                            item.type_spec(),
                            item.id
                        ),
                    );
                }
            }
        }
    }

    fn check_constant_table(&mut self, table: &ConstantTable) {
        let name = table.name.as_str();
        let col = table.bounds.start_col;
        let mut seen: FxHashMap<&str, u32> = FxHashMap::default();
        for item in &table.items {
            if !is_valid_field_name(&item.name) {
                self.push(
                    DiagnosticKind::InvalidName,
                    name,
                    item.row,
                    col,
                    format!("invalid constant name \"{}\"", item.name),
                );
            }
            if let Some(first) = seen.get(item.name.as_str()) {
                self.push(
                    DiagnosticKind::DuplicateId,
                    name,
                    item.row,
                    col,
                    format!("duplicate constant \"{}\" (first seen at row {})", item.name, first + 1),
                );
            } else {
                seen.insert(&item.name, item.row);
            }
        }
    }

    fn check_database_table(&mut self, table: &DatabaseTable) {
        let header_row = table.header_row();
        let type_row = header_row + 1;

        for child in &table.root.children {
            self.check_node_names(table, child, header_row);
        }
        self.check_siblings(table, &table.root, &mut Vec::new(), header_row);

        let mut ids: FxHashMap<&str, u32> = FxHashMap::default();
        for obj in &table.objects {
            let id = obj.id();
            let row = obj.fields.first().map_or(obj.row, |f| f.row);
            if let Some(first) = ids.get(id) {
                self.push(
                    DiagnosticKind::DuplicateId,
                    &table.name,
                    row,
                    table.bounds.start_col,
                    format!("duplicate id \"{id}\" (first seen at row {})", first + 1),
                );
            } else {
                ids.insert(id, row);
            }
        }

        let mut unresolved = FxHashSet::default();
        self.check_node_types(table, &table.root, type_row, &mut unresolved);
        for obj in &table.objects {
            self.check_object_values(table, &table.root, obj, &unresolved);
        }
    }

    fn check_node_names(&mut self, table: &DatabaseTable, node: &FieldNode, header_row: u32) {
        if !is_valid_field_name(&node.name) {
            self.push(
                DiagnosticKind::InvalidName,
                &table.name,
                header_row,
                node.column,
                format!("invalid field name \"{}\"", node.name),
            );
        }
        if !is_valid_type_name(&node.base_type) {
            self.push(
                DiagnosticKind::InvalidName,
                &table.name,
                header_row + 1,
                node.column,
                format!("invalid type name \"{}\" for field \"{}\"", node.base_type, node.name),
            );
        }
        for child in &node.children {
            self.check_node_names(table, child, header_row);
        }
    }

    /// Sibling field names must be unique; a nested record's type name must
    /// differ from every enclosing record type and from sibling records.
    fn check_siblings<'n>(
        &mut self,
        table: &DatabaseTable,
        node: &'n FieldNode,
        ancestors: &mut Vec<&'n str>,
        header_row: u32,
    ) {
        ancestors.push(&node.base_type);
        let mut names: FxHashMap<&str, u32> = FxHashMap::default();
        let mut record_types: FxHashMap<String, u32> = FxHashMap::default();

        for child in &node.children {
            if let Some(first_col) = names.get(child.name.as_str()) {
                self.push(
                    DiagnosticKind::DuplicateField,
                    &table.name,
                    header_row,
                    child.column,
                    format!(
                        "duplicate field \"{}\" (first seen in column {})",
                        child.name,
                        gridconf_common::column_letter(*first_col)
                    ),
                );
            } else {
                names.insert(&child.name, child.column);
            }

            if child.is_leaf() {
                continue;
            }

            let ty = child.base_type.to_ascii_lowercase();
            if ancestors.iter().any(|a| a.eq_ignore_ascii_case(&ty)) {
                self.push(
                    DiagnosticKind::TypeNameCollision,
                    &table.name,
                    header_row + 1,
                    child.column,
                    format!(
                        "nested type \"{}\" of \"{}\" repeats an enclosing type",
                        child.base_type, child.name
                    ),
                );
            }
            if let Some(first_col) = record_types.get(&ty) {
                self.push(
                    DiagnosticKind::TypeNameCollision,
                    &table.name,
                    header_row + 1,
                    child.column,
                    format!(
                        "nested type \"{}\" of \"{}\" is already used in column {}",
                        child.base_type,
                        child.name,
                        gridconf_common::column_letter(*first_col)
                    ),
                );
            } else {
                record_types.insert(ty, child.column);
            }

            self.check_siblings(table, child, ancestors, header_row);
        }
        ancestors.pop();
    }

    fn check_node_types(
        &mut self,
        table: &DatabaseTable,
        node: &FieldNode,
        type_row: u32,
        unresolved: &mut FxHashSet<u32>,
    ) {
        for child in &node.children {
            if !child.is_leaf() {
                self.check_node_types(table, child, type_row, unresolved);
                continue;
            }
            if !self.registry.contains(&child.base_type) {
                unresolved.insert(child.column);
                self.push(
                    DiagnosticKind::UnknownType,
                    &table.name,
                    type_row,
                    child.column,
                    format!("unknown type \"{}\" for field \"{}\"", child.base_type, child.name),
                );
            }
        }
    }

    fn check_object_values(
        &mut self,
        table: &DatabaseTable,
        node: &FieldNode,
        obj: &DataObject,
        unresolved: &FxHashSet<u32>,
    ) {
        let (Some(fields), Some(arrays)) = (obj.zip_fields(node), obj.zip_arrays(node)) else {
            self.push(
                DiagnosticKind::InvalidValue,
                &table.name,
                obj.row,
                obj.column,
                "record does not match the table schema".to_string(),
            );
            return;
        };

        for (leaf, field) in fields {
            if unresolved.contains(&leaf.column) {
                continue;
            }
            let Some(descriptor) = self.registry.resolve(&leaf.base_type) else {
                continue;
            };
            let tokens: Vec<&str> = if leaf.array.is_array() {
                field.values.iter().map(String::as_str).collect()
            } else {
                vec![field.first()]
            };
            for (i, token) in tokens.into_iter().enumerate() {
                if let Err(err) = descriptor.parse(token) {
                    self.push(
                        DiagnosticKind::InvalidValue,
                        &table.name,
                        field.row_of(i),
                        leaf.column,
                        format!(
                            "invalid value \"{token}\" for field \"{} {}\": {err}",
                            leaf.type_spec(),
                            leaf.name
                        ),
                    );
                }
            }
        }

        for (container, array) in arrays {
            for item in &array.items {
                self.check_object_values(table, container, item, unresolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_patterns() {
        assert!(is_valid_type_name("Rarity"));
        assert!(is_valid_type_name("Int[]"));
        assert!(!is_valid_type_name("Id"));
        assert!(!is_valid_type_name("1Bad"));
        assert!(!is_valid_type_name("Bad_Type"));
        assert!(is_valid_field_name("_hidden"));
        assert!(is_valid_field_name("Max_Hp2"));
        assert!(!is_valid_field_name("2x"));
        assert!(!is_valid_field_name("a-b"));
    }
}
