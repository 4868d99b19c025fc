//! Per-run descriptors synthesized from parsed tables.

use gridconf_common::{ItemRef, Value};
use gridconf_parse::{ConstantTable, DatabaseTable, field_name};
use rustc_hash::FxHashSet;

use crate::builtins::parse_int_literal;
use crate::{TypeDescriptor, TypeError};

/// A Database Table's name used as a field type: the token is a row ID.
///
/// Parsing only checks membership and yields a symbolic [`ItemRef`]; the
/// binder links it to the bound item once every table is loaded.
#[derive(Debug, Clone)]
pub struct DatabaseRefType {
    table: String,
    display: String,
    ids: FxHashSet<String>,
    int_keys: bool,
}

impl DatabaseRefType {
    pub fn new<I, S>(table: impl Into<String>, ids: I, int_keys: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        Self {
            display: format!("{table}.Item"),
            table,
            ids: ids.into_iter().map(Into::into).collect(),
            int_keys,
        }
    }

    pub fn from_table(table: &DatabaseTable) -> Self {
        Self::new(table.name.clone(), table.ids(), table.has_int_ids())
    }

    /// Canonical ID for a token: int-keyed tables compare by numeric value.
    pub fn canonical_id(&self, token: &str) -> String {
        let t = token.trim();
        if self.int_keys {
            if let Some(n) = parse_int_literal(t) {
                return n.to_string();
            }
        }
        t.to_string()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains(&self.canonical_id(token))
    }
}

impl TypeDescriptor for DatabaseRefType {
    fn name(&self) -> &str {
        &self.table
    }

    fn display_name(&self) -> &str {
        &self.display
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        if token.trim().is_empty() {
            return Ok(Value::Null);
        }
        let id = self.canonical_id(token);
        if self.ids.contains(&id) {
            Ok(Value::ItemRef(ItemRef::new(self.table.clone(), id)))
        } else {
            Err(TypeError::UnknownId {
                table: self.table.clone(),
                token: token.trim().to_string(),
            })
        }
    }

    fn table_ref(&self) -> Option<&str> {
        Some(&self.table)
    }
}

/// A Constant Table's name used as a field type: behaves like `int`, but
/// also accepts the table's symbolic names (case-insensitive).
#[derive(Debug, Clone)]
pub struct ConstantRefType {
    table: String,
    entries: Vec<(String, i64)>,
}

impl ConstantRefType {
    pub fn new(table: impl Into<String>, entries: Vec<(String, i64)>) -> Self {
        Self {
            table: table.into(),
            entries,
        }
    }

    pub fn from_table(table: &ConstantTable) -> Self {
        Self::new(
            table.name.clone(),
            table
                .items
                .iter()
                .map(|i| (i.name.clone(), i.value))
                .collect(),
        )
    }

    pub fn lookup(&self, name: &str) -> Option<i64> {
        let normalized = field_name(name);
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(&normalized) || n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

impl TypeDescriptor for ConstantRefType {
    fn name(&self) -> &str {
        &self.table
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        let t = token.trim();
        if t.is_empty() {
            return Ok(Value::Int(0));
        }
        self.lookup(t)
            .or_else(|| parse_int_literal(t))
            .map(Value::Int)
            .ok_or_else(|| TypeError::UnknownConstant {
                table: self.table.clone(),
                token: t.to_string(),
            })
    }
}
