//! Table Definitions: the intermediate form produced by the grid parser.

use gridconf_common::GridRect;

use crate::object::DataObject;
use crate::schema::{ArrayKind, FieldNode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Value,
    Database,
    Constant,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TableKind::Value => "value",
            TableKind::Database => "database",
            TableKind::Constant => "constant",
        })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
#[derive(Debug, Clone, PartialEq)]
pub enum TableDefinition {
    Value(ValueTable),
    Database(DatabaseTable),
    Constant(ConstantTable),
}

impl TableDefinition {
    pub fn name(&self) -> &str {
        match self {
            TableDefinition::Value(t) => &t.name,
            TableDefinition::Database(t) => &t.name,
            TableDefinition::Constant(t) => &t.name,
        }
    }

    pub fn page(&self) -> &str {
        match self {
            TableDefinition::Value(t) => &t.page,
            TableDefinition::Database(t) => &t.page,
            TableDefinition::Constant(t) => &t.page,
        }
    }

    pub fn bounds(&self) -> GridRect {
        match self {
            TableDefinition::Value(t) => t.bounds,
            TableDefinition::Database(t) => t.bounds,
            TableDefinition::Constant(t) => t.bounds,
        }
    }

    pub fn kind(&self) -> TableKind {
        match self {
            TableDefinition::Value(_) => TableKind::Value,
            TableDefinition::Database(_) => TableKind::Database,
            TableDefinition::Constant(_) => TableKind::Constant,
        }
    }

    pub fn as_database(&self) -> Option<&DatabaseTable> {
        match self {
            TableDefinition::Database(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueTable> {
        match self {
            TableDefinition::Value(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantTable> {
        match self {
            TableDefinition::Constant(t) => Some(t),
            _ => None,
        }
    }
}

/// Independent named settings: `id | type | value | comment` rows.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTable {
    pub name: String,
    pub page: String,
    pub bounds: GridRect,
    pub items: Vec<ValueItem>,
}

impl ValueTable {
    /// Column holding the item IDs.
    pub fn id_column(&self) -> u32 {
        self.bounds.start_col
    }

    pub fn type_column(&self) -> u32 {
        self.bounds.start_col + 1
    }

    pub fn value_column(&self) -> u32 {
        self.bounds.start_col + 2
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueItem {
    pub id: String,
    /// Normalized element type (`Int`, `Rarity`, ...), without array brackets.
    pub declared_type: String,
    pub array: ArrayKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delimiter: Option<String>,
    pub values: Vec<String>,
    pub value_rows: Vec<u32>,
    pub row: u32,
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: Option<String>,
}

impl ValueItem {
    pub fn type_spec(&self) -> String {
        if self.array.is_array() {
            format!("{}[]", self.declared_type)
        } else {
            self.declared_type.clone()
        }
    }

    pub fn row_of(&self, i: usize) -> u32 {
        self.value_rows
            .get(i)
            .or(self.value_rows.first())
            .copied()
            .unwrap_or(self.row)
    }
}

/// Symbolic name → integer mapping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantTable {
    pub name: String,
    pub page: String,
    pub bounds: GridRect,
    pub items: Vec<ConstantItem>,
}

impl ConstantTable {
    pub fn lookup(&self, name: &str) -> Option<&ConstantItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantItem {
    pub name: String,
    /// Value cell as written; `None` or blank means auto-assigned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw_value: Option<String>,
    /// Final value, filled by ID normalization.
    pub value: i64,
    pub row: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: Option<String>,
}

/// Uniform-schema, ID-keyed records.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseTable {
    pub name: String,
    pub page: String,
    pub bounds: GridRect,
    pub root: FieldNode,
    pub objects: Vec<DataObject>,
}

impl DatabaseTable {
    /// Schema node of the ID column; always the root's first child.
    pub fn id_node(&self) -> Option<&FieldNode> {
        self.root.children.first()
    }

    pub fn id_type(&self) -> &str {
        self.id_node().map_or("", |n| n.base_type.as_str())
    }

    pub fn has_int_ids(&self) -> bool {
        self.id_type().eq_ignore_ascii_case("int")
    }

    pub fn header_row(&self) -> u32 {
        self.bounds.start_row
    }

    /// Raw ID tokens in row order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(DataObject::id)
    }
}
