//! Raw row-block values of a Database Table, mirroring its `FieldNode` tree.

use crate::schema::FieldNode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tokens read for one leaf column within a row-block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataField {
    pub name: String,
    pub row: u32,
    pub column: u32,
    pub values: Vec<String>,
    /// Row of each non-blank source cell. One entry per value for multi-row
    /// arrays; a single entry for a tokenized cell.
    pub value_rows: Vec<u32>,
    pub height: u32,
}

impl DataField {
    pub fn first(&self) -> &str {
        self.values.first().map_or("", String::as_str)
    }

    /// Source row for the `i`-th value.
    pub fn row_of(&self, i: usize) -> u32 {
        self.value_rows
            .get(i)
            .or(self.value_rows.first())
            .copied()
            .unwrap_or(self.row)
    }
}

/// Nested records for one container column group within a row-block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataArray {
    pub name: String,
    pub row: u32,
    pub column: u32,
    pub height: u32,
    pub items: Vec<DataObject>,
}

/// One row-block. `fields` follow the node's leaves in order, `arrays` its
/// containers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataObject {
    pub row: u32,
    pub column: u32,
    pub height: u32,
    pub fields: Vec<DataField>,
    pub arrays: Vec<DataArray>,
}

impl DataObject {
    /// Raw ID token of a top-level object (first value of its first field).
    pub fn id(&self) -> &str {
        self.fields.first().map_or("", DataField::first)
    }

    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn array(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Pair each leaf of `node` with its field. `None` if the object does not
    /// follow the schema.
    pub fn zip_fields<'a>(
        &'a self,
        node: &'a FieldNode,
    ) -> Option<Vec<(&'a FieldNode, &'a DataField)>> {
        let leaves: Vec<_> = node.leaves().collect();
        if leaves.len() != self.fields.len() {
            return None;
        }
        leaves
            .into_iter()
            .zip(&self.fields)
            .map(|(n, f)| (n.name == f.name).then_some((n, f)))
            .collect()
    }

    /// Pair each container of `node` with its array.
    pub fn zip_arrays<'a>(
        &'a self,
        node: &'a FieldNode,
    ) -> Option<Vec<(&'a FieldNode, &'a DataArray)>> {
        let containers: Vec<_> = node.containers().collect();
        if containers.len() != self.arrays.len() {
            return None;
        }
        containers
            .into_iter()
            .zip(&self.arrays)
            .map(|(n, a)| (n.name == a.name).then_some((n, a)))
            .collect()
    }

    /// True if no leaf carries a token and every nested array is blank too.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.values.is_empty())
            && self
                .arrays
                .iter()
                .all(|a| a.items.iter().all(DataObject::is_blank))
    }
}
