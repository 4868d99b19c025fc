use std::fmt;

use gridconf_common::cell_name;
use gridconf_types::TypeError;
use thiserror::Error;

/// 0-based grid cell, displayed as `B7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cell_name(self.row, self.col))
    }
}

/// Fatal binding failure. Binding never yields a partial model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{table}.{field} ({at}): unknown type \"{type_name}\"")]
    UnknownType {
        table: String,
        field: String,
        type_name: String,
        at: CellRef,
    },

    #[error("{table}.{field} ({at}): {source}")]
    InvalidValue {
        table: String,
        field: String,
        at: CellRef,
        #[source]
        source: TypeError,
    },

    #[error("{table}.{field} ({at}): id \"{id}\" not found in table {target}")]
    UnresolvedReference {
        table: String,
        field: String,
        target: String,
        id: String,
        at: CellRef,
    },

    #[error("{table} ({at}): duplicate id \"{id}\"")]
    DuplicateId { table: String, id: String, at: CellRef },

    #[error("{table} ({at}): {detail}")]
    ShapeMismatch {
        table: String,
        at: CellRef,
        detail: String,
    },

    #[error("table {0} is defined more than once")]
    DuplicateTable(String),
}

impl BindError {
    pub fn table(&self) -> &str {
        match self {
            BindError::UnknownType { table, .. }
            | BindError::InvalidValue { table, .. }
            | BindError::UnresolvedReference { table, .. }
            | BindError::DuplicateId { table, .. }
            | BindError::ShapeMismatch { table, .. } => table,
            BindError::DuplicateTable(table) => table,
        }
    }
}
