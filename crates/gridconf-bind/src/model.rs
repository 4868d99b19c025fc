//! The bound configuration model: ID-indexed tables of typed items.

use gridconf_common::{ItemRef, Record, Value};
use gridconf_parse::TableKind;
use rustc_hash::FxHashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Every bound table, in definition order.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigModel {
    tables: Vec<Table>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: FxHashMap<String, usize>,
}

impl ConfigModel {
    pub(crate) fn push(&mut self, table: Table) -> Option<usize> {
        let key = table.name.to_ascii_lowercase();
        if self.index.contains_key(&key) {
            return None;
        }
        self.index.insert(key, self.tables.len());
        self.tables.push(table);
        Some(self.tables.len() - 1)
    }

    pub(crate) fn table_mut(&mut self, idx: usize) -> Option<&mut Table> {
        self.tables.get_mut(idx)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    /// Case-insensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.position(name).map(|i| &self.tables[i])
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Follow a cross-reference to the item it points at.
    pub fn resolve(&self, item_ref: &ItemRef) -> Option<&Item> {
        self.table(&item_ref.table)?.get(&item_ref.id)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub kind: TableKind,
    items: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: FxHashMap<String, usize>,
}

impl Table {
    pub fn new(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Append an item and index it by ID. Returns `false` and leaves the
    /// table untouched if the ID is already present.
    pub(crate) fn insert(&mut self, item: Item) -> bool {
        if self.index.contains_key(&item.id) {
            return false;
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        true
    }

    pub(crate) fn item_mut(&mut self, idx: usize) -> Option<&mut Item> {
        self.items.get_mut(idx)
    }

    /// Exact ID lookup.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One bound row-block, setting or constant.
///
/// Database items carry a [`Value::Record`] whose first field is `Id`; value
/// and constant items carry the bare value.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Position in source row order.
    pub index: usize,
    pub id: String,
    pub row: u32,
    pub value: Value,
}

impl Item {
    pub fn as_record(&self) -> Option<&Record> {
        self.value.as_record()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_record()?.get(name)
    }
}
