//! Two-pass binder.
//!
//! Pass 1 materializes every item of every table and indexes it by ID.
//! Fields typed as another Database Table are left as `Null` placeholders and
//! recorded as fixups. Pass 2 walks the fixups once every ID map exists and
//! patches in [`ItemRef`]s, so mutual references between tables bind in any
//! declaration order.

use gridconf_common::{ItemRef, Record, Value};
use gridconf_parse::{
    ConstantTable, DataObject, DatabaseTable, FieldNode, TableDefinition, ValueTable,
};
use gridconf_types::{TypeDescriptor, TypeError, TypeRegistry, parse_int_literal};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::error::{BindError, CellRef};
use crate::model::{ConfigModel, Item, Table};

/// Step from an item's value down to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSeg {
    Field(String),
    Index(usize),
}

type FieldPath = SmallVec<[PathSeg; 4]>;

/// A cross-reference field waiting for pass 2.
#[derive(Debug)]
struct PendingRef {
    table: usize,
    item: usize,
    path: FieldPath,
    field: String,
    target: String,
    tokens: Vec<String>,
    array: bool,
    cells: Vec<CellRef>,
}

/// Bind a validated table set into a [`ConfigModel`].
///
/// Fails on the first problem; no partial model is returned.
pub fn bind(tables: &[TableDefinition], registry: &TypeRegistry) -> Result<ConfigModel, BindError> {
    let mut binder = Binder {
        registry,
        model: ConfigModel::default(),
        pending: Vec::new(),
    };

    {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("bind_local", tables = tables.len()).entered();
        for table in tables {
            binder.bind_table(table)?;
        }
    }

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("bind_references", fixups = binder.pending.len()).entered();
    binder.resolve_references()?;
    Ok(binder.model)
}

struct Binder<'a> {
    registry: &'a TypeRegistry,
    model: ConfigModel,
    pending: Vec<PendingRef>,
}

impl Binder<'_> {
    fn bind_table(&mut self, def: &TableDefinition) -> Result<(), BindError> {
        let table_idx = self
            .model
            .push(Table::new(def.name(), def.kind()))
            .ok_or_else(|| BindError::DuplicateTable(def.name().to_string()))?;

        match def {
            TableDefinition::Value(t) => self.bind_values(table_idx, t),
            TableDefinition::Constant(t) => self.bind_constants(table_idx, t),
            TableDefinition::Database(t) => self.bind_database(table_idx, t),
        }
    }

    fn insert(&mut self, table_idx: usize, name: &str, item: Item, at: CellRef) -> Result<(), BindError> {
        let id = item.id.clone();
        let inserted = self
            .model
            .table_mut(table_idx)
            .is_some_and(|t| t.insert(item));
        if inserted {
            Ok(())
        } else {
            Err(BindError::DuplicateId {
                table: name.to_string(),
                id,
                at,
            })
        }
    }

    fn descriptor(
        &self,
        table: &str,
        field: &str,
        type_name: &str,
        at: CellRef,
    ) -> Result<Arc<dyn TypeDescriptor>, BindError> {
        self.registry
            .resolve(type_name)
            .ok_or_else(|| BindError::UnknownType {
                table: table.to_string(),
                field: field.to_string(),
                type_name: type_name.to_string(),
                at,
            })
    }

    fn bind_values(&mut self, table_idx: usize, table: &ValueTable) -> Result<(), BindError> {
        for (index, item) in table.items.iter().enumerate() {
            let type_at = CellRef::new(item.row, table.type_column());
            let descriptor = self.descriptor(&table.name, &item.id, &item.declared_type, type_at)?;
            let is_array = item.array.is_array();
            let tokens: Vec<String> = if is_array {
                item.values.clone()
            } else {
                vec![item.values.first().cloned().unwrap_or_default()]
            };
            let cells: Vec<CellRef> = (0..tokens.len())
                .map(|i| CellRef::new(item.row_of(i), table.value_column()))
                .collect();

            let value = match descriptor.table_ref() {
                Some(target) => {
                    let placeholder = placeholder(is_array, tokens.len());
                    self.pending.push(PendingRef {
                        table: table_idx,
                        item: index,
                        path: FieldPath::new(),
                        field: item.id.clone(),
                        target: target.to_string(),
                        tokens,
                        array: is_array,
                        cells,
                    });
                    placeholder
                }
                None => parse_tokens(descriptor.as_ref(), &tokens, is_array)
                    .map_err(|(i, source)| BindError::InvalidValue {
                        table: table.name.clone(),
                        field: item.id.clone(),
                        at: cells.get(i).copied().unwrap_or(type_at),
                        source,
                    })?,
            };

            let bound = Item {
                index,
                id: item.id.clone(),
                row: item.row,
                value,
            };
            self.insert(table_idx, &table.name, bound, CellRef::new(item.row, table.id_column()))?;
        }
        Ok(())
    }

    fn bind_constants(&mut self, table_idx: usize, table: &ConstantTable) -> Result<(), BindError> {
        let col = table.bounds.start_col;
        for (index, item) in table.items.iter().enumerate() {
            let bound = Item {
                index,
                id: item.name.clone(),
                row: item.row,
                value: Value::Int(item.value),
            };
            self.insert(table_idx, &table.name, bound, CellRef::new(item.row, col))?;
        }
        Ok(())
    }

    fn bind_database(&mut self, table_idx: usize, table: &DatabaseTable) -> Result<(), BindError> {
        for (index, obj) in table.objects.iter().enumerate() {
            let mut path = FieldPath::new();
            let record = self.bind_record(table_idx, index, table, &table.root, obj, &mut path)?;
            let bound = Item {
                index,
                id: obj.id().trim().to_string(),
                row: obj.row,
                value: Value::Record(record),
            };
            self.insert(
                table_idx,
                &table.name,
                bound,
                CellRef::new(obj.row, table.bounds.start_col),
            )?;
        }
        Ok(())
    }

    fn bind_record(
        &mut self,
        table_idx: usize,
        item_idx: usize,
        table: &DatabaseTable,
        node: &FieldNode,
        obj: &DataObject,
        path: &mut FieldPath,
    ) -> Result<Record, BindError> {
        let shape_error = || BindError::ShapeMismatch {
            table: table.name.clone(),
            at: CellRef::new(obj.row, obj.column),
            detail: format!("record does not match the columns of \"{}\"", node.base_type),
        };
        let fields = obj.zip_fields(node).ok_or_else(shape_error)?;
        let arrays = obj.zip_arrays(node).ok_or_else(shape_error)?;

        let mut record = Record::new();
        for (leaf, field) in fields {
            let at = CellRef::new(field.row, leaf.column);
            let descriptor = self.descriptor(&table.name, &leaf.name, &leaf.base_type, at)?;
            let is_array = leaf.array.is_array();
            let tokens: Vec<String> = if is_array {
                field.values.clone()
            } else {
                vec![field.first().to_string()]
            };
            let cells: Vec<CellRef> = (0..tokens.len())
                .map(|i| CellRef::new(field.row_of(i), leaf.column))
                .collect();

            let value = match descriptor.table_ref() {
                Some(target) => {
                    let placeholder = placeholder(is_array, tokens.len());
                    let mut field_path = path.clone();
                    field_path.push(PathSeg::Field(leaf.name.clone()));
                    self.pending.push(PendingRef {
                        table: table_idx,
                        item: item_idx,
                        path: field_path,
                        field: leaf.name.clone(),
                        target: target.to_string(),
                        tokens,
                        array: is_array,
                        cells,
                    });
                    placeholder
                }
                None => parse_tokens(descriptor.as_ref(), &tokens, is_array).map_err(
                    |(i, source)| BindError::InvalidValue {
                        table: table.name.clone(),
                        field: leaf.name.clone(),
                        at: cells.get(i).copied().unwrap_or(at),
                        source,
                    },
                )?,
            };
            record.set(leaf.name.clone(), value);
        }

        for (container, array) in arrays {
            path.push(PathSeg::Field(container.name.clone()));
            let mut items = Vec::new();
            for child in array.items.iter().filter(|c| !c.is_blank()) {
                path.push(PathSeg::Index(items.len()));
                let nested = self.bind_record(table_idx, item_idx, table, container, child, path)?;
                path.pop();
                items.push(Value::Record(nested));
            }
            path.pop();
            record.set(container.name.clone(), Value::Array(items));
        }

        Ok(record)
    }

    fn resolve_references(&mut self) -> Result<(), BindError> {
        let pending = std::mem::take(&mut self.pending);
        for fixup in pending {
            let table_name = self
                .model
                .tables()
                .get(fixup.table)
                .map(|t| t.name.clone())
                .unwrap_or_default();
            let unresolved = |id: &str, at: CellRef| BindError::UnresolvedReference {
                table: table_name.clone(),
                field: fixup.field.clone(),
                target: fixup.target.clone(),
                id: id.to_string(),
                at,
            };

            let mut resolved = Vec::with_capacity(fixup.tokens.len());
            for (i, token) in fixup.tokens.iter().enumerate() {
                let at = fixup.cells.get(i).copied().unwrap_or(CellRef::new(0, 0));
                let token = token.trim();
                if token.is_empty() {
                    resolved.push(Value::Null);
                    continue;
                }
                let target = self
                    .model
                    .table(&fixup.target)
                    .ok_or_else(|| unresolved(token, at))?;
                let item = target
                    .get(token)
                    .or_else(|| {
                        parse_int_literal(token).and_then(|n| target.get(&n.to_string()))
                    })
                    .ok_or_else(|| unresolved(token, at))?;
                resolved.push(Value::ItemRef(ItemRef::new(target.name.clone(), item.id.clone())));
            }

            let value = if fixup.array {
                Value::Array(resolved)
            } else {
                resolved.pop().unwrap_or(Value::Null)
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(table = %table_name, field = %fixup.field, value = %value, "reference resolved");

            let slot = self
                .model
                .table_mut(fixup.table)
                .and_then(|t| t.item_mut(fixup.item))
                .and_then(|item| slot_mut(&mut item.value, &fixup.path));
            match slot {
                Some(slot) => *slot = value,
                None => {
                    return Err(BindError::ShapeMismatch {
                        table: table_name,
                        at: fixup.cells.first().copied().unwrap_or(CellRef::new(0, 0)),
                        detail: format!("no slot for reference field \"{}\"", fixup.field),
                    });
                }
            }
        }
        Ok(())
    }
}

fn placeholder(is_array: bool, len: usize) -> Value {
    if is_array {
        Value::Array(vec![Value::Null; len])
    } else {
        Value::Null
    }
}

/// Parse a scalar token or an array's tokens. On failure, returns the index
/// of the offending token.
fn parse_tokens(
    descriptor: &dyn TypeDescriptor,
    tokens: &[String],
    is_array: bool,
) -> Result<Value, (usize, TypeError)> {
    if !is_array {
        let token = tokens.first().map_or("", String::as_str);
        return descriptor.parse(token).map_err(|e| (0, e));
    }
    descriptor
        .parse_array(tokens)
        .map(Value::Array)
        .map_err(|e| match e {
            TypeError::ArrayElement { index, source } => (index, *source),
            other => (0, other),
        })
}

fn slot_mut<'v>(value: &'v mut Value, path: &[PathSeg]) -> Option<&'v mut Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(value);
    };
    let next = match (value, head) {
        (Value::Record(record), PathSeg::Field(name)) => record.get_mut(name)?,
        (Value::Array(items), PathSeg::Index(i)) => items.get_mut(*i)?,
        _ => return None,
    };
    slot_mut(next, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_paths_walk_records_and_arrays() {
        let mut inner = Record::new();
        inner.set("Target", Value::Null);
        let mut outer = Record::new();
        outer.set("Drops", Value::Array(vec![Value::Record(inner)]));
        let mut value = Value::Record(outer);

        let path = vec![
            PathSeg::Field("Drops".into()),
            PathSeg::Index(0),
            PathSeg::Field("Target".into()),
        ];
        *slot_mut(&mut value, &path).unwrap() = Value::Int(7);

        let drops = value.as_record().unwrap().get("Drops").unwrap();
        let target = drops.as_array().unwrap()[0].as_record().unwrap().get("Target");
        assert_eq!(target, Some(&Value::Int(7)));

        assert!(slot_mut(&mut value, &[PathSeg::Index(3)]).is_none());
    }

    #[test]
    fn array_failures_point_at_the_bad_token() {
        let registry = TypeRegistry::with_builtins();
        let int = registry.resolve("int").unwrap();
        let tokens = vec!["1".to_string(), "x".to_string()];
        let (index, err) = parse_tokens(int.as_ref(), &tokens, true).unwrap_err();
        assert_eq!(index, 1);
        assert!(matches!(err, TypeError::InvalidLiteral { .. }));
    }
}
