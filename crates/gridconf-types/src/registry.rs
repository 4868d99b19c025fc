use std::fmt;
use std::sync::Arc;

use gridconf_common::{Diagnostic, DiagnosticKind, Value};
use gridconf_parse::TableDefinition;
use rustc_hash::FxHashMap;

use crate::builtins::{BoolType, DurationType, DurationUnit, FloatType, IntType, StringType};
use crate::table_types::{ConstantRefType, DatabaseRefType};
use crate::{ArrayType, TypeDescriptor, TypeError};

const ARRAY_SUFFIX: &str = "[]";

/// Name → descriptor map, built fresh for every run.
///
/// Lookup is case-insensitive, so `int`, `Int` and `INT` are the same type.
/// A `T[]` name resolves to the array adapter over `T`.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, Arc<dyn TypeDescriptor>>,
    order: Vec<String>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.order)
            .finish()
    }
}

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `int`, `float`, `string`, `bool`, `seconds`, `minutes`, `hours`, `days`.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(IntType));
        reg.register(Arc::new(FloatType));
        reg.register(Arc::new(StringType));
        reg.register(Arc::new(BoolType));
        for unit in DurationUnit::ALL {
            reg.register(Arc::new(DurationType::new(unit)));
        }
        reg
    }

    /// Add a descriptor. Returns `false`, leaving the existing one in place,
    /// if the name is already taken.
    pub fn register(&mut self, descriptor: Arc<dyn TypeDescriptor>) -> bool {
        let k = key(descriptor.name());
        if self.types.contains_key(&k) {
            #[cfg(feature = "tracing")]
            tracing::warn!(name = %descriptor.name(), "type already registered");
            return false;
        }
        self.order.push(descriptor.name().to_string());
        self.types.insert(k, descriptor);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn TypeDescriptor>> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix(ARRAY_SUFFIX) {
            let inner = self.types.get(&key(element))?;
            return Some(Arc::new(ArrayType::new(Arc::clone(inner))));
        }
        self.types.get(&key(name)).cloned()
    }

    /// Table name a type refers to, if it is a Database Table type.
    pub fn table_ref(&self, name: &str) -> Option<String> {
        self.resolve(name)
            .and_then(|d| d.table_ref().map(str::to_string))
    }

    pub fn parse(&self, name: &str, token: &str) -> Result<Value, TypeError> {
        self.resolve(name)
            .ok_or_else(|| TypeError::UnknownType(name.to_string()))?
            .parse(token)
    }

    /// Parse pre-split tokens under element type `name` (`T` or `T[]`).
    pub fn parse_array(&self, name: &str, tokens: &[String]) -> Result<Vec<Value>, TypeError> {
        let element = name.trim();
        let element = element.strip_suffix(ARRAY_SUFFIX).unwrap_or(element);
        self.resolve(element)
            .ok_or_else(|| TypeError::UnknownType(element.to_string()))?
            .parse_array(tokens)
    }

    /// Register one descriptor per Database and Constant Table, keyed by the
    /// table name. Collisions are reported as warnings.
    pub fn register_tables(&mut self, tables: &[TableDefinition]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for table in tables {
            let descriptor: Arc<dyn TypeDescriptor> = match table {
                TableDefinition::Database(t) => Arc::new(DatabaseRefType::from_table(t)),
                TableDefinition::Constant(t) => Arc::new(ConstantRefType::from_table(t)),
                TableDefinition::Value(_) => continue,
            };
            if !self.register(descriptor) {
                let bounds = table.bounds();
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::TypeAlreadyRegistered,
                        format!(
                            "type \"{}\" is already registered; the table cannot be used as a field type",
                            table.name()
                        ),
                    )
                    .with_table(table.name())
                    .with_location(bounds.start_row, bounds.start_col),
                );
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_case_insensitively() {
        let reg = TypeRegistry::with_builtins();
        assert_eq!(reg.len(), 8);
        assert!(reg.contains("Int"));
        assert!(reg.contains("STRING"));
        assert!(reg.contains("Seconds[]"));
        assert!(!reg.contains("vector3"));
        assert_eq!(reg.parse("Int", "0x10"), Ok(Value::Int(16)));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut reg = TypeRegistry::with_builtins();
        assert!(!reg.register(Arc::new(crate::builtins::IntType)));
        assert_eq!(reg.len(), 8);
    }

    #[test]
    fn array_adapter() {
        let reg = TypeRegistry::with_builtins();
        assert_eq!(
            reg.parse("int[]", "1, 2, 3"),
            Ok(Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
        assert_eq!(reg.parse("int[]", ""), Ok(Value::Array(vec![])));
        assert!(reg.parse("int[]", "1, x, 3").is_err());
        assert_eq!(reg.resolve("Float[]").unwrap().name(), "float[]");

        let tokens: Vec<String> = ["a", "b", "c|d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            reg.parse_array("string", &tokens),
            Ok(vec![Value::from("a"), Value::from("b"), Value::from("c|d")])
        );
        let err = reg.parse_array("bool[]", &["true".to_string(), "maybe".to_string()]).unwrap_err();
        assert!(matches!(err, TypeError::ArrayElement { index: 1, .. }));
    }

    #[test]
    fn unknown_type() {
        let reg = TypeRegistry::with_builtins();
        assert_eq!(
            reg.parse("Vector3", "1"),
            Err(TypeError::UnknownType("Vector3".into()))
        );
    }
}
