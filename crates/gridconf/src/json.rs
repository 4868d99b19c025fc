//! JSON intermediate form: an array of Table Definitions tagged by `kind`.

use gridconf_bind::ConfigModel;
use gridconf_parse::TableDefinition;

pub fn to_string(tables: &[TableDefinition]) -> serde_json::Result<String> {
    serde_json::to_string(tables)
}

pub fn to_string_pretty(tables: &[TableDefinition]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tables)
}

pub fn from_str(json: &str) -> serde_json::Result<Vec<TableDefinition>> {
    serde_json::from_str(json)
}

/// Bound model as JSON, for runtime consumers that read it directly.
pub fn model_to_string_pretty(model: &ConfigModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}
