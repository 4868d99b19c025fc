pub mod anchor;
mod constant_table;
mod database_table;
pub mod names;
pub mod object;
pub mod options;
pub mod parser;
pub mod schema;
pub mod table;
pub mod tokenizer;
mod value_table;

pub use anchor::{AnchorKind, TableAnchor, find_anchors};
pub use names::{field_name, type_name};
pub use object::{DataArray, DataField, DataObject};
pub use options::ParseOptions;
pub use parser::{GridParser, ParsedPage, parse, parse_grid};
pub use schema::{ArrayKind, DEFAULT_TYPE, FieldNode, TypeDecl};
pub use table::{
    ConstantItem, ConstantTable, DatabaseTable, TableDefinition, TableKind, ValueItem, ValueTable,
};
pub use tokenizer::{Tokenizer, tokenize, unescape};

// Re-export common types
pub use gridconf_common::{Diagnostic, DiagnosticKind, GridRect, Page};
