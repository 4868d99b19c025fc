//! Compile spreadsheet-authored configuration tables into a typed,
//! cross-referenced [`ConfigModel`].
//!
//! The layers stay reachable for deeper integration: `parse` scans grids,
//! `types` holds the type registry, `bind` validates and links.

pub mod config;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod pipeline;

pub use gridconf_bind as bind;
pub use gridconf_common as common;
pub use gridconf_parse as parse;
pub use gridconf_types as types;

pub use config::CompileOptions;
pub use error::CompileError;
pub use pipeline::{Compilation, compile, compile_definitions, compile_with_registry};

pub use gridconf_bind::{BindError, ConfigModel, Item, Table};
pub use gridconf_common::{Diagnostic, DiagnosticKind, ItemRef, Page, Severity, Value};
pub use gridconf_parse::{ParseOptions, TableDefinition};
pub use gridconf_types::{TypeDescriptor, TypeError, TypeRegistry};
