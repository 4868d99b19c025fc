//! Grid to model: scan, normalize, register, validate, bind.

use gridconf_bind::{ConfigModel, bind, normalize_ids, validate};
use gridconf_common::{Diagnostic, Page};
use gridconf_parse::{GridParser, TableDefinition};
use gridconf_types::TypeRegistry;

use crate::config::CompileOptions;
use crate::error::CompileError;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub model: ConfigModel,
    /// Normalized Table Definitions the model was bound from.
    pub definitions: Vec<TableDefinition>,
    /// Non-fatal diagnostics.
    pub warnings: Vec<Diagnostic>,
}

/// Compile pages with a fresh registry.
pub fn compile(pages: &[Page], options: &CompileOptions) -> Result<Compilation, CompileError> {
    compile_with_registry(pages, options, base_registry(options))
}

/// Compile pages on top of a caller-supplied registry, e.g. one carrying
/// extra descriptors.
pub fn compile_with_registry(
    pages: &[Page],
    options: &CompileOptions,
    registry: TypeRegistry,
) -> Result<Compilation, CompileError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("compile", pages = pages.len()).entered();

    let parser = GridParser::new(options.parse.clone());
    let scanned = parser.parse_pages(pages.iter().filter(|p| !options.skips(&p.name)));
    let (tables, diagnostics) = scanned.into_parts();
    finish(tables, diagnostics, options, registry)
}

/// Compile already-parsed Table Definitions, such as ones loaded from the
/// JSON intermediate form.
pub fn compile_definitions(
    tables: Vec<TableDefinition>,
    options: &CompileOptions,
) -> Result<Compilation, CompileError> {
    finish(tables, Vec::new(), options, base_registry(options))
}

fn base_registry(options: &CompileOptions) -> TypeRegistry {
    if options.register_builtins {
        TypeRegistry::with_builtins()
    } else {
        TypeRegistry::new()
    }
}

fn finish(
    mut tables: Vec<TableDefinition>,
    mut diagnostics: Vec<Diagnostic>,
    options: &CompileOptions,
    mut registry: TypeRegistry,
) -> Result<Compilation, CompileError> {
    diagnostics.extend(normalize_ids(&mut tables));
    diagnostics.extend(registry.register_tables(&tables));
    diagnostics.extend(validate(&tables, &registry));

    if diagnostics.iter().any(|d| options.is_fatal(d)) {
        #[cfg(feature = "tracing")]
        tracing::warn!(diagnostics = diagnostics.len(), "compile aborted before binding");
        return Err(CompileError::Invalid(diagnostics));
    }

    let model = bind(&tables, &registry)?;
    Ok(Compilation {
        model,
        definitions: tables,
        warnings: diagnostics,
    })
}
