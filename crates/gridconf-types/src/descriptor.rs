use std::sync::Arc;

use gridconf_common::Value;
use gridconf_parse::Tokenizer;

use crate::TypeError;

/// Parses and validates one scalar type.
///
/// Implementors only need [`parse`](TypeDescriptor::parse); arrays go through
/// the shared [`ArrayType`] adapter.
pub trait TypeDescriptor: Send + Sync {
    /// Lookup key (matched case-insensitively).
    fn name(&self) -> &str;

    /// Name a code emitter should use for the runtime type.
    fn display_name(&self) -> &str {
        self.name()
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError>;

    /// Parse already-split tokens; the first bad token fails the whole array.
    fn parse_array(&self, tokens: &[String]) -> Result<Vec<Value>, TypeError> {
        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                self.parse(token.trim())
                    .map_err(|e| TypeError::ArrayElement {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect()
    }

    /// Name of the Database Table this type resolves IDs against, if any.
    fn table_ref(&self) -> Option<&str> {
        None
    }
}

/// `T[]` over any element descriptor. A single cell is split on `,`.
pub struct ArrayType {
    element: Arc<dyn TypeDescriptor>,
    name: String,
    display: String,
}

impl ArrayType {
    pub fn new(element: Arc<dyn TypeDescriptor>) -> Self {
        let name = format!("{}[]", element.name());
        let display = format!("{}[]", element.display_name());
        Self {
            element,
            name,
            display,
        }
    }

    pub fn element(&self) -> &Arc<dyn TypeDescriptor> {
        &self.element
    }
}

impl TypeDescriptor for ArrayType {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        if token.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        let tokens = Tokenizer::new(",").tokenize(token);
        self.element.parse_array(&tokens).map(Value::Array)
    }

    fn table_ref(&self) -> Option<&str> {
        self.element.table_ref()
    }
}

impl std::fmt::Debug for dyn TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeDescriptor({})", self.name())
    }
}
