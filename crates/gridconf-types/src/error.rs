use thiserror::Error;

/// Why a token failed to parse under a type. Always a value, never a panic,
/// so callers can keep scanning after a bad cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid {type_name} value \"{token}\"")]
    InvalidLiteral { type_name: String, token: String },

    #[error("{type_name} value \"{token}\" is out of range")]
    OutOfRange { type_name: String, token: String },

    #[error("\"{token}\" is not an id in table {table}")]
    UnknownId { table: String, token: String },

    #[error("\"{token}\" is not a constant of {table}")]
    UnknownConstant { table: String, token: String },

    #[error("unknown type \"{0}\"")]
    UnknownType(String),

    #[error("element {index}: {source}")]
    ArrayElement {
        index: usize,
        #[source]
        source: Box<TypeError>,
    },
}

impl TypeError {
    pub fn invalid(type_name: &str, token: &str) -> Self {
        TypeError::InvalidLiteral {
            type_name: type_name.to_string(),
            token: token.to_string(),
        }
    }

    /// Innermost error, unwrapping array element context.
    pub fn root_cause(&self) -> &TypeError {
        match self {
            TypeError::ArrayElement { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
