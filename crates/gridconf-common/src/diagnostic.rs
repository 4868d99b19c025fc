//! Accumulated, non-fatal findings from scanning and validation.
//!
//! - **`DiagnosticKind`**    : what went wrong (stable kebab-case code)
//! - **`Severity`**          : `Error` aborts the pipeline, `Warning` does not
//! - **`DiagnosticContext`** : table / page / cell location (0-based)
//! - **`Diagnostic`**        : one struct that glues them together
//!
//! `Display` renders one line with a 1-based row and a column letter, e.g.
//! `error[duplicate-id]: Bots!A7: duplicate id "3" (first seen at row 5)`.

use std::fmt;

use crate::address::cell_name;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Two tables' margin-expanded rectangles intersect.
    Overlap,
    InvalidName,
    DuplicateId,
    DuplicateField,
    /// Nested record type name reused by an ancestor or sibling record.
    TypeNameCollision,
    UnknownType,
    InvalidValue,
    DuplicateTable,
    /// Anchor whose header cells only partially match a table shape.
    AmbiguousAnchor,
    /// Constant value that could not be read and was reassigned.
    InvalidConstant,
    TypeAlreadyRegistered,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::InvalidName => "invalid-name",
            Self::DuplicateId => "duplicate-id",
            Self::DuplicateField => "duplicate-field",
            Self::TypeNameCollision => "type-name-collision",
            Self::UnknownType => "unknown-type",
            Self::InvalidValue => "invalid-value",
            Self::DuplicateTable => "duplicate-table",
            Self::AmbiguousAnchor => "ambiguous-anchor",
            Self::InvalidConstant => "invalid-constant",
            Self::TypeAlreadyRegistered => "type-already-registered",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::AmbiguousAnchor | Self::InvalidConstant | Self::TypeAlreadyRegistered => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where a diagnostic points. Rows and columns are 0-based grid coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DiagnosticContext {
    pub table: Option<String>,
    pub page: Option<String>,
    pub row: Option<u32>,
    pub col: Option<u32>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub context: DiagnosticContext,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(kind: DiagnosticKind, message: S) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            context: DiagnosticContext::default(),
        }
    }

    pub fn with_table<S: Into<String>>(mut self, table: S) -> Self {
        self.context.table = Some(table.into());
        self
    }

    pub fn with_page<S: Into<String>>(mut self, page: S) -> Self {
        self.context.page = Some(page.into());
        self
    }

    pub fn with_location(mut self, row: u32, col: u32) -> Self {
        self.context.row = Some(row);
        self.context.col = Some(col);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: ", self.severity, self.kind)?;

        let ctx = &self.context;
        let scope = ctx.table.as_deref().or(ctx.page.as_deref());
        let cell = match (ctx.row, ctx.col) {
            (Some(r), Some(c)) => Some(cell_name(r, c)),
            (Some(r), None) => Some(format!("row {}", r as u64 + 1)),
            _ => None,
        };
        match (scope, cell) {
            (Some(s), Some(c)) if ctx.col.is_some() => write!(f, "{s}!{c}: ")?,
            (Some(s), Some(c)) => write!(f, "{s} {c}: ")?,
            (Some(s), None) => write!(f, "{s}: ")?,
            (None, Some(c)) => write!(f, "{c}: ")?,
            (None, None) => {}
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// True if any diagnostic in the slice is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_letters_and_one_based_rows() {
        let d = Diagnostic::new(
            DiagnosticKind::DuplicateId,
            "duplicate id \"3\" (first seen at row 5)",
        )
        .with_table("Bots")
        .with_location(6, 0);
        assert_eq!(
            d.to_string(),
            "error[duplicate-id]: Bots!A7: duplicate id \"3\" (first seen at row 5)"
        );
    }

    #[test]
    fn display_without_location() {
        let d = Diagnostic::new(DiagnosticKind::DuplicateTable, "table \"Bots\" defined twice");
        assert_eq!(
            d.to_string(),
            "error[duplicate-table]: table \"Bots\" defined twice"
        );
        let mut d = d.with_page("Sheet1");
        d.context.row = Some(2);
        assert_eq!(
            d.to_string(),
            "error[duplicate-table]: Sheet1 row 3: table \"Bots\" defined twice"
        );
    }

    #[test]
    fn severity_follows_kind() {
        assert!(Diagnostic::new(DiagnosticKind::Overlap, "").is_error());
        assert!(Diagnostic::new(DiagnosticKind::AmbiguousAnchor, "").is_warning());
        let promoted = Diagnostic::new(DiagnosticKind::AmbiguousAnchor, "")
            .with_severity(Severity::Error);
        assert!(has_errors(&[promoted]));
    }
}
