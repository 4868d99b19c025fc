use gridconf_bind::BindError;
use gridconf_common::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// Validation found fatal diagnostics; binding was not attempted. Holds
    /// every diagnostic of the run, warnings included.
    #[error("{}", summarize(.0))]
    Invalid(Vec<Diagnostic>),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[cfg(feature = "json")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Invalid(d) => d,
            _ => &[],
        }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let mut out = format!(
        "{} error(s), {} warning(s)",
        errors,
        diagnostics.len() - errors
    );
    for d in diagnostics {
        out.push('\n');
        out.push_str(&d.to_string());
    }
    out
}
