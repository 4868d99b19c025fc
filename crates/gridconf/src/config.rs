use gridconf_parse::ParseOptions;

/// Pipeline policy for one compile run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub parse: ParseOptions,
    /// Pages whose name starts with this character are not scanned.
    pub skip_page_prefix: Option<char>,
    /// Treat warning diagnostics as fatal.
    pub warnings_as_errors: bool,
    /// Seed the type registry with `int`, `float`, `string`, `bool` and the
    /// duration types.
    pub register_builtins: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            skip_page_prefix: Some('\''),
            warnings_as_errors: false,
            register_builtins: true,
        }
    }
}

impl CompileOptions {
    /// Any diagnostic, warning or error, aborts the run.
    pub fn strict() -> Self {
        Self {
            warnings_as_errors: true,
            ..Default::default()
        }
    }

    /// No ambiguous-anchor warnings; only errors abort.
    pub fn lenient() -> Self {
        Self {
            parse: ParseOptions {
                diagnose_ambiguous_anchors: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub(crate) fn skips(&self, page_name: &str) -> bool {
        self.skip_page_prefix
            .is_some_and(|prefix| page_name.starts_with(prefix))
    }

    pub(crate) fn is_fatal(&self, diagnostic: &gridconf_common::Diagnostic) -> bool {
        self.warnings_as_errors || diagnostic.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let d = CompileOptions::default();
        assert!(d.skips("'notes"));
        assert!(!d.skips("Bots"));
        assert!(!d.warnings_as_errors);
        assert!(CompileOptions::strict().warnings_as_errors);
        assert!(!CompileOptions::lenient().parse.diagnose_ambiguous_anchors);

        let none = CompileOptions {
            skip_page_prefix: None,
            ..Default::default()
        };
        assert!(!none.skips("'notes"));
    }
}
