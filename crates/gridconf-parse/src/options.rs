/// Grid-scanning knobs. Defaults match the authoring conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// ID/key cell text that ends a table.
    pub end_marker: String,
    /// Leading character that disables a row or column.
    pub disabled_prefix: char,
    /// Emit warnings for anchors whose header cells only partially match a
    /// table shape.
    pub diagnose_ambiguous_anchors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            end_marker: "END".to_string(),
            disabled_prefix: '!',
            diagnose_ambiguous_anchors: true,
        }
    }
}

impl ParseOptions {
    pub(crate) fn is_end(&self, text: &str) -> bool {
        text == self.end_marker
    }

    pub(crate) fn is_disabled(&self, text: &str) -> bool {
        text.starts_with(self.disabled_prefix)
    }
}
