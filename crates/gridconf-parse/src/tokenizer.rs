//! Splits one cell's text into array tokens.
//!
//! The tokenizer is total: every input yields a (possibly empty) token list.
//! Delimiters inside `"…"` are literal, backslash escapes are decoded
//! everywhere, and tokens wrapped in quotes lose the outer pair.

/// Decode a single escape character (the char after `\`).
fn escaped(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        '0' => '\0',
        // `\\`, `\"` and unknown sequences keep the escaped char
        other => other,
    }
}

/// Decode backslash escapes in `input`. A trailing lone `\` is kept.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(escaped(next));
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Cell tokenizer bound to one delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    delimiter: Option<String>,
}

impl Tokenizer {
    /// A tokenizer that splits on `delimiter`. An empty delimiter means "do
    /// not split".
    pub fn new(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        Self {
            delimiter: if delimiter.is_empty() {
                None
            } else {
                Some(delimiter)
            },
        }
    }

    /// A tokenizer that never splits; the whole cell is one token.
    pub fn whole() -> Self {
        Self { delimiter: None }
    }

    pub fn tokenize(&self, input: &str) -> Vec<String> {
        if input.is_empty() {
            return Vec::new();
        }
        let Some(delim) = self.delimiter.as_deref() else {
            return vec![input.trim().to_string()];
        };

        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if ch == '\\' {
                if let Some(next) = rest[1..].chars().next() {
                    current.push(escaped(next));
                    pos += 1 + next.len_utf8();
                    continue;
                }
            }

            if ch == '"' {
                in_quotes = !in_quotes;
                current.push(ch);
            } else if !in_quotes && rest.starts_with(delim) {
                flush(&mut current, &mut tokens);
                pos += delim.len();
                continue;
            } else {
                current.push(ch);
            }
            pos += ch.len_utf8();
        }
        flush(&mut current, &mut tokens);
        tokens
    }
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let trimmed = current.trim();
    let token = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    tokens.push(token.to_string());
    current.clear();
}

/// Convenience for one-off splitting.
pub fn tokenize(input: &str, delimiter: &str) -> Vec<String> {
    Tokenizer::new(delimiter).tokenize(input)
}
