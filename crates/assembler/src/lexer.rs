//! Tokenizer for IPPcode18 source text.

/// A single token from a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A word without `@`: an opcode, a label or a type name.
    Word(String),
    /// A word containing `@`, split at the first one: `GF@x`, `int@5`.
    Prefixed { prefix: String, body: String },
}

impl Token {
    /// The token as it appeared in the source.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Word(word) => word.clone(),
            Token::Prefixed { prefix, body } => format!("{prefix}@{body}"),
        }
    }
}

/// Remove a `#` comment from a line.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Tokenize a single line of source text.
///
/// Returns an empty Vec for blank lines and comment-only lines. Case is
/// preserved; opcodes are matched case-insensitively later.
pub(crate) fn tokenize_line(line: &str) -> Vec<Token> {
    strip_comment(line)
        .split_whitespace()
        .map(|word| match word.split_once('@') {
            Some((prefix, body)) => Token::Prefixed {
                prefix: prefix.to_string(),
                body: body.to_string(),
            },
            None => Token::Word(word.to_string()),
        })
        .collect()
}
