//! Input tokenization.
//!
//! A command line arrives either as raw text typed by a user or as an
//! argument vector that the operating system already split. [`CommandInput`]
//! covers both; only raw text goes through [`tokenize`].

use tracing::debug;

/// Raw text or a pre-split token list.
#[derive(Debug, Clone, Copy)]
pub enum CommandInput<'a> {
    /// Text to split with shell-style quoting rules.
    Line(&'a str),
    /// Tokens that pass through unchanged.
    Tokens(&'a [String]),
}

impl CommandInput<'_> {
    /// Converts the input into an owned token list.
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Self::Line(line) => tokenize(line),
            Self::Tokens(tokens) => tokens.to_vec(),
        }
    }
}

impl<'a> From<&'a str> for CommandInput<'a> {
    fn from(line: &'a str) -> Self {
        Self::Line(line)
    }
}

impl<'a> From<&'a String> for CommandInput<'a> {
    fn from(line: &'a String) -> Self {
        Self::Line(line)
    }
}

impl<'a> From<&'a [String]> for CommandInput<'a> {
    fn from(tokens: &'a [String]) -> Self {
        Self::Tokens(tokens)
    }
}

impl<'a> From<&'a Vec<String>> for CommandInput<'a> {
    fn from(tokens: &'a Vec<String>) -> Self {
        Self::Tokens(tokens)
    }
}

/// Splits a line into tokens using shell quoting rules.
///
/// Quoted substrings stay single tokens and an explicitly quoted empty
/// string yields a blank token; the parser skips blanks. Quotes are the only
/// special characters: `#` never starts a comment and backslashes are kept
/// as typed. A line with an unterminated quote falls back to plain
/// whitespace splitting so that tokenization never fails.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::tokenize;
///
/// assert_eq!(tokenize("files list -l /tmp"), ["files", "list", "-l", "/tmp"]);
/// assert_eq!(tokenize(r#"note add "hello world""#), ["note", "add", "hello world"]);
/// assert_eq!(tokenize("issue #42"), ["issue", "#42"]);
/// assert_eq!(tokenize(r"cd C:\tmp"), ["cd", r"C:\tmp"]);
/// assert_eq!(tokenize("say 'it"), ["say", "'it"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    match shell_words::split(&escape_literals(line)) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!(line = %line, error = %err, "Falling back to whitespace split");
            line.split_whitespace().map(String::from).collect()
        }
    }
}

/// Escapes `#` and `\` so `shell_words` reads them as literal text.
///
/// Inside single quotes everything is already literal. Inside double quotes
/// only the backslash needs escaping.
fn escape_literals(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (Some('\''), _) => {}
            (None, '#') | (None | Some('"'), '\\') => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}
