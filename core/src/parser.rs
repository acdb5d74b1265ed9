//! Command line parser.
//!
//! [`CommandParser`] walks the command tree alongside the token stream. Each
//! non-dash token either descends into a child node, binds a positional or is
//! recorded as unknown; each dash token binds an option of the node reached
//! so far. The parser never fails: malformed input produces a
//! [`ParseResult`] with `success == false` and the offending tokens in
//! `unknown_arguments`.
//!
//! Descent is greedy and never backtracks. Once a token selects a child, a
//! later token cannot move the parse to a sibling.

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::arguments::{ArgValue, ArgumentBag};
use crate::tokenize::CommandInput;
use crate::types::{CommandNode, OptionSpec, OptionType};

/// Outcome of parsing one command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult<'t> {
    /// Bound options, positionals, `_` and `$0`
    pub arguments: ArgumentBag,
    /// `false` iff `unknown_arguments` is non-empty
    pub success: bool,
    /// Tokens that matched nothing, in input order
    pub unknown_arguments: Vec<String>,
    /// Deepest node reached
    #[serde(serialize_with = "serialize_node_name")]
    pub command_to_invoke: &'t CommandNode,
}

fn serialize_node_name<S: Serializer>(node: &&CommandNode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&node.name)
}

/// Parser bound to one command tree.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandNode, CommandParser, OptionSpec, PositionalSpec};
///
/// let tree = CommandNode::group("mycli").with_child(
///     CommandNode::group("files").with_child(
///         CommandNode::command("list")
///             .with_option(OptionSpec::boolean("long").with_alias("l"))
///             .with_positional(PositionalSpec::new("dir")),
///     ),
/// );
///
/// let result = CommandParser::new(&tree).parse("files list -l /tmp");
/// assert!(result.success);
/// assert_eq!(result.command_to_invoke.name, "list");
/// assert!(result.arguments.flag("long"));
/// assert_eq!(result.arguments.get("dir").unwrap().as_str(), Some("/tmp"));
/// ```
#[derive(Debug, Clone)]
pub struct CommandParser<'t> {
    tree: &'t CommandNode,
    primary_commands: Vec<String>,
}

struct ParseState<'t> {
    node: &'t CommandNode,
    positional_index: usize,
    arguments: ArgumentBag,
    unknown_arguments: Vec<String>,
}

impl ParseState<'_> {
    fn unknown(&mut self, token: &str) {
        trace!(token = %token, node = %self.node.name, "Unknown argument");
        self.unknown_arguments.push(token.to_string());
    }
}

impl<'t> CommandParser<'t> {
    /// Creates a parser for `tree` with no primary commands.
    pub fn new(tree: &'t CommandNode) -> Self {
        Self {
            tree,
            primary_commands: Vec::new(),
        }
    }

    /// Sets the names that, when given as the first token, are consumed as
    /// the primary command (`$0`) instead of being parsed against the tree.
    pub fn with_primary_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    pub fn tree(&self) -> &'t CommandNode {
        self.tree
    }

    /// Parses a line or a pre-split token list.
    pub fn parse<'i>(&self, input: impl Into<CommandInput<'i>>) -> ParseResult<'t> {
        let mut tokens = input.into().into_tokens();
        trace!(tokens = ?tokens, "Parsing command arguments");

        let mut primary_command = self.tree.name.clone();
        if !self.primary_commands.is_empty() {
            if let Some(first) = tokens.first() {
                if self.primary_commands.contains(first) {
                    trace!(primary = %first, "Found primary command as first argument");
                    primary_command = tokens.remove(0);
                }
            }
        }

        let mut state = ParseState {
            node: self.tree,
            positional_index: 0,
            arguments: ArgumentBag::new(primary_command),
            unknown_arguments: Vec::new(),
        };

        if tokens.iter().all(|t| t.trim().is_empty()) {
            return finish(state);
        }

        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];
            if token.trim().is_empty() {
                trace!(index, "Skipping blank argument");
            } else if is_dash_option(token) {
                index = parse_option(&tokens, index, &mut state);
            } else {
                index = parse_word(&tokens, index, &mut state);
            }
            index += 1;
        }

        finish(state)
    }
}

/// Parses `input` against `tree` with no primary commands.
pub fn parse<'t, 'i>(tree: &'t CommandNode, input: impl Into<CommandInput<'i>>) -> ParseResult<'t> {
    CommandParser::new(tree).parse(input)
}

fn finish(state: ParseState<'_>) -> ParseResult<'_> {
    ParseResult {
        success: state.unknown_arguments.is_empty(),
        arguments: state.arguments,
        unknown_arguments: state.unknown_arguments,
        command_to_invoke: state.node,
    }
}

fn is_dash_option(token: &str) -> bool {
    token.starts_with('-')
}

/// Handles a non-dash token. Returns the index of the last token consumed.
fn parse_word(tokens: &[String], index: usize, state: &mut ParseState<'_>) -> usize {
    let token = &tokens[index];
    let node = state.node;

    if node.has_children() {
        match node.find_child(token) {
            Some(child) => {
                trace!(token = %token, command = %child.name, "Found command");
                state.arguments.push_command(token.as_str());
                state.node = child;
                state.positional_index = 0;
            }
            None => state.unknown(token),
        }
        return index;
    }

    match node.positionals.get(state.positional_index) {
        Some(positional) if !positional.is_variadic() => {
            trace!(token = %token, positional = %positional.name, "Bound positional");
            state
                .arguments
                .set(&positional.name, ArgValue::String(token.clone()));
            state.positional_index += 1;
            index
        }
        Some(positional) => {
            let (values, end) = collect_values(tokens, index);
            trace!(values = ?values, positional = %positional.name, "Bound variadic positional");
            state.arguments.set(&positional.name, ArgValue::List(values));
            // Variadic positionals are terminal for this node.
            state.positional_index = node.positionals.len();
            end - 1
        }
        None => {
            state.unknown(token);
            index
        }
    }
}

/// Handles a dash token. Returns the index of the last token consumed.
fn parse_option(tokens: &[String], index: usize, state: &mut ParseState<'_>) -> usize {
    let token = &tokens[index];
    let node = state.node;

    if let Some((raw_name, raw_value)) = token.split_once('=') {
        let name = strip_dashes(raw_name);
        let Some(option) = node.find_option(name) else {
            state.unknown(token);
            return index;
        };
        let value = match option.option_type {
            OptionType::Boolean => coerce_bool(raw_value)
                .map(ArgValue::Bool)
                .unwrap_or_else(|| ArgValue::String(raw_value.to_string())),
            _ => ArgValue::String(raw_value.to_string()),
        };
        bind_option(state, name, option, value);
        return index;
    }

    let name = strip_dashes(token);
    let Some(option) = node.find_option(name) else {
        state.unknown(token);
        return index;
    };

    let next = tokens.get(index + 1);
    match option.option_type {
        OptionType::Boolean => match next.and_then(|t| coerce_bool(t.trim())) {
            Some(value) => {
                bind_option(state, name, option, ArgValue::Bool(value));
                index + 1
            }
            None => {
                bind_option(state, name, option, ArgValue::Bool(true));
                index
            }
        },
        OptionType::Array => {
            let (values, end) = collect_values(tokens, index + 1);
            bind_option(state, name, option, ArgValue::List(values));
            end - 1
        }
        OptionType::Number => match next {
            Some(raw) => {
                let value = parse_integer(raw)
                    .map(ArgValue::Number)
                    .unwrap_or_else(|| ArgValue::String(raw.clone()));
                bind_option(state, name, option, value);
                index + 1
            }
            None => {
                bind_option(state, name, option, ArgValue::Unset);
                index
            }
        },
        OptionType::String => match next {
            Some(raw) => {
                bind_option(state, name, option, ArgValue::String(raw.clone()));
                index + 1
            }
            None => {
                bind_option(state, name, option, ArgValue::Unset);
                index
            }
        },
    }
}

fn bind_option(state: &mut ParseState<'_>, typed: &str, option: &OptionSpec, value: ArgValue) {
    trace!(option = %option.name, typed = %typed, value = ?value, "Bound option");
    state.arguments.set_option(typed, &option.name, value);
}

/// Collects non-dash tokens starting at `from`, skipping blanks, up to the
/// next dash token or the end of input. Returns the values and the index of
/// the first token not consumed.
fn collect_values(tokens: &[String], from: usize) -> (Vec<String>, usize) {
    let mut values = Vec::new();
    let mut end = from;
    while let Some(token) = tokens.get(end) {
        if is_dash_option(token) {
            break;
        }
        if !token.trim().is_empty() {
            values.push(token.clone());
        }
        end += 1;
    }
    (values, end)
}

fn strip_dashes(token: &str) -> &str {
    token.trim_start_matches('-')
}

fn coerce_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Reads a leading base-ten integer, ignoring any trailing text
/// (`"42px"` is 42). Returns `None` when no digits lead the value.
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
