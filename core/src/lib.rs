//! Command tree parsing and suggestion primitives.
//!
//! This crate turns raw user input into a resolved command plus structured
//! arguments, given a static description of a program's command hierarchy:
//!
//! - [`CommandNode`]: a group or command, with [`OptionSpec`]s,
//!   [`PositionalSpec`]s and nested children.
//! - [`tokenize`]: shell-style splitting of a raw line.
//! - [`CommandParser`]: walks the tree alongside the tokens and produces a
//!   [`ParseResult`] holding an [`ArgumentBag`].
//! - [`SuggestionEngine`]: flattens the tree into full paths and finds the
//!   nearest one to a mistyped command by edit distance.
//!
//! Validation ([`validate_tree`]) catches structural mistakes such as
//! duplicate sibling names.
//!
//! Tracing goes through the [`tracing`] facade; without a subscriber
//! installed it costs nothing.
//!
//! # Example
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let tree = CommandNode::group("mycli").with_child(
//!     CommandNode::group("files").with_child(
//!         CommandNode::command("list")
//!             .with_option(OptionSpec::boolean("long").with_alias("l"))
//!             .with_positional(PositionalSpec::new("dir")),
//!     ),
//! );
//!
//! let ok = parse(&tree, "files list -l /tmp");
//! assert!(ok.success);
//! assert_eq!(ok.arguments.commands(), ["files", "list"]);
//!
//! let bad = parse(&tree, "files delete");
//! assert!(!bad.success);
//! assert_eq!(bad.unknown_arguments, ["delete"]);
//! assert_eq!(bad.command_to_invoke.name, "files");
//!
//! let engine = SuggestionEngine::new(&tree);
//! assert_eq!(engine.closest_anything("files lsit").unwrap().full_path, "files list");
//! ```

mod arguments;
mod parser;
mod suggest;
mod tokenize;
mod types;
mod validate;

pub use arguments::{
    ArgValue, ArgumentBag, COMMANDS_KEY, OptionFormat, PRIMARY_COMMAND_KEY, option_format,
};
pub use parser::{CommandParser, ParseResult, parse};
pub use suggest::{
    FlattenedEntry, Suggestion, SuggestionEngine, SuggestionScope, flatten_tree, levenshtein,
};
pub use tokenize::{CommandInput, tokenize};
pub use types::*;
pub use validate::{ValidationError, validate_tree};
