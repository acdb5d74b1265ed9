//! Interactive shell for command-dispatch trees.
//!
//! This crate drives a [`command_dispatch_core`] parser from a line-oriented
//! input stream:
//!
//! - [`Shell`]: the read-eval-print loop. Exit and clear words are handled
//!   directly; every other line is parsed against the full tree and handed
//!   to a [`CommandInvoker`] on success or a [`FailureInvoker`] on failure.
//! - [`Diagnostic`]: builds the "did you mean" message attached to failed
//!   lines under [`FAILURE_MESSAGE_KEY`].
//! - [`ShellConfig`]: YAML configuration for prompt, bin name and primary
//!   commands.
//! - [`load_tree`]: reads a command tree from a JSON or YAML file.
//!
//! # Quick start
//!
//! ```no_run
//! use std::io::{self, BufReader};
//!
//! use command_dispatch_shell::{InvokeError, Invocation, Shell, ShellConfig, load_tree};
//!
//! let tree = load_tree("tree.yaml").unwrap();
//! let config = ShellConfig::load("shell.yml").unwrap();
//!
//! let mut shell = Shell::new(
//!     &tree,
//!     BufReader::new(io::stdin()),
//!     io::stdout(),
//!     |inv: &Invocation<'_>| -> Result<(), InvokeError> {
//!         println!("running {} with {:?}", inv.node.name, inv.mode());
//!         Ok(())
//!     },
//!     |inv: &Invocation<'_>| -> Result<(), InvokeError> {
//!         eprintln!("{:?}", inv.arguments.get("failureMessage"));
//!         Ok(())
//!     },
//! )
//! .with_config(config);
//! shell.start().unwrap();
//! ```

mod config;
mod diagnostics;
mod error;
mod invoker;
mod loader;
mod shell;

pub use config::ShellConfig;
pub use diagnostics::{Diagnostic, FAILURE_MESSAGE_KEY, build_failure_message};
pub use error::{InvokeError, Result, ShellError};
pub use invoker::{CommandInvoker, DispatchMode, FailureInvoker, Invocation, ResponseFormat};
pub use loader::{TreeFormat, load_tree, parse_tree_str};
pub use shell::{
    CLEAR_COMMANDS, END_OF_INPUT_MESSAGE, EXIT_COMMANDS, EXIT_MESSAGE, MetaCommand, Shell,
    complete_with,
};
