//! Dispatch seams between the shell and the program's command handlers.
//!
//! The shell never executes business logic itself. A successfully parsed
//! line goes to a [`CommandInvoker`]; a line that failed to parse goes to a
//! [`FailureInvoker`] together with a diagnostic message. Closures of the
//! right shape implement both traits.

use command_dispatch_core::{ArgumentBag, CommandNode, HELP_OPTION, JSON_OPTION};

use crate::error::InvokeError;

/// How the handler should format its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Default,
    Json,
}

/// Whether the handler should render help or run the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Help(ResponseFormat),
    Run(ResponseFormat),
}

/// One line ready for dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Root of the full command tree
    pub root: &'a CommandNode,
    /// Node to invoke
    pub node: &'a CommandNode,
    /// Parsed arguments
    pub arguments: &'a ArgumentBag,
    /// Line as typed
    pub line: &'a str,
}

impl Invocation<'_> {
    pub fn response_format(&self) -> ResponseFormat {
        if self.arguments.flag(JSON_OPTION) {
            ResponseFormat::Json
        } else {
            ResponseFormat::Default
        }
    }

    /// Help is requested explicitly with `--help`, and implied for any group
    /// other than the root. The root is run, since it may carry its own
    /// options.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_core::{CommandNode, parse};
    /// use command_dispatch_shell::{DispatchMode, Invocation, ResponseFormat};
    ///
    /// let tree = CommandNode::group("mycli")
    ///     .with_child(CommandNode::group("files").with_child(CommandNode::command("list")));
    ///
    /// let result = parse(&tree, "files");
    /// let invocation = Invocation {
    ///     root: &tree,
    ///     node: result.command_to_invoke,
    ///     arguments: &result.arguments,
    ///     line: "files",
    /// };
    /// assert_eq!(invocation.mode(), DispatchMode::Help(ResponseFormat::Default));
    /// ```
    pub fn mode(&self) -> DispatchMode {
        let format = self.response_format();
        let non_root_group = self.node.is_group() && !std::ptr::eq(self.node, self.root);
        if self.arguments.flag(HELP_OPTION) || non_root_group {
            DispatchMode::Help(format)
        } else {
            DispatchMode::Run(format)
        }
    }
}

/// Executes successfully parsed commands.
///
/// The shell waits for `invoke` to return before reading the next line. An
/// error ends the shell session.
pub trait CommandInvoker {
    fn invoke(&mut self, invocation: &Invocation<'_>) -> Result<(), InvokeError>;
}

/// Reports lines that failed to parse.
///
/// The invocation's arguments carry the diagnostic under
/// [`FAILURE_MESSAGE_KEY`](crate::FAILURE_MESSAGE_KEY). Errors are logged
/// and absorbed by the shell.
pub trait FailureInvoker {
    fn invoke(&mut self, invocation: &Invocation<'_>) -> Result<(), InvokeError>;
}

impl<F> CommandInvoker for F
where
    F: FnMut(&Invocation<'_>) -> Result<(), InvokeError>,
{
    fn invoke(&mut self, invocation: &Invocation<'_>) -> Result<(), InvokeError> {
        self(invocation)
    }
}

impl<F> FailureInvoker for F
where
    F: FnMut(&Invocation<'_>) -> Result<(), InvokeError>,
{
    fn invoke(&mut self, invocation: &Invocation<'_>) -> Result<(), InvokeError> {
        self(invocation)
    }
}
