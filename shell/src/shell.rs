//! Interactive read-eval-print loop over a command tree.
//!
//! Each cycle prints a prompt, blocks for one line and dispatches it before
//! the next line is read, so at most one command is ever in flight. No
//! timeout is imposed on invokers: one that never returns blocks the prompt.

use std::io::{BufRead, Write};

use command_dispatch_core::{
    ArgValue, ArgumentBag, CommandNode, CommandParser, SuggestionEngine, SuggestionScope,
};
use tracing::{debug, trace, warn};

use crate::config::ShellConfig;
use crate::diagnostics::{FAILURE_MESSAGE_KEY, build_failure_message};
use crate::error::{Result, ShellError};
use crate::invoker::{CommandInvoker, FailureInvoker, Invocation};

/// Words that end the session.
pub const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "bye"];
/// Words that clear the display.
pub const CLEAR_COMMANDS: [&str; 2] = ["clear", "cls"];

pub const EXIT_MESSAGE: &str = "Exit acknowledged.";
pub const END_OF_INPUT_MESSAGE: &str = "End of input";
const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[0;0f";

/// Built-in words handled before the parser sees the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Clear,
}

impl MetaCommand {
    /// Recognizes a meta-command, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_shell::MetaCommand;
    ///
    /// assert_eq!(MetaCommand::from_line("  QUIT "), Some(MetaCommand::Exit));
    /// assert_eq!(MetaCommand::from_line("cls"), Some(MetaCommand::Clear));
    /// assert_eq!(MetaCommand::from_line("exit now"), None);
    /// ```
    pub fn from_line(line: &str) -> Option<Self> {
        let word = line.trim().to_lowercase();
        if EXIT_COMMANDS.contains(&word.as_str()) {
            Some(Self::Exit)
        } else if CLEAR_COMMANDS.contains(&word.as_str()) {
            Some(Self::Clear)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Exit,
}

/// Interactive shell bound to one command tree.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
///
/// use command_dispatch_core::CommandNode;
/// use command_dispatch_shell::{InvokeError, Invocation, Shell};
///
/// let tree = CommandNode::group("mycli").with_child(CommandNode::command("status"));
/// let mut ran = Vec::new();
/// let mut output = Vec::new();
///
/// let mut shell = Shell::new(
///     &tree,
///     Cursor::new("status\nexit\n"),
///     &mut output,
///     |inv: &Invocation<'_>| -> Result<(), InvokeError> {
///         ran.push(inv.node.name.clone());
///         Ok(())
///     },
///     |_: &Invocation<'_>| -> Result<(), InvokeError> { Ok(()) },
/// );
/// shell.start().unwrap();
/// drop(shell);
///
/// assert_eq!(ran, ["status"]);
/// assert!(String::from_utf8(output).unwrap().contains("Exit acknowledged."));
/// ```
pub struct Shell<'t, R, W, C, F> {
    tree: &'t CommandNode,
    parser: CommandParser<'t>,
    engine: SuggestionEngine<'t>,
    config: ShellConfig,
    input: R,
    output: W,
    invoker: C,
    failure_invoker: F,
}

impl<'t, R, W, C, F> Shell<'t, R, W, C, F>
where
    R: BufRead,
    W: Write,
    C: CommandInvoker,
    F: FailureInvoker,
{
    pub fn new(tree: &'t CommandNode, input: R, output: W, invoker: C, failure_invoker: F) -> Self {
        Self {
            tree,
            parser: CommandParser::new(tree),
            engine: SuggestionEngine::new(tree),
            config: ShellConfig::default(),
            input,
            output,
            invoker,
            failure_invoker,
        }
    }

    /// Applies a configuration, replacing the primary commands, bin name,
    /// prompt and session messages.
    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.parser = CommandParser::new(self.tree)
            .with_primary_commands(config.primary_commands.iter().cloned());
        self.config = config;
        self
    }

    /// Runs the loop until an exit word, end of input, a read or write
    /// error, or a failing command invoker.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] when reading or writing fails and
    /// [`ShellError::Dispatch`] when the command invoker fails. Failure
    /// invoker errors are logged and never returned.
    pub fn start(&mut self) -> Result<()> {
        debug!(
            root = %self.tree.name,
            primary_commands = ?self.config.primary_commands,
            "Starting shell"
        );
        let prompt = self.config.prompt_for(self.tree);
        let mut line = String::new();

        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output, "{}", self.config.end_of_input_message())?;
                return Ok(());
            }
            let command = line.trim_end_matches(['\r', '\n']);
            if self.handle_line(command)? == LineOutcome::Exit {
                return Ok(());
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        debug!(len = line.len(), "Command received by shell");
        trace!(line = %line, "Command received");

        match MetaCommand::from_line(line) {
            Some(MetaCommand::Exit) => {
                writeln!(self.output, "{}", self.config.exit_message())?;
                return Ok(LineOutcome::Exit);
            }
            Some(MetaCommand::Clear) => {
                write!(self.output, "{CLEAR_SCREEN}")?;
                return Ok(LineOutcome::Continue);
            }
            None => {}
        }

        let result = self.parser.parse(line);
        if result.success {
            let invocation = Invocation {
                root: self.tree,
                node: result.command_to_invoke,
                arguments: &result.arguments,
                line,
            };
            self.invoker
                .invoke(&invocation)
                .map_err(|source| ShellError::Dispatch {
                    command: result.command_to_invoke.name.clone(),
                    source,
                })?;
        } else {
            self.fail(line, result.arguments);
        }
        Ok(LineOutcome::Continue)
    }

    fn fail(&mut self, line: &str, mut arguments: ArgumentBag) {
        let bin_name = self.config.bin_name_for(self.tree).to_string();
        let message = build_failure_message(
            self.tree,
            &self.engine,
            &self.config.primary_commands,
            &bin_name,
            line,
        );
        arguments.set_option(
            FAILURE_MESSAGE_KEY,
            FAILURE_MESSAGE_KEY,
            ArgValue::String(message),
        );

        let failed = CommandNode::command(&format!("{bin_name} {line}"))
            .with_description("The command you tried to invoke failed");
        let invocation = Invocation {
            root: self.tree,
            node: &failed,
            arguments: &arguments,
            line,
        };
        if let Err(err) = self.failure_invoker.invoke(&invocation) {
            // Syntax errors must never stop the shell.
            warn!(error = %err, line = %line, "Failure handler returned an error");
        }
    }

    /// Suggests completions for a partially typed line: the nearest and
    /// second-nearest leaf command paths, plus the text as given.
    pub fn complete_command(&self, partial: &str) -> (Vec<String>, String) {
        complete_with(&self.engine, partial)
    }
}

/// Completion over any suggestion engine; see [`Shell::complete_command`].
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandNode, SuggestionEngine};
/// use command_dispatch_shell::complete_with;
///
/// let tree = CommandNode::group("mycli").with_child(
///     CommandNode::group("files")
///         .with_child(CommandNode::command("list"))
///         .with_child(CommandNode::command("remove")),
/// );
/// let engine = SuggestionEngine::new(&tree);
/// let (candidates, original) = complete_with(&engine, "files li");
/// assert_eq!(candidates, ["files list", "files remove"]);
/// assert_eq!(original, "files li");
/// ```
pub fn complete_with(engine: &SuggestionEngine<'_>, partial: &str) -> (Vec<String>, String) {
    let (nearest, second) = engine.closest_two(partial, SuggestionScope::Commands);
    let candidates = nearest
        .into_iter()
        .chain(second)
        .map(|s| s.full_path)
        .collect();
    (candidates, partial.to_string())
}
