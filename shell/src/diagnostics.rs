//! Diagnostic messages for lines that failed to parse.
//!
//! The diagnostic walks at most two levels of the tree with the first words
//! of the issued text, lists what is available at the deepest group reached
//! and suggests the nearest full command path by edit distance.

use command_dispatch_core::{CommandNode, SuggestionEngine};

/// Argument key under which the rendered diagnostic is attached.
pub const FAILURE_MESSAGE_KEY: &str = "failureMessage";

const MAX_SEGMENTS: usize = 3;
const MAX_DEPTH: usize = 2;

/// What could and could not be resolved from a failed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Text as issued, primary command included
    pub issued: String,
    /// Leading segments that matched groups, in order
    pub resolved: Vec<String>,
    /// First segment that did not resolve
    pub unresolved: Option<String>,
    /// Nearest group or command path
    pub suggestion: Option<String>,
    /// Child names of the deepest resolved group
    pub available_commands: Vec<String>,
}

/// Matches by name or first alias only.
fn names_node(node: &CommandNode, segment: &str) -> bool {
    node.name.trim() == segment || node.aliases.first().is_some_and(|a| a == segment)
}

impl Diagnostic {
    /// Diagnoses `issued` against `tree`.
    ///
    /// A leading word found in `primary_commands` is skipped before walking
    /// the tree, as the parser skips it.
    pub fn new(
        tree: &CommandNode,
        engine: &SuggestionEngine<'_>,
        primary_commands: &[String],
        issued: &str,
    ) -> Self {
        let mut segments: Vec<&str> = issued.split_whitespace().collect();
        if segments
            .first()
            .is_some_and(|first| primary_commands.iter().any(|p| p == first))
        {
            segments.remove(0);
        }
        segments.truncate(MAX_SEGMENTS);

        let mut group = tree;
        let mut resolved = Vec::new();
        for segment in segments.iter().take(MAX_DEPTH) {
            match group.children.iter().find(|child| names_node(child, segment)) {
                Some(child) => {
                    resolved.push(segment.to_string());
                    group = child;
                }
                None => break,
            }
        }

        let available_commands = if resolved.is_empty() {
            Vec::new()
        } else {
            group.child_names().into_iter().map(String::from).collect()
        };

        Self {
            issued: issued.to_string(),
            unresolved: segments.get(resolved.len()).map(|s| s.to_string()),
            resolved,
            suggestion: engine.closest_anything(issued).map(|s| s.full_path),
            available_commands,
        }
    }

    /// Renders the multi-line message shown to the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_core::{CommandNode, SuggestionEngine};
    /// use command_dispatch_shell::Diagnostic;
    ///
    /// let tree = CommandNode::group("mycli")
    ///     .with_child(CommandNode::group("files").with_child(CommandNode::command("list")));
    /// let engine = SuggestionEngine::new(&tree);
    ///
    /// let message = Diagnostic::new(&tree, &engine, &[], "files lst").render("mycli");
    /// assert!(message.contains("Did you mean: files list?"));
    /// assert!(message.contains(r#"Available commands are "list"."#));
    /// assert!(message.ends_with(r#"Use "mycli files --help" to view groups, commands, and options."#));
    /// ```
    pub fn render(&self, bin_name: &str) -> String {
        let mut message = String::from("Command failed due to improper syntax");
        message.push_str(&format!("\nCommand entered: \"{bin_name} {}\"", self.issued));

        if let Some(suggestion) = &self.suggestion {
            if let Some(unresolved) = &self.unresolved {
                message.push_str(&format!("\nUnknown group: {unresolved}"));
            }
            message.push_str(&format!("\nDid you mean: {suggestion}?"));
        }

        if !self.available_commands.is_empty() {
            message.push_str(&format!(
                "\nAvailable commands are \"{}\".",
                self.available_commands.join(", ")
            ));
        }

        let groups: String = self.resolved.iter().map(|g| format!("{g} ")).collect();
        message.push_str(&format!(
            "\nUse \"{bin_name} {groups}--help\" to view groups, commands, and options."
        ));
        message
    }
}

/// Diagnoses and renders in one step.
pub fn build_failure_message(
    tree: &CommandNode,
    engine: &SuggestionEngine<'_>,
    primary_commands: &[String],
    bin_name: &str,
    issued: &str,
) -> String {
    Diagnostic::new(tree, engine, primary_commands, issued).render(bin_name)
}
