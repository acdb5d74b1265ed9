//! Command tree validation.
//!
//! Validates the structural invariants of a command tree, catching empty
//! names, duplicate sibling names, duplicate options and misplaced variadic
//! positionals before a tree is handed to the parser.
//!
//! The parser itself never validates. Alias collisions between siblings are
//! not reported either: the first declared sibling wins deterministically.
//!
//! # Examples
//!
//! ```
//! use command_dispatch_core::*;
//!
//! let tree = CommandNode::group("mycli")
//!     .with_child(CommandNode::command("list"))
//!     .with_child(CommandNode::command("list"));
//! let errors = validate_tree(&tree);
//! assert_eq!(errors, vec![ValidationError::DuplicateChild("mycli list".into())]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::CommandNode;

/// Command tree validation errors.
///
/// Each variant carries the space-joined path of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Node name is empty or whitespace-only.
    #[error("command name cannot be empty at path: {0}")]
    EmptyName(String),
    /// Two children of the same node share a name.
    #[error("duplicate child in scope: {0}")]
    DuplicateChild(String),
    /// Option name is empty or whitespace-only.
    #[error("option name cannot be empty at path: {0}")]
    EmptyOptionName(String),
    /// Two options of the same node share a name.
    #[error("duplicate option in scope: {0}")]
    DuplicateOption(String),
    /// A `command` node declares children.
    #[error("command node cannot have children: {0}")]
    ChildrenOnCommand(String),
    /// A variadic positional is followed by another positional.
    #[error("variadic positional must be last: {0}")]
    VariadicNotLast(String),
}

/// Validates a command tree, returning every problem found.
pub fn validate_tree(root: &CommandNode) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if root.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName(String::new()));
    }
    validate_node(root, root.name.trim(), &mut errors);
    errors
}

fn validate_node(node: &CommandNode, path: &str, errors: &mut Vec<ValidationError>) {
    if !node.is_group() && node.has_children() {
        errors.push(ValidationError::ChildrenOnCommand(path.to_string()));
    }

    let mut seen_options: HashSet<&str> = HashSet::new();
    for option in &node.options {
        let name = option.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyOptionName(path.to_string()));
        } else if !seen_options.insert(name) {
            errors.push(ValidationError::DuplicateOption(format!("{path} --{name}")));
        }
    }

    if let Some(pos) = node.positionals.iter().position(|p| p.is_variadic()) {
        if pos + 1 < node.positionals.len() {
            errors.push(ValidationError::VariadicNotLast(format!(
                "{path} {}",
                node.positionals[pos].name
            )));
        }
    }

    let mut seen_children: HashSet<&str> = HashSet::new();
    for child in &node.children {
        let name = child.name.trim();
        let child_path = format!("{path} {name}");
        if name.is_empty() {
            errors.push(ValidationError::EmptyName(path.to_string()));
            continue;
        }
        if !seen_children.insert(name) {
            errors.push(ValidationError::DuplicateChild(child_path));
            continue;
        }
        validate_node(child, &child_path, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OptionSpec, PositionalSpec};

    #[test]
    fn test_valid_tree() {
        let tree = CommandNode::group("mycli").with_child(
            CommandNode::group("files").with_child(
                CommandNode::command("copy")
                    .with_option(OptionSpec::boolean("force").with_alias("f"))
                    .with_positional(PositionalSpec::new("dest"))
                    .with_positional(PositionalSpec::new("sources...")),
            ),
        );
        assert!(validate_tree(&tree).is_empty());
    }

    #[test]
    fn test_alias_collisions_are_not_errors() {
        let tree = CommandNode::group("mycli")
            .with_child(CommandNode::command("fetch").with_alias("f"))
            .with_child(CommandNode::command("format").with_alias("f"));
        assert!(validate_tree(&tree).is_empty());
    }

    #[test]
    fn test_empty_names() {
        let tree = CommandNode::group(" ")
            .with_child(CommandNode::command("").with_option(OptionSpec::boolean("x")))
            .with_child(CommandNode::command("ok").with_option(OptionSpec::string(" ")));
        let errors = validate_tree(&tree);
        assert!(errors.contains(&ValidationError::EmptyName(String::new())));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::EmptyOptionName(_))));
    }

    #[test]
    fn test_duplicate_options() {
        let tree = CommandNode::group("mycli").with_child(
            CommandNode::command("run")
                .with_option(OptionSpec::boolean("dry-run"))
                .with_option(OptionSpec::string("dry-run")),
        );
        assert_eq!(
            validate_tree(&tree),
            vec![ValidationError::DuplicateOption("mycli run --dry-run".into())]
        );
    }

    #[test]
    fn test_children_on_command() {
        let tree = CommandNode::group("mycli")
            .with_child(CommandNode::command("run").with_child(CommandNode::command("now")));
        assert_eq!(
            validate_tree(&tree),
            vec![ValidationError::ChildrenOnCommand("mycli run".into())]
        );
    }

    #[test]
    fn test_variadic_not_last() {
        let tree = CommandNode::group("mycli").with_child(
            CommandNode::command("copy")
                .with_positional(PositionalSpec::new("sources..."))
                .with_positional(PositionalSpec::new("dest")),
        );
        assert_eq!(
            validate_tree(&tree),
            vec![ValidationError::VariadicNotLast("mycli copy sources...".into())]
        );
    }
}
