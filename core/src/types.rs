//! Command tree type definitions.
//!
//! This module defines the static description of a program's command
//! hierarchy: groups and commands ([`CommandNode`]), their dash options
//! ([`OptionSpec`]) and their positional arguments ([`PositionalSpec`]).
//! The types are designed for serialization with [`serde`] so that a tree can
//! be authored as JSON or YAML and loaded at startup.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Marker that turns a positional into a variadic positional when it appears
/// anywhere in the positional's name (e.g. `files...`).
pub const VARIADIC_MARKER: &str = "...";

/// Name of the built-in help option.
pub const HELP_OPTION: &str = "help";
/// Short alias of the built-in help option.
pub const HELP_OPTION_ALIAS: &str = "h";
/// Name of the built-in JSON response option.
pub const JSON_OPTION: &str = "response-format-json";
/// Short alias of the built-in JSON response option.
pub const JSON_OPTION_ALIAS: &str = "rfj";

static HELP_SPEC: LazyLock<OptionSpec> = LazyLock::new(|| {
    OptionSpec::boolean(HELP_OPTION)
        .with_alias(HELP_OPTION_ALIAS)
        .with_description("Display the help")
});

static JSON_SPEC: LazyLock<OptionSpec> = LazyLock::new(|| {
    OptionSpec::boolean(JSON_OPTION)
        .with_alias(JSON_OPTION_ALIAS)
        .with_description("Produce the response as JSON")
});

/// Kind of a node in the command tree.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::NodeKind;
///
/// assert_eq!(NodeKind::default(), NodeKind::Command);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Container for other groups and commands.
    Group,
    /// Invocable leaf (the default).
    #[default]
    Command,
}

/// Value type of a dash option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Flag; takes an optional explicit `true`/`false`.
    Boolean,
    /// Single raw value (the default).
    #[default]
    String,
    /// Single base-ten integer.
    Number,
    /// Every following non-option token.
    Array,
}

/// Schema for a dash option.
///
/// Names and aliases are stored without leading dashes; `--dry-run` and `-d`
/// are described as `name: "dry-run", aliases: ["d"]`.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{OptionSpec, OptionType};
///
/// let long = OptionSpec::boolean("long").with_alias("l");
/// assert_eq!(long.option_type, OptionType::Boolean);
/// assert!(long.matches("long"));
/// assert!(long.matches("l"));
/// assert!(!long.matches("--long"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Canonical option name
    pub name: String,
    /// Alternative names, checked after the canonical name
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Type of value this option takes
    #[serde(rename = "type", default)]
    pub option_type: OptionType,
    /// Description for help renderers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionSpec {
    /// Creates an option of the given type.
    pub fn new(name: &str, option_type: OptionType) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            option_type,
            description: None,
        }
    }

    /// Creates a boolean option.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, OptionType::Boolean)
    }

    /// Creates a string option.
    pub fn string(name: &str) -> Self {
        Self::new(name, OptionType::String)
    }

    /// Creates a number option.
    pub fn number(name: &str) -> Self {
        Self::new(name, OptionType::Number)
    }

    /// Creates an array option.
    pub fn array(name: &str) -> Self {
        Self::new(name, OptionType::Array)
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the built-in `--help` / `-h` option.
    pub fn help() -> &'static OptionSpec {
        &HELP_SPEC
    }

    /// Returns the built-in `--response-format-json` / `--rfj` option.
    pub fn response_format_json() -> &'static OptionSpec {
        &JSON_SPEC
    }

    /// Checks the canonical name first, then each alias in declared order.
    pub fn matches(&self, name: &str) -> bool {
        self.name.trim() == name || self.aliases.iter().any(|a| a == name)
    }
}

/// Schema for a positional argument.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::PositionalSpec;
///
/// assert!(!PositionalSpec::new("dir").is_variadic());
/// assert!(PositionalSpec::new("files...").is_variadic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalSpec {
    /// Name the bound value is stored under
    pub name: String,
    /// Description for help renderers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PositionalSpec {
    /// Creates a positional argument.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    /// Returns `true` if the name carries the [`VARIADIC_MARKER`].
    pub fn is_variadic(&self) -> bool {
        self.name.contains(VARIADIC_MARKER)
    }
}

/// One group or command in the command tree.
///
/// The tree is an owned, acyclic structure: each node owns its children and
/// traversal only ever goes from the root towards the leaves.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::{CommandNode, OptionSpec, PositionalSpec};
///
/// let tree = CommandNode::group("mycli").with_child(
///     CommandNode::group("files")
///         .with_alias("f")
///         .with_child(
///             CommandNode::command("list")
///                 .with_option(OptionSpec::boolean("long").with_alias("l"))
///                 .with_positional(PositionalSpec::new("dir")),
///         ),
/// );
///
/// let files = tree.find_child("f").unwrap();
/// assert_eq!(files.name, "files");
/// assert!(files.find_child("list").is_some());
/// assert!(files.find_child("delete").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandNode {
    /// Name, unique among siblings
    pub name: String,
    /// Aliases, in declared order
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Group or command
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Nested groups and commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommandNode>,
    /// Positional arguments, bound in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positionals: Vec<PositionalSpec>,
    /// Dash options accepted at this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
    /// Description for help renderers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CommandNode {
    /// Creates a group node.
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Group,
            ..Default::default()
        }
    }

    /// Creates a command node.
    pub fn command(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Command,
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a child node.
    pub fn with_child(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    /// Adds a positional argument.
    pub fn with_positional(mut self, positional: PositionalSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns `true` for group nodes.
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Returns `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Checks whether `token` names this node, by name first and then by
    /// each alias in declared order.
    pub fn matches(&self, token: &str) -> bool {
        self.name.trim() == token || self.aliases.iter().any(|a| a.trim() == token)
    }

    /// Finds the first child, in declared order, that `token` names.
    ///
    /// Alias uniqueness across siblings is not enforced, so when two siblings
    /// claim the same alias the earlier one wins.
    pub fn find_child(&self, token: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.matches(token))
    }

    /// Finds an option by name or alias.
    ///
    /// The built-in help and JSON response options are checked before the
    /// node's own options, and are recognized on every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_core::{CommandNode, OptionSpec};
    ///
    /// let node = CommandNode::command("list").with_option(OptionSpec::boolean("long").with_alias("l"));
    /// assert_eq!(node.find_option("l").unwrap().name, "long");
    /// assert_eq!(node.find_option("h").unwrap().name, "help");
    /// assert!(node.find_option("nope").is_none());
    /// ```
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        [OptionSpec::help(), OptionSpec::response_format_json()]
            .into_iter()
            .find(|builtin| builtin.matches(name))
            .or_else(|| self.options.iter().find(|option| option.matches(name)))
    }

    /// Gets all child names.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}
