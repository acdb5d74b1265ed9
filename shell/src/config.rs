//! Shell configuration.
//!
//! Controls how the shell presents itself and which leading tokens are
//! treated as the program name rather than parsed against the tree.
//!
//! # Example YAML
//!
//! ```yaml
//! bin_name: mycli
//! primary_commands:
//!   - mycli
//!   - mc
//! prompt: "mycli> "
//! exit_message: "Goodbye."
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use command_dispatch_core::CommandNode;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shell::{END_OF_INPUT_MESSAGE, EXIT_MESSAGE};

/// Interactive shell configuration.
///
/// Every field is optional; a missing field falls back to a value derived
/// from the command tree.
///
/// # Examples
///
/// ```
/// use command_dispatch_core::CommandNode;
/// use command_dispatch_shell::ShellConfig;
///
/// let tree = CommandNode::group("mycli");
/// let config = ShellConfig::default();
/// assert_eq!(config.bin_name_for(&tree), "mycli");
/// assert_eq!(config.prompt_for(&tree), "mycli> ");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Program name shown in diagnostics (default: the tree root's name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_name: Option<String>,
    /// Leading tokens consumed as the primary command (`$0`).
    pub primary_commands: Vec<String>,
    /// Prompt text (default: `"<root>> "`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Printed when an exit word is entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_message: Option<String>,
    /// Printed when the input stream ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_input_message: Option<String>,
}

impl ShellConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ShellError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ShellError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn bin_name_for<'a>(&'a self, tree: &'a CommandNode) -> &'a str {
        self.bin_name.as_deref().unwrap_or(&tree.name)
    }

    pub fn prompt_for(&self, tree: &CommandNode) -> String {
        self.prompt
            .clone()
            .unwrap_or_else(|| format!("{}> ", tree.name))
    }

    pub fn exit_message(&self) -> &str {
        self.exit_message.as_deref().unwrap_or(EXIT_MESSAGE)
    }

    pub fn end_of_input_message(&self) -> &str {
        self.end_of_input_message
            .as_deref()
            .unwrap_or(END_OF_INPUT_MESSAGE)
    }
}
