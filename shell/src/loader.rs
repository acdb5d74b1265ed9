//! Command tree loading from JSON or YAML files.
//!
//! A tree file holds a single serialized [`CommandNode`], the root:
//!
//! ```yaml
//! name: mycli
//! type: group
//! children:
//!   - name: files
//!     type: group
//!     aliases: [f]
//!     children:
//!       - name: list
//!         options:
//!           - { name: long, aliases: [l], type: boolean }
//!         positionals:
//!           - name: dir
//! ```

use std::path::Path;

use command_dispatch_core::CommandNode;
use tracing::debug;

use crate::error::{Result, ShellError};

/// Serialization format of a tree file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    /// Picks the format from a file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// # Examples
    ///
    /// ```
    /// use command_dispatch_shell::TreeFormat;
    ///
    /// assert_eq!(TreeFormat::from_path("tree.yml").unwrap(), TreeFormat::Yaml);
    /// assert!(TreeFormat::from_path("tree.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            _ => Err(ShellError::UnsupportedTreeFormat(path.display().to_string())),
        }
    }
}

/// Parses a tree from text in the given format.
pub fn parse_tree_str(content: &str, format: TreeFormat) -> Result<CommandNode> {
    let tree = match format {
        TreeFormat::Json => serde_json::from_str(content)?,
        TreeFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(tree)
}

/// Loads a tree from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns [`ShellError::UnsupportedTreeFormat`] for other extensions,
/// [`ShellError::Io`] if the file cannot be read, and
/// [`ShellError::Json`] or [`ShellError::Yaml`] if it does not parse.
pub fn load_tree(path: impl AsRef<Path>) -> Result<CommandNode> {
    let path = path.as_ref();
    let format = TreeFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let tree = parse_tree_str(&content, format)?;
    debug!(path = %path.display(), root = %tree.name, children = tree.children.len(), "Loaded command tree");
    Ok(tree)
}
