//! Error types for the shell and tree loading.
//!
//! Read and write failures on the shell's streams and errors raised by the
//! success-path invoker are fatal. Errors raised by the failure-path invoker
//! never reach this type; the shell logs and absorbs them.

use thiserror::Error;

/// Error raised by a command or failure invoker.
pub type InvokeError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can end a shell session or a tree load.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Tree file extension is neither JSON nor YAML.
    #[error("unsupported command tree format: {0}")]
    UnsupportedTreeFormat(String),

    /// The command invoker failed for a successfully parsed line.
    #[error("command '{command}' failed: {source}")]
    Dispatch {
        command: String,
        #[source]
        source: InvokeError,
    },
}

/// Convenience alias for results with [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;
