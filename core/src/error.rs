//! Error types for command binding and execution.

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No registered command has this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An undeclared flag was given to a command that doesn't accept them.
    #[error("unknown option '{option}' for '{command}'")]
    UnknownOption {
        /// Command (or program) name.
        command: String,
        /// The offending token.
        option: String,
    },

    /// A `<required>` positional argument was not given.
    #[error("missing required argument '{argument}' for '{command}'")]
    MissingArgument {
        /// Command name.
        command: String,
        /// Placeholder name.
        argument: String,
    },

    /// More positional arguments than the command pattern declares.
    #[error("unexpected argument '{argument}' for '{command}'")]
    UnexpectedArgument {
        /// Command name.
        command: String,
        /// The offending token.
        argument: String,
    },

    /// An option declared with `<value>` was given without one.
    #[error("option '{0}' argument missing")]
    MissingOptionValue(String),

    /// Any other malformed command line.
    #[error("{0}")]
    Usage(String),

    /// The command handler failed.
    #[error("command '{command}' failed: {source}")]
    Handler {
        /// Command name.
        command: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CommandError {
    /// Wraps a handler failure.
    pub fn handler(
        command: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Handler {
            command: command.into(),
            source: source.into(),
        }
    }
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;
