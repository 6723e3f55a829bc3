//! Raw invocation tokens handed from the binder to the dispatcher.

use buildline_core::OptionValues;

/// The command object attached to a raw invocation.
///
/// Carries the option values the binder recognized on the command itself
/// and, when the command runs under a program with global options, the
/// program's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokedCommand {
    /// Command name
    pub name: String,
    /// Option values bound on the command
    pub values: OptionValues,
    /// Option values bound on the parent program
    pub parent: Option<OptionValues>,
}

impl InvokedCommand {
    /// Creates an invoked command with no values.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// One element of a raw invocation.
///
/// A raw invocation is the positional values (possibly including flags the
/// binder put in a positional slot), the [`InvokedCommand`], and optionally a
/// trailing bucket of leftover tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A positional value.
    Value(String),
    /// A positional slot with no value.
    Hole,
    /// Leftover tokens the binder couldn't place.
    Leftover(Vec<String>),
    /// The invoked command object.
    Invoked(InvokedCommand),
}

impl Token {
    /// Returns `true` for a `Value` that starts with `-`.
    pub fn is_flag_like(&self) -> bool {
        matches!(self, Self::Value(value) if value.starts_with('-'))
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}
