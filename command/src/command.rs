//! The command abstraction and its dispatcher.

use buildline_core::{CommandDescriptor, ResolvedOptions, Result, UnknownOptions};
use tracing::debug;

use crate::interface::indent_description;
use crate::normalize::normalize_arguments;
use crate::resolve::resolve_options;
use crate::token::{InvokedCommand, Token};
use crate::unknown::parse_unknown;

/// What a command handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Positional arguments in pattern order; `None` for missing ones.
    /// Always at least as long as the pattern's placeholder list.
    pub arguments: Vec<Option<String>>,
    /// Every declared option, resolved.
    pub options: ResolvedOptions,
    /// Undeclared flags; `Some` only when the command accepts them.
    pub unknown: Option<UnknownOptions>,
}

impl Invocation {
    /// Returns the positional argument at `index`, if given.
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).and_then(|value| value.as_deref())
    }
}

/// A CLI command.
///
/// Implementors own their [`CommandDescriptor`] and handle invocations.
///
/// # Examples
///
/// ```
/// use buildline_command::{CliCommand, Invocation};
/// use buildline_core::{CommandDescriptor, Result};
///
/// struct Hello {
///     descriptor: CommandDescriptor,
/// }
///
/// impl CliCommand for Hello {
///     fn descriptor(&self) -> &CommandDescriptor {
///         &self.descriptor
///     }
///
///     fn handle(&self, invocation: Invocation) -> Result<()> {
///         self.output(&format!("hello {}", invocation.argument(0).unwrap_or("world")));
///         Ok(())
///     }
/// }
/// ```
pub trait CliCommand {
    /// The command declaration.
    fn descriptor(&self) -> &CommandDescriptor;

    /// Runs the command.
    fn handle(&self, invocation: Invocation) -> Result<()>;

    /// Adjusts the clap command before its help is rendered. By default
    /// shows the full description, if there is one, in the long help.
    fn prepare_help(&self, command: clap::Command) -> clap::Command {
        match self
            .descriptor()
            .full_description
            .as_deref()
            .filter(|full| !full.is_empty())
        {
            Some(full) => command.long_about(indent_description(full)),
            None => command,
        }
    }

    /// Writes a line to stdout.
    fn output(&self, text: &str) {
        println!("{text}");
    }
}

/// Normalizes a raw invocation, resolves options and calls the handler.
///
/// # Errors
///
/// Returns whatever the handler returns. Building the [`Invocation`] itself
/// never fails.
pub fn dispatch(command: &dyn CliCommand, raw: Vec<Token>) -> Result<()> {
    let invocation = build_invocation(command.descriptor(), raw);
    debug!(
        command = command.descriptor().name(),
        arguments = ?invocation.arguments,
        options = ?invocation.options,
        unknown = ?invocation.unknown,
        "dispatching command"
    );
    command.handle(invocation)
}

/// Turns a raw invocation into what the handler receives.
pub fn build_invocation(descriptor: &CommandDescriptor, raw: Vec<Token>) -> Invocation {
    let mut tokens = normalize_arguments(raw);
    let leftover = match tokens.pop() {
        Some(Token::Leftover(leftover)) => leftover,
        _ => Vec::new(),
    };

    let invoked_index = tokens
        .iter()
        .rposition(|token| matches!(token, Token::Invoked(_)));
    let invoked = match invoked_index.map(|index| tokens.remove(index)) {
        Some(Token::Invoked(invoked)) => invoked,
        _ => InvokedCommand::new(descriptor.name()),
    };

    let mut arguments: Vec<Option<String>> = tokens
        .into_iter()
        .take(invoked_index.unwrap_or(usize::MAX))
        .filter_map(|token| match token {
            Token::Value(value) => Some(Some(value)),
            Token::Hole => Some(None),
            Token::Leftover(_) | Token::Invoked(_) => None,
        })
        .collect();
    let arity = descriptor.arguments().len();
    if arguments.len() < arity {
        arguments.resize(arity, None);
    }

    let options = resolve_options(
        &descriptor.options,
        &invoked.values,
        invoked.parent.as_ref(),
        descriptor.check_options_on_parent,
    );

    let unknown = descriptor
        .allow_unknown_options
        .then(|| parse_unknown(&leftover, &descriptor.options));

    Invocation {
        arguments,
        options,
        unknown,
    }
}
