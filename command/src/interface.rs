//! Translation between command declarations and clap.
//!
//! Each [`CommandDescriptor`] becomes a [`clap::Command`]: declared options
//! map to named arguments, pattern placeholders to positionals. A command
//! that accepts unknown options gets hyphen-tolerant positionals plus a
//! hidden trailing bucket for whatever doesn't fit, so an unknown flag given
//! where a positional is expected lands in that positional slot.
//! [`normalize_arguments`](crate::normalize_arguments) moves it back out.

use buildline_core::{
    CommandDescriptor, CommandError, OptionSpec, OptionValue, OptionValues, ValueKind,
};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::token::{InvokedCommand, Token};

/// End-of-options marker.
pub(crate) const END_OF_OPTIONS: &str = "--";

const LEFTOVER_ID: &str = "buildline::leftover";
pub(crate) const FORWARDED_ID: &str = "buildline::forwarded";

/// Builds the clap command for a descriptor of `program`.
///
/// # Examples
///
/// ```
/// use buildline_command::clap_command;
/// use buildline_core::{CommandDescriptor, OptionSpec};
///
/// let descriptor = CommandDescriptor::new("build [target]", "Build a target")
///     .with_option(OptionSpec::new("type", "-t, --type [type]"));
///
/// let matches = clap_command("app", &descriptor)
///     .try_get_matches_from(["build", "moon", "-t", "production"])
///     .unwrap();
/// assert_eq!(matches.get_one::<String>("target").unwrap(), "moon");
/// assert_eq!(matches.get_one::<String>("type").unwrap(), "production");
/// ```
pub fn clap_command(program: &str, descriptor: &CommandDescriptor) -> Command {
    let name = descriptor.name().to_string();
    let placeholders: Vec<&str> = descriptor.pattern.split_whitespace().skip(1).collect();
    let mut usage = format!("{program} {name} [options]");
    if !placeholders.is_empty() {
        usage.push(' ');
        usage.push_str(&placeholders.join(" "));
    }

    let command = Command::new(name)
        .about(descriptor.description.clone())
        .override_usage(usage)
        .hide(descriptor.hidden);

    if descriptor.sub_program {
        return command.disable_help_flag(true).arg(
            Arg::new(FORWARDED_ID)
                .num_args(1..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        );
    }

    let mut command = command.args_override_self(true);
    for option in &descriptor.options {
        command = command.arg(option_arg(option));
    }
    for argument in descriptor.arguments() {
        command = command.arg(
            Arg::new(argument.name.clone())
                .value_name(argument.name)
                .required(argument.required)
                .allow_hyphen_values(descriptor.allow_unknown_options),
        );
    }
    if descriptor.allow_unknown_options {
        command = command.arg(
            Arg::new(LEFTOVER_ID)
                .num_args(1..)
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .hide(true),
        );
    }

    command
}

/// Indents description continuation lines for help output.
pub fn indent_description(description: &str) -> String {
    description.replace('\n', "\n  ")
}

pub(crate) fn option_arg(option: &OptionSpec) -> Arg {
    let parsed = option.parsed();
    let mut arg = Arg::new(option.name.clone()).help(option.description.clone());

    if let Some(short) = parsed.short.as_deref().and_then(short_char) {
        arg = arg.short(short);
    }
    match parsed.long.as_deref().and_then(|long| long.strip_prefix("--")) {
        Some(long) => arg = arg.long(long.to_string()),
        // Without a flag form clap would treat the option as positional.
        None if parsed.short.is_none() => arg = arg.long(option.name.clone()),
        None => {}
    }

    match parsed.value {
        ValueKind::None => arg.action(ArgAction::SetTrue),
        ValueKind::Optional(name) => arg.action(ArgAction::Set).num_args(0..=1).value_name(name),
        ValueKind::Required(name) => arg.action(ArgAction::Set).num_args(1).value_name(name),
    }
}

fn short_char(short: &str) -> Option<char> {
    let mut chars = short.strip_prefix('-')?.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Collects the values of `options` given on the command line.
///
/// An option with an `[optional]` value given without one is `true`.
pub(crate) fn option_values(options: &[OptionSpec], matches: &ArgMatches) -> OptionValues {
    options
        .iter()
        .filter(|option| matches.value_source(&option.name) == Some(ValueSource::CommandLine))
        .map(|option| {
            let value = match option.parsed().value {
                ValueKind::None => OptionValue::Flag(true),
                ValueKind::Optional(_) | ValueKind::Required(_) => matches
                    .get_one::<String>(&option.name)
                    .map_or(OptionValue::Flag(true), |value| OptionValue::Text(value.clone())),
            };
            (option.name.clone(), value)
        })
        .collect()
}

/// Turns a command's matches into the raw invocation [`dispatch`] consumes.
///
/// `literals` is the number of trailing tokens that followed `--`. Those that
/// ended up in the leftover bucket are preceded by the marker again, so
/// unknown-option parsing stops there.
///
/// [`dispatch`]: crate::dispatch
pub(crate) fn bind_matches(
    descriptor: &CommandDescriptor,
    matches: &ArgMatches,
    parent: OptionValues,
    literals: usize,
) -> Vec<Token> {
    let mut raw: Vec<Token> = descriptor
        .arguments()
        .iter()
        .filter_map(|argument| matches.get_one::<String>(&argument.name).cloned())
        .map(Token::Value)
        .collect();

    raw.push(Token::Invoked(InvokedCommand {
        name: descriptor.name().to_string(),
        values: option_values(&descriptor.options, matches),
        parent: Some(parent),
    }));

    let mut leftover: Vec<String> = if descriptor.allow_unknown_options {
        matches
            .get_many::<String>(LEFTOVER_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    let literals = literals.min(leftover.len());
    if literals > 0 && !leftover.iter().any(|token| token == END_OF_OPTIONS) {
        leftover.insert(leftover.len() - literals, END_OF_OPTIONS.to_string());
    }
    if !leftover.is_empty() {
        raw.push(Token::Leftover(leftover));
    }

    raw
}

/// Converts a clap parse failure for `command` into a [`CommandError`].
pub(crate) fn command_error(err: &clap::Error, command: &str) -> CommandError {
    let context = |kind: ContextKind| match err.get(kind) {
        Some(ContextValue::String(value)) => Some(value.clone()),
        Some(ContextValue::Strings(values)) => values.first().cloned(),
        _ => None,
    };

    let mapped = match err.kind() {
        ErrorKind::InvalidSubcommand => {
            context(ContextKind::InvalidSubcommand).map(CommandError::UnknownCommand)
        }
        ErrorKind::UnknownArgument => context(ContextKind::InvalidArg).map(|token| {
            if token.starts_with('-') {
                CommandError::UnknownOption {
                    command: command.to_string(),
                    option: token,
                }
            } else {
                CommandError::UnexpectedArgument {
                    command: command.to_string(),
                    argument: token,
                }
            }
        }),
        ErrorKind::MissingRequiredArgument => {
            context(ContextKind::InvalidArg).map(|argument| CommandError::MissingArgument {
                command: command.to_string(),
                argument: argument.trim_matches(['<', '>']).to_string(),
            })
        }
        ErrorKind::InvalidValue => {
            context(ContextKind::InvalidArg).map(CommandError::MissingOptionValue)
        }
        _ => None,
    };

    mapped.unwrap_or_else(|| {
        let rendered = err.render().to_string();
        let message = rendered.lines().next().unwrap_or_default();
        CommandError::Usage(message.trim_start_matches("error: ").to_string())
    })
}
