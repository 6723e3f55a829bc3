//! Command instruction generation.

use buildline_core::{CommandDescriptor, OptionValue};

/// Builds the instruction that would run `command` with the given arguments.
///
/// Each argument fills the pattern placeholder of the same name, or becomes
/// the long form of the declared option of the same name, or, when the
/// command accepts unknown options, a `--name value` pair. Arguments matching
/// none of these are skipped. A `false` value drops a flag option.
///
/// # Examples
///
/// ```
/// use buildline_command::generate_command;
/// use buildline_core::{CommandDescriptor, OptionSpec, OptionValue};
///
/// let command = CommandDescriptor::new("destroy [target]", "Destroy a target")
///     .with_option(OptionSpec::flag("once", "-o, --once"));
///
/// assert_eq!(
///     generate_command("planets", &command, [("target", OptionValue::from("pluto"))]),
///     "planets destroy pluto"
/// );
/// assert_eq!(
///     generate_command(
///         "planets",
///         &command,
///         [("target", OptionValue::from("moon")), ("once", OptionValue::from(true))],
///     ),
///     "planets destroy moon --once"
/// );
/// ```
pub fn generate_command<I, K>(program: &str, command: &CommandDescriptor, args: I) -> String
where
    I: IntoIterator<Item = (K, OptionValue)>,
    K: AsRef<str>,
{
    let mut pattern = command.pattern.clone();
    let mut instructions: Vec<String> = Vec::new();

    for (name, value) in args {
        let name = name.as_ref();
        let value_text = value.to_string();

        if let Some(placeholder) = find_placeholder(&pattern, name) {
            pattern = pattern.replacen(&placeholder, &value_text, 1);
        } else if let Some(option) = command.option(name) {
            let mut instruction = option.long_instruction().to_string();
            if let Some(placeholder) = find_placeholder(&instruction, name) {
                instruction = instruction.replacen(&placeholder, &value_text, 1);
            } else if value == OptionValue::Flag(false) {
                instruction.clear();
            }

            if !instruction.is_empty() {
                instructions.push(instruction);
            }
        } else if command.allow_unknown_options {
            match value {
                OptionValue::Flag(true) => instructions.push(format!("--{name}")),
                _ => instructions.push(format!("--{name} {value_text}")),
            }
        }
    }

    let mut generated = format!("{program} {pattern}");
    for instruction in instructions {
        generated.push(' ');
        generated.push_str(&instruction);
    }
    generated
}

fn find_placeholder(text: &str, name: &str) -> Option<String> {
    [format!("[{name}]"), format!("<{name}>")]
        .into_iter()
        .find(|placeholder| text.contains(placeholder.as_str()))
}
