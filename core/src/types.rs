//! Command declaration types.
//!
//! This module defines the data model used to declare CLI commands and to
//! carry option values between the upstream binder, the option resolver and
//! command handlers. Declarations are built once at program start; value maps
//! are created fresh for every invocation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value attached to an option.
///
/// Options either carry text (`--type production`) or are bare flags
/// (`--watch`). An explicit "off" default resolves to `Flag(false)`.
///
/// # Examples
///
/// ```
/// use buildline_core::OptionValue;
///
/// assert!(OptionValue::from("production").is_truthy());
/// assert!(OptionValue::from(true).is_truthy());
/// assert!(!OptionValue::from(false).is_truthy());
/// assert!(!OptionValue::from("").is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Textual value.
    Text(String),
    /// Boolean flag.
    Flag(bool),
}

impl OptionValue {
    /// Returns `true` for non-empty text and for `Flag(true)`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Flag(on) => *on,
        }
    }

    /// Returns the text if this is a textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Returns the boolean if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(on) => Some(*on),
            Self::Text(_) => None,
        }
    }
}

impl Default for OptionValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(on) => write!(f, "{on}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Option values keyed by option name, as attached to an invoked command.
pub type OptionValues = BTreeMap<String, OptionValue>;

/// Final option values handed to a command handler.
pub type ResolvedOptions = BTreeMap<String, OptionValue>;

/// Undeclared flags (leading dashes stripped) accepted by a command.
pub type UnknownOptions = BTreeMap<String, OptionValue>;

/// Default value declared for an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Textual default, possibly empty.
    Text(String),
    /// Explicit "off" default for flags.
    Off,
}

impl From<&DefaultValue> for OptionValue {
    fn from(value: &DefaultValue) -> Self {
        match value {
            DefaultValue::Text(text) => OptionValue::Text(text.clone()),
            DefaultValue::Off => OptionValue::Flag(false),
        }
    }
}

/// What kind of value an option instruction declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Flag only (`--watch`).
    None,
    /// Optional value (`--type [type]`).
    Optional(String),
    /// Required value (`--output <path>`).
    Required(String),
}

/// Parsed form of an option instruction such as `-t, --type [type]`.
///
/// # Examples
///
/// ```
/// use buildline_core::{Instruction, ValueKind};
///
/// let parsed = Instruction::parse("-t, --type [type]");
/// assert_eq!(parsed.short.as_deref(), Some("-t"));
/// assert_eq!(parsed.long.as_deref(), Some("--type"));
/// assert_eq!(parsed.value, ValueKind::Optional("type".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Short form (e.g., "-t")
    pub short: Option<String>,
    /// Long form (e.g., "--type")
    pub long: Option<String>,
    /// Value declared after the flags
    pub value: ValueKind,
}

impl Instruction {
    /// Parses an instruction. Unrecognized pieces are ignored.
    pub fn parse(instruction: &str) -> Self {
        let mut parsed = Self {
            short: None,
            long: None,
            value: ValueKind::None,
        };

        for piece in instruction
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|piece| !piece.is_empty())
        {
            if let Some(name) = bracketed(piece, '[', ']') {
                parsed.value = ValueKind::Optional(name.to_string());
            } else if let Some(name) = bracketed(piece, '<', '>') {
                parsed.value = ValueKind::Required(name.to_string());
            } else if piece.starts_with("--") {
                parsed.long.get_or_insert_with(|| piece.to_string());
            } else if piece.starts_with('-') && piece.len() > 1 {
                parsed.short.get_or_insert_with(|| piece.to_string());
            }
        }

        parsed
    }

    /// Checks if `token` is the short or long form of this instruction.
    pub fn matches(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long.as_deref() == Some(token)
    }

    /// Returns `true` if the instruction accepts a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self.value, ValueKind::None)
    }
}

fn bracketed(piece: &str, open: char, close: char) -> Option<&str> {
    piece.strip_prefix(open)?.strip_suffix(close)
}

/// A declared command option.
///
/// # Examples
///
/// ```
/// use buildline_core::{DefaultValue, OptionSpec};
///
/// let kind = OptionSpec::new("type", "-t, --type [type]")
///     .with_description("Which build type")
///     .with_default(DefaultValue::Text("development".into()));
/// assert_eq!(kind.long_instruction(), "--type [type]");
///
/// let watch = OptionSpec::flag("watch", "-w, --watch");
/// assert_eq!(watch.default_value, Some(DefaultValue::Off));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Key used in resolved option maps
    pub name: String,
    /// Flag signature, e.g. `-t, --type [type]`
    pub instruction: String,
    /// Help text
    pub description: String,
    /// Value used when the option is not set; `None` means undefined
    pub default_value: Option<DefaultValue>,
}

impl OptionSpec {
    /// Creates an option with an empty textual default.
    pub fn new(name: &str, instruction: &str) -> Self {
        Self {
            name: name.to_string(),
            instruction: instruction.to_string(),
            description: String::new(),
            default_value: Some(DefaultValue::Text(String::new())),
        }
    }

    /// Creates a flag option that defaults to off.
    pub fn flag(name: &str, instruction: &str) -> Self {
        Self::new(name, instruction).with_default(DefaultValue::Off)
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default_value: DefaultValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Removes the default value.
    pub fn without_default(mut self) -> Self {
        self.default_value = None;
        self
    }

    /// Parses the instruction.
    pub fn parsed(&self) -> Instruction {
        Instruction::parse(&self.instruction)
    }

    /// Returns the instruction without its shorthand, e.g.
    /// `-t, --type [type]` becomes `--type [type]`.
    pub fn long_instruction(&self) -> &str {
        self.instruction
            .rsplit(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// A positional argument placeholder from a command pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Placeholder name
    pub name: String,
    /// `<name>` placeholders are required, `[name]` ones optional
    pub required: bool,
}

/// Declaration of a single CLI command.
///
/// # Examples
///
/// ```
/// use buildline_core::{CommandDescriptor, OptionSpec};
///
/// let command = CommandDescriptor::new("destroy [target]", "Destroy a target")
///     .with_option(OptionSpec::flag("once", "-o, --once"));
///
/// assert_eq!(command.name(), "destroy");
/// assert_eq!(command.arguments()[0].name, "target");
/// assert!(command.option("once").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Command pattern, e.g. `build [target]`
    pub pattern: String,
    /// Short description for the command list
    pub description: String,
    /// Longer description shown on the command's own help
    pub full_description: Option<String>,
    /// Declared options, in declaration order
    pub options: Vec<OptionSpec>,
    /// Look up missing option values on the parent program
    pub check_options_on_parent: bool,
    /// Omit the command from the program help
    pub hidden: bool,
    /// Run the command as a separate `{program}-{command}` executable
    pub sub_program: bool,
    /// Accept and report undeclared flags
    pub allow_unknown_options: bool,
}

impl CommandDescriptor {
    /// Creates a descriptor with no options.
    pub fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            description: description.to_string(),
            full_description: None,
            options: Vec::new(),
            check_options_on_parent: true,
            hidden: false,
            sub_program: false,
            allow_unknown_options: false,
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the description shown on the command's own help.
    pub fn with_full_description(mut self, description: &str) -> Self {
        self.full_description = Some(description.to_string());
        self
    }

    /// Accepts undeclared flags.
    pub fn allow_unknown_options(mut self) -> Self {
        self.allow_unknown_options = true;
        self
    }

    /// Hides the command from the program help.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Marks the command as a sub program.
    pub fn sub_program(mut self) -> Self {
        self.sub_program = true;
        self
    }

    /// Stops option lookups on the parent program.
    pub fn ignore_parent_options(mut self) -> Self {
        self.check_options_on_parent = false;
        self
    }

    /// Adds an option in place.
    pub fn add_option(&mut self, option: OptionSpec) {
        self.options.push(option);
    }

    /// Returns the command name (first word of the pattern).
    pub fn name(&self) -> &str {
        self.pattern.split_whitespace().next().unwrap_or_default()
    }

    /// Finds a declared option by name.
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Returns the positional placeholders of the pattern, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use buildline_core::CommandDescriptor;
    ///
    /// let command = CommandDescriptor::new("copy <source> [dest]", "");
    /// let args = command.arguments();
    /// assert_eq!(args.len(), 2);
    /// assert!(args[0].required);
    /// assert!(!args[1].required);
    /// ```
    pub fn arguments(&self) -> Vec<ArgumentSpec> {
        self.pattern
            .split_whitespace()
            .skip(1)
            .filter_map(|piece| {
                if let Some(name) = bracketed(piece, '<', '>') {
                    Some(ArgumentSpec {
                        name: name.to_string(),
                        required: true,
                    })
                } else {
                    bracketed(piece, '[', ']').map(|name| ArgumentSpec {
                        name: name.to_string(),
                        required: false,
                    })
                }
            })
            .collect()
    }
}
