//! Command declaration validation.
//!
//! Dispatch never validates declarations; programs call
//! [`validate_command`] once at startup to catch duplicate option names,
//! malformed instructions and instruction/name mismatches.
//!
//! # Examples
//!
//! ```
//! use buildline_core::*;
//!
//! let command = CommandDescriptor::new("build [target]", "Build a target")
//!     .with_option(OptionSpec::new("type", "-t, --type [type]"));
//! assert!(validate_command(&command).is_empty());
//!
//! // Invalid: long form doesn't match the option name
//! let bad = CommandDescriptor::new("build [target]", "Build a target")
//!     .with_option(OptionSpec::new("type", "-t, --kind [kind]"));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandDescriptor, OptionSpec};

/// Declaration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command pattern is empty or whitespace-only.
    #[error("command pattern cannot be empty")]
    EmptyPattern,
    /// Two options share the same name.
    #[error("duplicate option name: {0}")]
    DuplicateOptionName(String),
    /// Instruction has no `--long` form.
    #[error("option '{0}' has no long form in its instruction")]
    MissingLongForm(String),
    /// Long form doesn't correspond to the option name.
    #[error("option '{name}' does not match its long form '{long}'")]
    NameMismatch {
        /// Declared option name.
        name: String,
        /// Long form found in the instruction.
        long: String,
    },
    /// Two options share a short or long flag.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
}

/// Validates a command declaration, returning every problem found.
pub fn validate_command(command: &CommandDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.pattern.trim().is_empty() {
        errors.push(ValidationError::EmptyPattern);
    }

    let mut names: HashSet<&str> = HashSet::new();
    let mut flags: HashSet<String> = HashSet::new();
    for option in &command.options {
        if !names.insert(option.name.as_str()) {
            errors.push(ValidationError::DuplicateOptionName(option.name.clone()));
        }
        errors.extend(validate_option(option, &mut flags));
    }

    errors
}

fn validate_option(option: &OptionSpec, flags: &mut HashSet<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let parsed = option.parsed();

    match &parsed.long {
        None => errors.push(ValidationError::MissingLongForm(option.name.clone())),
        Some(long) => {
            let bare = long.trim_start_matches('-');
            if bare != option.name && camel_case(bare) != option.name {
                errors.push(ValidationError::NameMismatch {
                    name: option.name.clone(),
                    long: long.clone(),
                });
            }
        }
    }

    for flag in parsed.short.iter().chain(parsed.long.iter()) {
        if !flags.insert(flag.clone()) {
            errors.push(ValidationError::DuplicateFlag(flag.clone()));
        }
    }

    errors
}

/// `dry-run` -> `dryRun`
fn camel_case(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    let mut upper = false;
    for ch in kebab.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
