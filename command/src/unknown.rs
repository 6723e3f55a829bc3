//! Unknown option splitting and re-parsing.
//!
//! Commands that accept undeclared flags receive them as a dictionary. The
//! leftover tokens first go through [`split_tokens`], which expands combined
//! forms, and are then walked by [`parse_unknown`] to pair each header with
//! its value.

use std::sync::LazyLock;

use buildline_core::{OptionSpec, OptionValue, UnknownOptions, ValueKind};
use regex::Regex;

/// Marker produced when splitting `-x=y` into `-x`, `-=`, `-y`.
pub const SHORT_VALUE_SEPARATOR: &str = "-=";

/// End-of-options marker.
const LITERAL_MARKER: &str = "--";

// SAFETY: This regex is a compile-time constant and is validated by tests.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-(?:-)?").expect("static regex must compile"));

/// Expands combined option tokens.
///
/// - `-abc` becomes `-a -b -c` (so `-x=y` becomes `-x -= -y`);
/// - `--key=value` becomes `--key value`;
/// - the token after a declared option with a `<required>` value is kept
///   as is;
/// - `--` and everything after it are kept as is.
///
/// # Examples
///
/// ```
/// use buildline_command::split_tokens;
///
/// let tokens = ["--include=src", "-x=y", "-ab"].map(String::from);
/// assert_eq!(
///     split_tokens(&tokens, &[]),
///     ["--include", "src", "-x", "-=", "-y", "-a", "-b"]
/// );
/// ```
pub fn split_tokens(tokens: &[String], declared: &[OptionSpec]) -> Vec<String> {
    let mut split = Vec::with_capacity(tokens.len());

    for (index, token) in tokens.iter().enumerate() {
        if token == LITERAL_MARKER {
            split.extend(tokens[index..].iter().cloned());
            break;
        }

        let after_required = index > 0 && requires_value(&tokens[index - 1], declared);
        if after_required {
            split.push(token.clone());
        } else if token.len() > 1 && token.starts_with('-') && !token.starts_with("--") {
            split.extend(token.chars().skip(1).map(|ch| format!("-{ch}")));
        } else if let Some((key, value)) = token
            .strip_prefix("--")
            .and_then(|rest| rest.split_once('='))
        {
            split.push(format!("--{key}"));
            split.push(value.to_string());
        } else {
            split.push(token.clone());
        }
    }

    split
}

fn requires_value(token: &str, declared: &[OptionSpec]) -> bool {
    declared.iter().any(|option| {
        let parsed = option.parsed();
        parsed.matches(token) && matches!(parsed.value, ValueKind::Required(_))
    })
}

/// Parses leftover tokens into a dictionary of unknown options.
///
/// Headers are tokens starting with `-` or `--`; each takes the following
/// non-header token as its value, or becomes `true` when none follows.
/// Tokens after `--` are positional literals and are ignored.
///
/// # Examples
///
/// ```
/// use buildline_command::parse_unknown;
/// use buildline_core::OptionValue;
///
/// let tokens = [
///     "--include=something", "-i", "somes", "--exclude", "--type", "building", "-x=y",
/// ]
/// .map(String::from);
///
/// let parsed = parse_unknown(&tokens, &[]);
/// assert_eq!(parsed["include"], OptionValue::from("something"));
/// assert_eq!(parsed["i"], OptionValue::from("somes"));
/// assert_eq!(parsed["exclude"], OptionValue::from(true));
/// assert_eq!(parsed["type"], OptionValue::from("building"));
/// assert_eq!(parsed["x"], OptionValue::from("y"));
/// ```
pub fn parse_unknown(tokens: &[String], declared: &[OptionSpec]) -> UnknownOptions {
    let mut parsed = UnknownOptions::new();
    if tokens.is_empty() {
        return parsed;
    }

    let list = split_tokens(tokens, declared);
    let mut header: Option<String> = None;
    let mut short_value = false;

    for item in list.iter().take_while(|item| item.as_str() != LITERAL_MARKER) {
        if HEADER_RE.is_match(item) {
            if short_value {
                if let Some(name) = header.take() {
                    parsed.insert(name, OptionValue::Text(item[1..].to_string()));
                }
                short_value = false;
            } else if header.is_some() && item == SHORT_VALUE_SEPARATOR {
                short_value = true;
            } else {
                if let Some(name) = header.take() {
                    parsed.insert(name, OptionValue::Flag(true));
                }
                header = Some(HEADER_RE.replace(item, "").into_owned());
            }
        } else if let Some(name) = header.take() {
            parsed.insert(name, OptionValue::Text(item.clone()));
        }
    }

    if let Some(name) = header {
        parsed.insert(name, OptionValue::Flag(true));
    }

    parsed
}
