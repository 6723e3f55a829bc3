//! Raw argument normalization.
//!
//! When a command accepts unknown options, the binder may put a flag in a
//! positional slot because the real value was omitted: `hello --something
//! else` binds `--something` to `[message]` and leaves `else` over.
//! [`normalize_arguments`] moves those leading flags into the leftover bucket
//! and keeps a [`Token::Hole`] in their place so argument positions don't
//! shift.

use crate::token::Token;

/// Relocates leading flag-like values into the trailing leftover bucket.
///
/// The result always ends with a [`Token::Leftover`], possibly empty.
///
/// # Examples
///
/// ```
/// use buildline_command::{InvokedCommand, Token, normalize_arguments};
///
/// let raw = vec![
///     Token::from("--something"),
///     Token::Invoked(InvokedCommand::new("hello")),
///     Token::Leftover(vec!["else".into()]),
/// ];
///
/// let normalized = normalize_arguments(raw);
/// assert_eq!(normalized[0], Token::Hole);
/// assert_eq!(
///     normalized[2],
///     Token::Leftover(vec!["--something".into(), "else".into()])
/// );
/// ```
pub fn normalize_arguments(raw: Vec<Token>) -> Vec<Token> {
    let real_index = raw
        .iter()
        .position(|token| !token.is_flag_like())
        .unwrap_or(raw.len());

    let mut rest = raw;
    let flags: Vec<String> = rest
        .drain(..real_index)
        .filter_map(|token| match token {
            Token::Value(value) => Some(value),
            _ => None,
        })
        .collect();

    match rest.last_mut() {
        Some(Token::Leftover(leftover)) => {
            let tail = std::mem::replace(leftover, flags);
            leftover.extend(tail);
        }
        _ => rest.push(Token::Leftover(flags)),
    }

    let mut normalized = vec![Token::Hole; real_index];
    normalized.extend(rest);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::InvokedCommand;

    fn invoked() -> Token {
        Token::Invoked(InvokedCommand::new("build"))
    }

    #[test]
    fn test_no_flags_appends_empty_leftover() {
        let normalized = normalize_arguments(vec![Token::from("moon"), invoked()]);

        assert_eq!(
            normalized,
            vec![Token::from("moon"), invoked(), Token::Leftover(Vec::new())]
        );
    }

    #[test]
    fn test_flags_merge_into_existing_leftover() {
        let normalized = normalize_arguments(vec![
            Token::from("--a"),
            Token::from("-b"),
            Token::from("moon"),
            invoked(),
            Token::Leftover(vec!["--c".into(), "x".into()]),
        ]);

        assert_eq!(
            normalized,
            vec![
                Token::Hole,
                Token::Hole,
                Token::from("moon"),
                invoked(),
                Token::Leftover(vec!["--a".into(), "-b".into(), "--c".into(), "x".into()]),
            ]
        );
    }

    #[test]
    fn test_flags_create_leftover_when_missing() {
        let normalized = normalize_arguments(vec![Token::from("--watch"), invoked()]);

        assert_eq!(
            normalized,
            vec![
                Token::Hole,
                invoked(),
                Token::Leftover(vec!["--watch".into()])
            ]
        );
    }

    #[test]
    fn test_only_leading_flags_are_moved() {
        let normalized = normalize_arguments(vec![
            Token::from("moon"),
            Token::from("--late"),
            invoked(),
        ]);

        assert_eq!(
            normalized,
            vec![
                Token::from("moon"),
                Token::from("--late"),
                invoked(),
                Token::Leftover(Vec::new()),
            ]
        );
    }

    #[test]
    fn test_hole_stops_the_scan() {
        let normalized = normalize_arguments(vec![Token::Hole, Token::from("--x"), invoked()]);

        assert_eq!(normalized[0], Token::Hole);
        assert_eq!(normalized[1], Token::from("--x"));
        assert_eq!(normalized.last(), Some(&Token::Leftover(Vec::new())));
    }

    #[test]
    fn test_all_flags() {
        let normalized = normalize_arguments(vec![Token::from("-a"), Token::from("-b")]);

        assert_eq!(
            normalized,
            vec![
                Token::Hole,
                Token::Hole,
                Token::Leftover(vec!["-a".into(), "-b".into()]),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            normalize_arguments(Vec::new()),
            vec![Token::Leftover(Vec::new())]
        );
    }
}
