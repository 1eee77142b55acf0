//! Token classification and option resolution.

use crate::error::ParseError;
use crate::session::{Halt, Session};

/// What a raw token looks like before it is matched against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classified<'t> {
    /// A positional value or a command name.
    Plain,
    Option(OptionToken<'t>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionToken<'t> {
    /// `--name` or `--name=value`. `assigned` is the part after the first
    /// `=`, possibly empty.
    Long {
        name: &'t str,
        assigned: Option<&'t str>,
    },
    /// `-k`, `-abc`, or `--` (the key `-`).
    Short { keys: &'t str },
    /// A lone `-`.
    Dash,
}

pub(crate) fn classify(token: &str, escaped: bool) -> Classified<'_> {
    if escaped || !token.starts_with('-') {
        return Classified::Plain;
    }
    let rest = &token[1..];
    let option = if token.len() > 2 && rest.starts_with('-') {
        let long = &rest[1..];
        match long.split_once('=') {
            Some((name, value)) => OptionToken::Long {
                name,
                assigned: Some(value),
            },
            None => OptionToken::Long {
                name: long,
                assigned: None,
            },
        }
    } else if rest.is_empty() {
        OptionToken::Dash
    } else {
        OptionToken::Short { keys: rest }
    };
    Classified::Option(option)
}

/// Resolve an option token against the session, mark every option it names
/// as present and return the slot of the last one.
///
/// A value for that option may still be owed by the next token; see
/// [`Session::awaits_value`].
pub(crate) fn resolve_option(
    session: &mut Session<'_>,
    token: &str,
    option: OptionToken<'_>,
) -> Result<usize, Halt> {
    let slot = match option {
        OptionToken::Long { name, assigned } => resolve_long(session, token, name, assigned)?,
        OptionToken::Short { keys } => resolve_short(session, token, keys)?,
        OptionToken::Dash => session.dash().ok_or(Halt::Unknown)?,
    };
    session.mark_present(slot);
    Ok(slot)
}

fn resolve_long(
    session: &mut Session<'_>,
    token: &str,
    name: &str,
    assigned: Option<&str>,
) -> Result<usize, Halt> {
    let slot = session.by_long(name).ok_or(Halt::Unknown)?;
    let def = session.option(slot);
    match assigned {
        // Value-taking long options only accept the `--name=value` form.
        None if def.takes_value() => {
            return Err(ParseError::MissingOptionValue {
                option: def.full_name(),
            }
            .into());
        }
        None | Some("") => {}
        Some(value) if def.takes_value() => session.set_value(slot, value),
        Some(_) => {
            return Err(ParseError::UnexpectedOptionValue {
                option: def.full_name(),
                token: token.to_string(),
            }
            .into());
        }
    }
    Ok(slot)
}

fn resolve_short(session: &mut Session<'_>, token: &str, keys: &str) -> Result<usize, Halt> {
    let mut last = None;
    let mut chars = keys.chars().peekable();
    while let Some(key) = chars.next() {
        let slot = session.by_key(key).ok_or(Halt::Unknown)?;
        session.mark_present(slot);
        if session.option(slot).takes_value() && chars.peek().is_some() {
            return Err(ParseError::InvalidOptionFormat {
                token: token.to_string(),
                key,
            }
            .into());
        }
        last = Some(slot);
    }
    last.ok_or(Halt::Unknown)
}
