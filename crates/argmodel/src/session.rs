//! Per-parse working state forked from a [`Schema`].

use indexmap::{IndexMap, IndexSet};

use crate::error::{ParseError, ParseResult};
use crate::model::{ArgumentModel, CommandMatch, OptionMatch, PlainValues};
use crate::schema::{CommandDef, Mandatory, OptionDef, PlainArgs, Schema};

/// Why the token loop stopped before the tokens ran out.
#[derive(Debug)]
pub(crate) enum Halt {
    /// The token at the cursor matched nothing; the parser decides whether
    /// that is an error or just the end of what it understands.
    Unknown,
    Failed(ParseError),
}

impl From<ParseError> for Halt {
    fn from(err: ParseError) -> Self {
        Self::Failed(err)
    }
}

#[derive(Debug, Clone, Default)]
struct OptionState {
    present: bool,
    value: Option<String>,
}

#[derive(Debug)]
enum PlainState {
    Fixed(Vec<Option<String>>),
    Variadic(Vec<String>),
}

/// Mutable state of a single parse. Never outlives the call that forked it.
#[derive(Debug)]
pub(crate) struct Session<'p> {
    schema: &'p Schema,
    options: Vec<OptionState>,
    plain: PlainState,
    cursor: usize,
    command: Option<(&'p CommandDef, ArgumentModel)>,
    pending: IndexSet<Mandatory>,
    escaped: bool,
}

impl<'p> Session<'p> {
    pub(crate) fn fork(schema: &'p Schema) -> Self {
        let plain = match &schema.plain {
            PlainArgs::Fixed(positionals) => PlainState::Fixed(vec![None; positionals.len()]),
            PlainArgs::Variadic => PlainState::Variadic(Vec::new()),
        };
        Self {
            schema,
            options: vec![OptionState::default(); schema.options.len()],
            plain,
            cursor: 0,
            command: None,
            pending: schema.mandatory.iter().copied().collect(),
            escaped: false,
        }
    }

    /// Whether a `--` token has been seen; latched once true.
    pub(crate) fn is_escaped(&mut self) -> bool {
        if !self.escaped {
            self.escaped = self.options[self.schema.escape].present;
        }
        self.escaped
    }

    pub(crate) fn option(&self, slot: usize) -> &'p OptionDef {
        &self.schema.options[slot]
    }

    pub(crate) fn by_key(&self, key: char) -> Option<usize> {
        self.schema.by_key.get(&key).copied()
    }

    pub(crate) fn by_long(&self, long: &str) -> Option<usize> {
        self.schema.by_long.get(long).copied()
    }

    pub(crate) fn dash(&self) -> Option<usize> {
        self.schema.dash
    }

    pub(crate) fn mark_present(&mut self, slot: usize) {
        self.options[slot].present = true;
    }

    pub(crate) fn set_value(&mut self, slot: usize, value: &str) {
        debug_assert!(self.schema.options[slot].takes_value);
        self.options[slot].value = Some(value.to_string());
    }

    /// A value-taking option that has not received its value yet.
    pub(crate) fn awaits_value(&self, slot: usize) -> bool {
        self.schema.options[slot].takes_value && self.options[slot].value.is_none()
    }

    /// The command named by `token`, unless a command was already matched.
    pub(crate) fn expected_command(&self, token: &str) -> Option<&'p CommandDef> {
        if self.command.is_some() {
            return None;
        }
        self.schema.commands.as_ref()?.get(token)
    }

    pub(crate) fn set_command(&mut self, command: &'p CommandDef, model: ArgumentModel) {
        self.command = Some((command, model));
        self.pending.shift_remove(&Mandatory::Commands);
    }

    /// Record a plain token in the next positional slot.
    pub(crate) fn push_plain(&mut self, token: &str) -> Result<(), Halt> {
        match &mut self.plain {
            PlainState::Variadic(values) => values.push(token.to_string()),
            PlainState::Fixed(values) => {
                let slot = values.get_mut(self.cursor).ok_or(Halt::Unknown)?;
                *slot = Some(token.to_string());
                self.pending.shift_remove(&Mandatory::Positional(self.cursor));
                self.cursor += 1;
            }
        }
        Ok(())
    }

    /// Check every mandatory item and freeze the session into a model.
    pub(crate) fn finish(mut self) -> ParseResult<ArgumentModel> {
        let options = &self.options;
        self.pending.retain(|item| match item {
            Mandatory::Option(slot) => !options[*slot].present,
            Mandatory::Positional(_) | Mandatory::Commands => true,
        });
        if !self.pending.is_empty() {
            let missing = self
                .pending
                .iter()
                .map(|&item| self.schema.mandatory_name(item))
                .collect();
            return Err(ParseError::MissingArguments { missing });
        }

        let arguments = match self.plain {
            PlainState::Fixed(values) => PlainValues::Named(
                self.schema
                    .positionals()
                    .iter()
                    .map(|p| p.name.clone())
                    .zip(values)
                    .collect::<IndexMap<_, _>>(),
            ),
            PlainState::Variadic(values) => PlainValues::Variadic(values),
        };

        let options = self
            .options
            .into_iter()
            .zip(&self.schema.options)
            .filter(|(state, _)| state.present)
            .map(|(state, def)| OptionMatch {
                key: def.key,
                long: def.long.clone(),
                value: state.value,
            })
            .collect();

        let command = self.command.map(|(def, model)| CommandMatch {
            name: def.name.clone(),
            model: Box::new(model),
        });

        Ok(ArgumentModel::new(arguments, options, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    #[test]
    fn forks_start_fresh() {
        let parser = Parser::builder()
            .argument("file")
            .flag('v')
            .build()
            .unwrap();
        let schema = parser.schema();

        let mut first = Session::fork(schema);
        let slot = first.by_key('v').unwrap();
        first.mark_present(slot);
        first.push_plain("a.txt").unwrap();
        assert!(first.push_plain("b.txt").is_err());

        let second = Session::fork(schema);
        assert!(!second.options[slot].present);
        assert_eq!(
            second.finish().unwrap_err(),
            ParseError::MissingArguments {
                missing: vec!["file".to_string()]
            }
        );

        let model = first.finish().unwrap();
        assert!(model.is_option_present('v'));
        assert_eq!(model.argument_value("file"), Some("a.txt"));
    }

    #[test]
    fn escape_latches_once_seen() {
        let parser = Parser::builder().variadic().build().unwrap();
        let mut session = Session::fork(parser.schema());
        assert!(!session.is_escaped());
        let escape = session.by_key('-').unwrap();
        session.mark_present(escape);
        assert!(session.is_escaped());
    }

    #[test]
    fn value_is_owed_until_set() {
        let parser = Parser::builder()
            .option(crate::OptionDef::short('o').with_value())
            .build()
            .unwrap();
        let mut session = Session::fork(parser.schema());
        let slot = session.by_key('o').unwrap();
        assert!(session.awaits_value(slot));
        session.set_value(slot, "out");
        assert!(!session.awaits_value(slot));
    }
}
