use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::parser::{Parser, default_help_args};
use crate::schema::{CommandDef, CommandGroup, OptionDef, PlainArgs, PositionalDef, Schema};

/// Declares the items of a [`Parser`].
///
/// Every declaration gets the next index from one counter shared by
/// positionals, options and commands, which fixes the order used for usage
/// text and for missing-argument reports.
#[derive(Debug, Clone)]
pub struct ParserBuilder {
    next_index: usize,
    positionals: Vec<PositionalDef>,
    variadic: bool,
    options: Vec<OptionDef>,
    commands: Vec<CommandDef>,
    commands_mandatory: bool,
    ignore_unknown: bool,
    help_args: Vec<String>,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            positionals: Vec::new(),
            variadic: false,
            options: Vec::new(),
            commands: Vec::new(),
            commands_mandatory: false,
            ignore_unknown: false,
            help_args: default_help_args(),
        }
    }

    /// Builder for a command's own parser: unknown tokens end its parse and
    /// are left for the enclosing parser.
    pub fn for_command() -> Self {
        Self::new().ignore_unknown(true)
    }

    fn take_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// A mandatory positional.
    pub fn argument(self, name: impl Into<String>) -> Self {
        self.argument_with(PositionalDef::new(name))
    }

    pub fn optional_argument(self, name: impl Into<String>) -> Self {
        self.argument_with(PositionalDef::new(name).mandatory(false))
    }

    pub fn argument_with(mut self, mut positional: PositionalDef) -> Self {
        positional.index = self.take_index();
        self.positionals.push(positional);
        self
    }

    /// Accept any number of unnamed plain tokens instead of named positionals.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// A flag with a single-character key: `-k`.
    pub fn flag(self, key: char) -> Self {
        self.option(OptionDef::short(key))
    }

    /// A flag with only a long key: `--name`.
    pub fn long_flag(self, long: impl Into<String>) -> Self {
        self.option(OptionDef::long(long))
    }

    pub fn option(mut self, mut option: OptionDef) -> Self {
        option.index = self.take_index();
        self.options.push(option);
        self
    }

    /// A command whose following tokens are parsed by `parser`.
    pub fn command(self, name: impl Into<String>, parser: Parser) -> Self {
        self.command_with(CommandDef::new(name).with_parser(parser))
    }

    pub fn command_with(mut self, mut command: CommandDef) -> Self {
        command.index = self.take_index();
        self.commands.push(command);
        self
    }

    /// Require exactly one of the declared commands.
    pub fn commands_mandatory(mut self, mandatory: bool) -> Self {
        self.commands_mandatory = mandatory;
        self
    }

    pub fn ignore_unknown(mut self, ignore_unknown: bool) -> Self {
        self.ignore_unknown = ignore_unknown;
        self
    }

    pub fn help_args<I, S>(mut self, help_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_args = help_args.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Parser, SchemaError> {
        let plain = if self.variadic {
            if let Some(first) = self.positionals.first() {
                return Err(SchemaError::MixedPositionalModes(first.name.clone()));
            }
            PlainArgs::Variadic
        } else {
            check_positionals(&self.positionals)?;
            PlainArgs::Fixed(self.positionals)
        };

        check_options(&self.options)?;

        let commands = if self.commands.is_empty() {
            None
        } else {
            let mut by_name = IndexMap::with_capacity(self.commands.len());
            for command in self.commands {
                if by_name.contains_key(&command.name) {
                    return Err(SchemaError::DuplicateCommand(command.name));
                }
                by_name.insert(command.name.clone(), command);
            }
            Some(CommandGroup {
                commands: by_name,
                mandatory: self.commands_mandatory,
            })
        };

        let schema = Schema::assemble(plain, self.options, commands, self.next_index);
        tracing::trace!(
            options = schema.options.len(),
            positionals = schema.positionals().len(),
            "schema assembled"
        );
        Ok(Parser::from_parts(schema, self.ignore_unknown, self.help_args))
    }
}

fn check_positionals(positionals: &[PositionalDef]) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    for positional in positionals {
        if !names.insert(positional.name.as_str()) {
            return Err(SchemaError::DuplicatePositional(positional.name.clone()));
        }
    }
    Ok(())
}

fn check_options(options: &[OptionDef]) -> Result<(), SchemaError> {
    let mut keys = HashSet::new();
    let mut longs = HashSet::new();
    let mut dash = false;
    for option in options {
        if let Some(key) = option.key {
            if !keys.insert(key) {
                return Err(SchemaError::DuplicateKey(key));
            }
        }
        if let Some(long) = option.long.as_deref() {
            if long.trim().is_empty() {
                return Err(SchemaError::EmptyLongKey);
            }
            if long.contains('=') {
                return Err(SchemaError::InvalidLongKey(long.to_string()));
            }
            if !longs.insert(long) {
                return Err(SchemaError::DuplicateLongKey(long.to_string()));
            }
        }
        if option.is_dash() {
            if dash {
                return Err(SchemaError::DuplicateDash);
            }
            dash = true;
        }
    }
    Ok(())
}
