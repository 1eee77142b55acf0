//! Declared items and the immutable schema a [`Parser`] is built from.
//!
//! Options live in a single arena; the short-key map, the long-key map and
//! the bare-dash slot all index into it, so an option declared with both a
//! key and a long key is one record no matter how it is looked up.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::parser::Parser;

/// Key of the option bound to the literal `--` token.
pub const ESCAPE_KEY: char = '-';

const ESCAPE_DESCRIPTION: &str =
    "Indicates that the following arguments are plain arguments and no options, even if they have a leading '-'";

fn normalize_description(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// A positional argument, assigned by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalDef {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) mandatory: bool,
    pub(crate) description: Option<String>,
}

impl PositionalDef {
    /// A mandatory positional named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            index: 0,
            name: name.into(),
            mandatory: true,
            description: None,
        }
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn full_name(&self) -> String {
        format!("<{}>", self.name)
    }
}

/// An option: `-k`, `--long`, both, or the bare `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    pub(crate) index: usize,
    pub(crate) key: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) takes_value: bool,
    pub(crate) mandatory: bool,
    pub(crate) description: Option<String>,
    pub(crate) synthetic: bool,
}

impl OptionDef {
    fn with_keys(key: Option<char>, long: Option<String>) -> Self {
        Self {
            index: 0,
            key,
            long,
            takes_value: false,
            mandatory: false,
            description: None,
            synthetic: false,
        }
    }

    /// `-key`
    pub fn short(key: char) -> Self {
        Self::with_keys(Some(key), None)
    }

    /// `--long`
    pub fn long(long: impl Into<String>) -> Self {
        Self::with_keys(None, Some(long.into()))
    }

    /// `-key` and `--long` naming the same option.
    pub fn short_long(key: char, long: impl Into<String>) -> Self {
        Self::with_keys(Some(key), Some(long.into()))
    }

    /// The option matched by a lone `-` token.
    pub fn dash() -> Self {
        Self::with_keys(None, None)
    }

    /// The option takes a value: the token after `-k`, or the part after `=` in `--long=value`.
    pub fn with_value(mut self) -> Self {
        self.takes_value = true;
        self
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    pub(crate) fn escape(index: usize) -> Self {
        Self {
            index,
            description: Some(ESCAPE_DESCRIPTION.to_string()),
            synthetic: true,
            ..Self::with_keys(Some(ESCAPE_KEY), None)
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn key(&self) -> Option<char> {
        self.key
    }

    pub fn long_key(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_dash(&self) -> bool {
        self.key.is_none() && self.long.is_none()
    }

    /// Whether this is the `--` option added because none was declared.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The long key if there is one, otherwise the key character.
    pub fn name(&self) -> String {
        match (&self.long, self.key) {
            (Some(long), _) => long.clone(),
            (None, Some(key)) => key.to_string(),
            (None, None) => "-".to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        let placeholder = |sep: &str| {
            if self.takes_value {
                format!("{sep}<{}>", self.name())
            } else {
                String::new()
            }
        };
        match (self.key, &self.long) {
            (Some(key), _) => format!("-{key}{}", placeholder(" ")),
            (None, Some(long)) => format!("--{long}{}", placeholder("=")),
            (None, None) => format!("-{}", placeholder(" ")),
        }
    }
}

/// A command alternative with its own parser for the tokens that follow it.
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) parser: Arc<Parser>,
}

impl CommandDef {
    /// A command that accepts nothing after its name and hands any further
    /// token back to the enclosing parser.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            index: 0,
            name: name.into(),
            description: None,
            parser: Arc::new(Parser::for_command()),
        }
    }

    pub fn with_parser(mut self, parser: impl Into<Arc<Parser>>) -> Self {
        self.parser = parser.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn full_name(&self) -> String {
        let syntax = self.parser.syntax();
        if syntax.is_empty() {
            self.name.clone()
        } else {
            format!("{} {syntax}", self.name)
        }
    }
}

/// Mutually exclusive commands sharing one mandatory flag.
#[derive(Debug, Clone, Default)]
pub struct CommandGroup {
    pub(crate) commands: IndexMap<String, CommandDef>,
    pub(crate) mandatory: bool,
}

impl CommandGroup {
    pub fn get(&self, name: &str) -> Option<&CommandDef> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDef> {
        self.commands.values()
    }

    /// `a | b | c`
    pub fn full_name(&self) -> String {
        self.commands
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// How plain (non-option, non-command) tokens are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainArgs {
    /// Named slots filled in declaration order.
    Fixed(Vec<PositionalDef>),
    /// Any number of unnamed tokens.
    Variadic,
}

/// Something the session must see before the parse may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mandatory {
    Positional(usize),
    Option(usize),
    Commands,
}

/// Borrowed view of one declared item.
#[derive(Debug, Clone, Copy)]
pub enum ExpectedArgument<'a> {
    Positional(&'a PositionalDef),
    Option(&'a OptionDef),
    Command(&'a CommandDef, &'a CommandGroup),
}

impl ExpectedArgument<'_> {
    pub fn index(&self) -> usize {
        match self {
            Self::Positional(p) => p.index(),
            Self::Option(o) => o.index(),
            Self::Command(c, _) => c.index(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Positional(p) => p.name().to_string(),
            Self::Option(o) => o.name(),
            Self::Command(c, _) => c.name().to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Self::Positional(p) => p.full_name(),
            Self::Option(o) => o.full_name(),
            Self::Command(c, _) => c.full_name(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Positional(p) => p.description(),
            Self::Option(o) => o.description(),
            Self::Command(c, _) => c.description(),
        }
    }

    /// A command is as mandatory as its group.
    pub fn is_mandatory(&self) -> bool {
        match self {
            Self::Positional(p) => p.is_mandatory(),
            Self::Option(o) => o.is_mandatory(),
            Self::Command(_, group) => group.is_mandatory(),
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(..))
    }
}

/// Immutable description of everything a parser accepts.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) plain: PlainArgs,
    pub(crate) options: Vec<OptionDef>,
    pub(crate) by_key: HashMap<char, usize>,
    pub(crate) by_long: HashMap<String, usize>,
    pub(crate) dash: Option<usize>,
    pub(crate) escape: usize,
    pub(crate) commands: Option<CommandGroup>,
    pub(crate) mandatory: Vec<Mandatory>,
}

impl Schema {
    /// Index the declarations and add the `--` option if it was not declared.
    ///
    /// Declarations must already be validated by the builder.
    pub(crate) fn assemble(
        plain: PlainArgs,
        mut options: Vec<OptionDef>,
        commands: Option<CommandGroup>,
        next_index: usize,
    ) -> Self {
        if !options.iter().any(|o| o.key == Some(ESCAPE_KEY)) {
            options.push(OptionDef::escape(next_index));
        }

        let mut by_key = HashMap::new();
        let mut by_long = HashMap::new();
        let mut dash = None;
        for (slot, option) in options.iter().enumerate() {
            if let Some(key) = option.key {
                by_key.insert(key, slot);
            }
            if let Some(long) = &option.long {
                by_long.insert(long.clone(), slot);
            }
            if option.is_dash() {
                dash = Some(slot);
            }
        }
        let escape = by_key[&ESCAPE_KEY];

        let mut mandatory: Vec<(usize, Mandatory)> = Vec::new();
        if let PlainArgs::Fixed(positionals) = &plain {
            mandatory.extend(
                positionals
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.mandatory)
                    .map(|(slot, p)| (p.index, Mandatory::Positional(slot))),
            );
        }
        mandatory.extend(
            options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.mandatory)
                .map(|(slot, o)| (o.index, Mandatory::Option(slot))),
        );
        if let Some(group) = commands.as_ref().filter(|g| g.mandatory) {
            let first = group.iter().map(CommandDef::index).min().unwrap_or(usize::MAX);
            mandatory.push((first, Mandatory::Commands));
        }
        mandatory.sort_by_key(|(index, _)| *index);

        Self {
            plain,
            options,
            by_key,
            by_long,
            dash,
            escape,
            commands,
            mandatory: mandatory.into_iter().map(|(_, m)| m).collect(),
        }
    }

    /// A schema accepting no positionals, options or commands.
    pub(crate) fn empty() -> Self {
        Self::assemble(PlainArgs::Fixed(Vec::new()), Vec::new(), None, 0)
    }

    pub fn plain_args(&self) -> &PlainArgs {
        &self.plain
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.plain, PlainArgs::Variadic)
    }

    pub fn positionals(&self) -> &[PositionalDef] {
        match &self.plain {
            PlainArgs::Fixed(positionals) => positionals,
            PlainArgs::Variadic => &[],
        }
    }

    pub fn option_by_key(&self, key: char) -> Option<&OptionDef> {
        self.by_key.get(&key).map(|&slot| &self.options[slot])
    }

    pub fn option_by_long(&self, long: &str) -> Option<&OptionDef> {
        self.by_long.get(long).map(|&slot| &self.options[slot])
    }

    pub fn dash_option(&self) -> Option<&OptionDef> {
        self.dash.map(|slot| &self.options[slot])
    }

    pub fn escape_option(&self) -> &OptionDef {
        &self.options[self.escape]
    }

    pub fn commands(&self) -> Option<&CommandGroup> {
        self.commands.as_ref()
    }

    /// Every user-declared item in declaration order.
    ///
    /// The synthesized `--` option is left out.
    pub fn items(&self) -> Vec<ExpectedArgument<'_>> {
        let mut items: Vec<ExpectedArgument<'_>> = Vec::new();
        items.extend(self.positionals().iter().map(ExpectedArgument::Positional));
        items.extend(
            self.options
                .iter()
                .filter(|o| !o.synthetic)
                .map(ExpectedArgument::Option),
        );
        if let Some(group) = &self.commands {
            items.extend(group.iter().map(|c| ExpectedArgument::Command(c, group)));
        }
        items.sort_by_key(ExpectedArgument::index);
        items
    }

    pub(crate) fn mandatory_name(&self, item: Mandatory) -> String {
        match item {
            Mandatory::Positional(slot) => self.positionals()[slot].name.clone(),
            Mandatory::Option(slot) => self.options[slot].name(),
            Mandatory::Commands => self
                .commands
                .as_ref()
                .map(CommandGroup::full_name)
                .unwrap_or_default(),
        }
    }
}
