use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

/// Values of the plain (positional) tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlainValues {
    /// Declared positionals by name, in declaration order. Optional
    /// positionals that received no token map to `None`.
    Named(IndexMap<String, Option<String>>),
    /// Every plain token in input order.
    Variadic(Vec<String>),
}

/// An option that was present in the parsed tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) key: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) long: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
}

impl OptionMatch {
    pub fn key(&self) -> Option<char> {
        self.key
    }

    pub fn long_key(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// The command that was matched, with the result of its own parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandMatch {
    pub(crate) name: String,
    pub(crate) model: Box<ArgumentModel>,
}

impl CommandMatch {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &ArgumentModel {
        &self.model
    }
}

/// Immutable result of a successful parse.
///
/// Only options that were present are kept. An option declared with both a
/// key and a long key is a single entry reachable through either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentModel {
    arguments: PlainValues,
    options: Vec<OptionMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<CommandMatch>,
    #[serde(skip)]
    by_key: HashMap<char, usize>,
    #[serde(skip)]
    by_long: HashMap<String, usize>,
    #[serde(skip)]
    dash: Option<usize>,
}

impl ArgumentModel {
    pub(crate) fn new(
        arguments: PlainValues,
        options: Vec<OptionMatch>,
        command: Option<CommandMatch>,
    ) -> Self {
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
            if option.key.is_none() && option.long.is_none() {
                dash = Some(slot);
            }
        }
        Self {
            arguments,
            options,
            command,
            by_key,
            by_long,
            dash,
        }
    }

    pub fn plain_values(&self) -> &PlainValues {
        &self.arguments
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.arguments, PlainValues::Variadic(_))
    }

    /// Value of the positional `name`. Always `None` in variadic mode.
    pub fn argument_value(&self, name: &str) -> Option<&str> {
        match &self.arguments {
            PlainValues::Named(values) => values.get(name)?.as_deref(),
            PlainValues::Variadic(_) => None,
        }
    }

    pub fn is_argument_present(&self, name: &str) -> bool {
        self.argument_value(name).is_some()
    }

    /// Plain values in declaration order (input order in variadic mode).
    ///
    /// Optional positionals that received no token are skipped; since slots
    /// fill in order, they can only ever be a trailing run.
    pub fn plain_arguments(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match &self.arguments {
            PlainValues::Named(values) => Box::new(values.values().filter_map(|v| v.as_deref())),
            PlainValues::Variadic(values) => Box::new(values.iter().map(String::as_str)),
        }
    }

    pub fn options(&self) -> &[OptionMatch] {
        &self.options
    }

    pub fn is_option_present(&self, key: char) -> bool {
        self.by_key.contains_key(&key)
    }

    pub fn is_long_option_present(&self, long: &str) -> bool {
        self.by_long.contains_key(long)
    }

    /// Whether the lone `-` token was given.
    pub fn is_dash_present(&self) -> bool {
        self.dash.is_some()
    }

    pub fn option_value(&self, key: char) -> Option<&str> {
        let slot = *self.by_key.get(&key)?;
        self.options[slot].value()
    }

    pub fn long_option_value(&self, long: &str) -> Option<&str> {
        let slot = *self.by_long.get(long)?;
        self.options[slot].value()
    }

    pub fn dash_value(&self) -> Option<&str> {
        self.options[self.dash?].value()
    }

    pub fn command(&self) -> Option<&CommandMatch> {
        self.command.as_ref()
    }

    /// Model produced by command `name`, if that command was matched.
    pub fn command_model(&self, name: &str) -> Option<&ArgumentModel> {
        self.command
            .as_ref()
            .filter(|c| c.name == name)
            .map(|c| c.model())
    }

    pub fn is_command_present(&self, name: &str) -> bool {
        self.command_model(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArgumentModel {
        let mut named = IndexMap::new();
        named.insert("input".to_string(), Some("a.txt".to_string()));
        named.insert("output".to_string(), None);
        ArgumentModel::new(
            PlainValues::Named(named),
            vec![
                OptionMatch {
                    key: Some('f'),
                    long: Some("format".to_string()),
                    value: Some("json".to_string()),
                },
                OptionMatch {
                    key: None,
                    long: None,
                    value: None,
                },
            ],
            None,
        )
    }

    #[test]
    fn options_resolve_through_either_key() {
        let model = sample();
        assert!(model.is_option_present('f'));
        assert!(model.is_long_option_present("format"));
        assert_eq!(model.option_value('f'), Some("json"));
        assert_eq!(model.long_option_value("format"), Some("json"));
        assert!(model.is_dash_present());
        assert_eq!(model.dash_value(), None);
        assert!(!model.is_option_present('x'));
    }

    #[test]
    fn unassigned_positionals_are_absent() {
        let model = sample();
        assert_eq!(model.argument_value("input"), Some("a.txt"));
        assert!(!model.is_argument_present("output"));
        assert!(!model.is_argument_present("nope"));
        assert_eq!(model.plain_arguments().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn serializes_without_lookup_tables() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["arguments"]["input"], "a.txt");
        assert!(json["arguments"]["output"].is_null());
        assert_eq!(json["options"][0]["long"], "format");
        assert!(json.get("by_key").is_none());
        assert!(json.get("command").is_none());
    }
}
