//! JSON documents describing an `argmodel` parser.
//!
//! A document lists the declared items in order; converting it with
//! [`ParserDoc::build`] yields a ready [`Parser`]. Nested command parsers are
//! documents of the same shape and stop at the first token they do not know
//! unless `ignore-unknown` says otherwise.
//!
//! ```json
//! {
//!   "format-version": 1,
//!   "items": [
//!     { "kind": "option", "short": "v", "long": "verbose" },
//!     { "kind": "argument", "name": "file", "description": "Input file" },
//!     { "kind": "command", "name": "get",
//!       "parser": { "items": [{ "kind": "argument", "name": "key" }] } }
//!   ]
//! }
//! ```

use argmodel::{CommandDef, OptionDef, Parser, ParserBuilder, PositionalDef, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema format version {0} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("option #{index} in {scope} has neither a short nor a long key")]
    OptionWithoutKey { scope: String, index: usize },

    #[error("option #{index} in {scope} is the bare '-' option and cannot also have keys")]
    DashWithKeys { scope: String, index: usize },

    #[error("invalid declarations in {scope}: {source}")]
    Schema {
        scope: String,
        #[source]
        source: SchemaError,
    },
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentDoc {
    pub name: String,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// The option matched by a lone `-`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dash: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub takes_value: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parser for the tokens after the command name. Without one the
    /// command accepts nothing further.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserDoc>,
}

/// One declared item; declaration order is the order in `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ItemDoc {
    Argument(ArgumentDoc),
    Option(OptionDoc),
    Command(CommandDoc),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserDoc {
    #[serde(default = "default_version")]
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemDoc>,
    /// Accept any number of plain tokens instead of named arguments.
    #[serde(default, skip_serializing_if = "is_false")]
    pub variadic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub commands_required: bool,
    /// Defaults to `false` at the top level and `true` for command parsers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unknown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_args: Option<Vec<String>>,
}

impl Default for ParserDoc {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            items: Vec::new(),
            variadic: false,
            commands_required: false,
            ignore_unknown: None,
            help_args: None,
        }
    }
}

impl ParserDoc {
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let doc: Self = serde_json::from_str(text)?;
        if doc.format_version != FORMAT_VERSION {
            return Err(MetadataError::UnsupportedVersion(doc.format_version));
        }
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the top-level parser.
    pub fn build(&self) -> Result<Parser, MetadataError> {
        self.build_in(ParserBuilder::new(), "top level")
    }

    fn build_in(&self, mut builder: ParserBuilder, scope: &str) -> Result<Parser, MetadataError> {
        for (index, item) in self.items.iter().enumerate() {
            builder = match item {
                ItemDoc::Argument(arg) => builder.argument_with(
                    PositionalDef::new(&arg.name)
                        .mandatory(arg.required)
                        .with_description(&arg.description),
                ),
                ItemDoc::Option(opt) => builder.option(opt.to_def(scope, index)?),
                ItemDoc::Command(cmd) => {
                    let mut def = CommandDef::new(&cmd.name).with_description(&cmd.description);
                    if let Some(doc) = &cmd.parser {
                        let scope = format!("command '{}'", cmd.name);
                        def = def.with_parser(doc.build_in(ParserBuilder::for_command(), &scope)?);
                    }
                    builder.command_with(def)
                }
            };
        }
        if self.variadic {
            builder = builder.variadic();
        }
        builder = builder.commands_mandatory(self.commands_required);
        if let Some(ignore) = self.ignore_unknown {
            builder = builder.ignore_unknown(ignore);
        }
        if let Some(help_args) = &self.help_args {
            builder = builder.help_args(help_args.iter().cloned());
        }
        builder.build().map_err(|source| MetadataError::Schema {
            scope: scope.to_string(),
            source,
        })
    }
}

impl OptionDoc {
    fn to_def(&self, scope: &str, index: usize) -> Result<OptionDef, MetadataError> {
        let def = match (self.short, self.long.as_deref(), self.dash) {
            (None, None, true) => OptionDef::dash(),
            (_, _, true) => {
                return Err(MetadataError::DashWithKeys {
                    scope: scope.to_string(),
                    index,
                });
            }
            (Some(key), Some(long), false) => OptionDef::short_long(key, long),
            (Some(key), None, false) => OptionDef::short(key),
            (None, Some(long), false) => OptionDef::long(long),
            (None, None, false) => {
                return Err(MetadataError::OptionWithoutKey {
                    scope: scope.to_string(),
                    index,
                });
            }
        };
        let def = if self.takes_value { def.with_value() } else { def };
        Ok(def
            .mandatory(self.required)
            .with_description(&self.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": [
            { "kind": "option", "short": "v", "long": "verbose", "description": "Chatty output" },
            { "kind": "argument", "name": "file" },
            { "kind": "argument", "name": "target", "required": false },
            { "kind": "option", "long": "format", "takes-value": true },
            { "kind": "command", "name": "get",
              "parser": { "items": [{ "kind": "argument", "name": "key" }] } },
            { "kind": "command", "name": "run" }
        ]
    }"#;

    #[test]
    fn sample_document_builds_a_working_parser() {
        let doc = ParserDoc::from_json(SAMPLE).unwrap();
        assert_eq!(doc.format_version, FORMAT_VERSION);
        let parser = doc.build().unwrap();
        assert!(!parser.ignores_unknown());
        assert_eq!(
            parser.syntax(),
            "[-v] <file> [<target>] [--format=<format>] [get | run]"
        );

        let model = parser
            .parse(&["-v", "in.txt", "--format=json", "get", "name"])
            .unwrap();
        assert!(model.is_long_option_present("verbose"));
        assert_eq!(model.argument_value("file"), Some("in.txt"));
        assert_eq!(model.long_option_value("format"), Some("json"));
        let get = model.command_model("get").unwrap();
        assert_eq!(get.argument_value("key"), Some("name"));
    }

    #[test]
    fn command_parsers_hand_back_unknown_tokens() {
        let doc = ParserDoc::from_json(SAMPLE).unwrap();
        let parser = doc.build().unwrap();
        // "run" accepts nothing, so "out" returns to the top level as <target>.
        let model = parser.parse(&["in.txt", "run", "out"]).unwrap();
        assert!(model.is_command_present("run"));
        assert_eq!(model.argument_value("target"), Some("out"));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = ParserDoc::from_json(r#"{ "format-version": 7 }"#).unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedVersion(7)));
    }

    #[test]
    fn unknown_item_kind_is_a_json_error() {
        let err = ParserDoc::from_json(r#"{ "items": [{ "kind": "flag", "short": "x" }] }"#)
            .unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)));
    }

    #[test]
    fn options_need_a_key_or_the_dash() {
        let doc = ParserDoc::from_json(r#"{ "items": [{ "kind": "option" }] }"#).unwrap();
        assert!(matches!(
            doc.build(),
            Err(MetadataError::OptionWithoutKey { index: 0, .. })
        ));

        let doc = ParserDoc::from_json(
            r#"{ "items": [{ "kind": "option", "dash": true, "short": "d" }] }"#,
        )
        .unwrap();
        assert!(matches!(
            doc.build(),
            Err(MetadataError::DashWithKeys { index: 0, .. })
        ));
    }

    #[test]
    fn schema_errors_name_the_command() {
        let doc = ParserDoc::from_json(
            r#"{ "items": [{ "kind": "command", "name": "get", "parser": { "items": [
                { "kind": "option", "short": "a" },
                { "kind": "option", "short": "a" }
            ] } }] }"#,
        )
        .unwrap();
        let err = doc.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid declarations in command 'get': option key '-a' is declared more than once"
        );
    }

    #[test]
    fn parser_level_settings_apply() {
        let doc = ParserDoc::from_json(
            r#"{ "variadic": true, "ignore-unknown": true, "help-args": ["help"],
                 "commands-required": true,
                 "items": [{ "kind": "command", "name": "go" }] }"#,
        )
        .unwrap();
        let parser = doc.build().unwrap();
        assert!(parser.ignores_unknown());
        assert!(parser.is_help(&["help"]));
        assert!(parser.schema().is_variadic());
        assert_eq!(parser.syntax(), "go");
    }

    #[test]
    fn serialization_omits_defaults() {
        let doc = ParserDoc {
            items: vec![
                ItemDoc::Argument(ArgumentDoc {
                    name: "file".to_string(),
                    required: true,
                    description: String::new(),
                }),
                ItemDoc::Option(OptionDoc {
                    short: Some('q'),
                    ..OptionDoc::default()
                }),
            ],
            ..ParserDoc::default()
        };
        let json: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "format-version": 1,
                "items": [
                    { "kind": "argument", "name": "file" },
                    { "kind": "option", "short": "q" }
                ]
            })
        );
        assert_eq!(ParserDoc::from_json(&json.to_string()).unwrap(), doc);
    }
}
