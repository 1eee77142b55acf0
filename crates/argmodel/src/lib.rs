//! Schema-driven command line token parsing.
//!
//! A [`Parser`] is declared once with a [`ParserBuilder`]: positional
//! arguments (or a variadic list), short and long options, and a group of
//! mutually exclusive commands that each carry a nested parser. Every call to
//! [`Parser::parse`] works on a private session, so a parser can be reused and
//! shared across threads. A successful parse yields an immutable
//! [`ArgumentModel`].
//!
//! ```
//! use argmodel::{OptionDef, Parser, ParserBuilder};
//!
//! let get = ParserBuilder::for_command().argument("key").build()?;
//! let parser = Parser::builder()
//!     .option(OptionDef::short_long('o', "output").with_value())
//!     .flag('v')
//!     .command("get", get)
//!     .build()?;
//!
//! let model = parser.parse(&["-vo", "out.json", "get", "name"])?;
//! assert!(model.is_option_present('v'));
//! assert_eq!(model.long_option_value("output"), Some("out.json"));
//! assert_eq!(model.command_model("get").and_then(|m| m.argument_value("key")), Some("name"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod classify;
mod error;
mod model;
mod parser;
mod schema;
mod session;
mod tokens;
mod usage;

pub use builder::ParserBuilder;
pub use error::{ParseError, ParseResult, SchemaError};
pub use model::{ArgumentModel, CommandMatch, OptionMatch, PlainValues};
pub use parser::{DEFAULT_HELP_ARGS, Parser};
pub use schema::{
    CommandDef, CommandGroup, ESCAPE_KEY, ExpectedArgument, OptionDef, PlainArgs, PositionalDef,
    Schema,
};
pub use tokens::Tokens;
