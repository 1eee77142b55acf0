use crate::builder::ParserBuilder;
use crate::classify::{self, Classified};
use crate::error::{ParseError, ParseResult};
use crate::model::ArgumentModel;
use crate::schema::{ExpectedArgument, Schema};
use crate::session::{Halt, Session};
use crate::tokens::Tokens;

/// First tokens that ask for usage instead of a parse.
pub const DEFAULT_HELP_ARGS: [&str; 3] = ["-h", "--help", "?"];

/// A reusable parser for one [`Schema`].
///
/// Every parse forks its own session, so one parser can serve any number of
/// parses, including concurrent ones from several threads.
#[derive(Debug, Clone)]
pub struct Parser {
    schema: Schema,
    ignore_unknown: bool,
    pub(crate) help_args: Vec<String>,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub(crate) fn from_parts(schema: Schema, ignore_unknown: bool, help_args: Vec<String>) -> Self {
        Self {
            schema,
            ignore_unknown,
            help_args,
        }
    }

    /// Parser for a command declared without one: accepts nothing and stops
    /// at the first token.
    pub(crate) fn for_command() -> Self {
        Self::from_parts(Schema::empty(), true, default_help_args())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every declared item in declaration order, for usage rendering.
    pub fn arguments(&self) -> Vec<ExpectedArgument<'_>> {
        self.schema.items()
    }

    /// Whether an unknown token ends the parse quietly instead of failing it.
    ///
    /// The unknown token and everything after it is left unconsumed, so an
    /// enclosing parser gets to look at it.
    pub fn ignores_unknown(&self) -> bool {
        self.ignore_unknown
    }

    pub fn set_ignore_unknown(&mut self, ignore_unknown: bool) {
        self.ignore_unknown = ignore_unknown;
    }

    pub fn help_args(&self) -> &[String] {
        &self.help_args
    }

    pub fn set_help_args<I, S>(&mut self, help_args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_args = help_args.into_iter().map(Into::into).collect();
    }

    /// Parse a complete token sequence.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<ArgumentModel> {
        self.parse_from(0, tokens)
    }

    /// Parse `tokens[offset..]`, e.g. to skip a program name.
    pub fn parse_from<S: AsRef<str>>(
        &self,
        offset: usize,
        tokens: &[S],
    ) -> ParseResult<ArgumentModel> {
        if offset >= tokens.len() {
            return Err(ParseError::EmptyInput);
        }
        self.parse_tokens(&mut Tokens::from_offset(tokens, offset))
    }

    /// Parse from wherever `tokens` currently stands.
    ///
    /// On success the cursor is either exhausted or, when unknown tokens are
    /// ignored, positioned on the first token this parser did not understand.
    pub fn parse_tokens(&self, tokens: &mut Tokens<'_>) -> ParseResult<ArgumentModel> {
        let mut session = Session::fork(&self.schema);

        while let Some(token) = tokens.peek() {
            match self.step(&mut session, token, tokens) {
                Ok(()) => {}
                Err(Halt::Unknown) if self.ignore_unknown => {
                    tracing::debug!(token, "ignoring unknown argument and the rest of the tokens");
                    break;
                }
                Err(Halt::Unknown) => {
                    return Err(ParseError::UnknownArgument {
                        token: token.to_string(),
                    });
                }
                Err(Halt::Failed(err)) => return Err(err),
            }
        }

        session.finish()
    }

    /// Handle the token at the cursor. It is consumed only on success.
    fn step<'p>(
        &'p self,
        session: &mut Session<'p>,
        token: &str,
        tokens: &mut Tokens<'_>,
    ) -> Result<(), Halt> {
        let escaped = session.is_escaped();
        match classify::classify(token, escaped) {
            Classified::Plain => {
                if let Some(command) = session.expected_command(token) {
                    tokens.next();
                    tracing::debug!(command = command.name(), "delegating to command parser");
                    let model = command.parser().parse_tokens(tokens)?;
                    session.set_command(command, model);
                } else {
                    tracing::trace!(token, "plain argument");
                    session.push_plain(token)?;
                    tokens.next();
                }
            }
            Classified::Option(option) => {
                let slot = classify::resolve_option(session, token, option)?;
                tokens.next();
                tracing::trace!(token, option = %session.option(slot).name(), "option");
                if session.awaits_value(slot) {
                    let Some(value) = tokens.next() else {
                        return Err(ParseError::MissingOptionValue {
                            option: session.option(slot).full_name(),
                        }
                        .into());
                    };
                    session.set_value(slot, value);
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn default_help_args() -> Vec<String> {
    DEFAULT_HELP_ARGS.iter().map(|s| s.to_string()).collect()
}
