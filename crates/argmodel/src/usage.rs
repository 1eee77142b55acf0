//! Syntax line and usage text.

use std::io::{self, Write};

use crate::parser::Parser;

impl Parser {
    /// One-line synopsis, e.g. `<file> [-o <out>] [--verbose] [run | get]`.
    pub fn syntax(&self) -> String {
        let mut parts: Vec<String> = self
            .arguments()
            .iter()
            .filter(|item| !item.is_command())
            .map(|item| bracket(item.full_name(), item.is_mandatory()))
            .collect();
        if let Some(group) = self.schema().commands() {
            parts.push(bracket(group.full_name(), group.is_mandatory()));
        }
        parts.join(" ").trim().to_string()
    }

    pub fn write_usage<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Syntax:")?;
        writeln!(out, "{}", self.syntax())?;
        for item in self.arguments() {
            writeln!(out)?;
            writeln!(out, "{}", item.full_name())?;
            if let Some(description) = item.description() {
                writeln!(out, "{description}")?;
            }
        }
        Ok(())
    }

    /// Whether the first token is one of the help triggers.
    pub fn is_help<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        let Some(first) = tokens.first().map(AsRef::as_ref) else {
            return false;
        };
        self.help_args.iter().any(|h| h == first)
    }

    /// Write the usage text if the first token asks for help.
    ///
    /// Returns whether it did.
    pub fn print_usage_if_help_requested<W: Write, S: AsRef<str>>(
        &self,
        out: &mut W,
        tokens: &[S],
    ) -> io::Result<bool> {
        if !self.is_help(tokens) {
            return Ok(false);
        }
        self.write_usage(out)?;
        Ok(true)
    }
}

fn bracket(name: String, mandatory: bool) -> String {
    if mandatory { name } else { format!("[{name}]") }
}
