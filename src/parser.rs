use crate::command::Redirection;
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

/// Number of words kept in an argument vector unless configured otherwise.
pub const DEFAULT_MAX_ARGS: usize = 127;

/// A command line split into its argument vector and redirections.
///
/// Every string borrows from the token slice it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub argv: Vec<&'a str>,
    pub redirection: Redirection<'a>,
}

/// Malformed redirection syntax. The loop reports every variant the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("append redirection `>>` is not supported")]
    AppendUnsupported,
    #[error("redirection `{0}` must be followed by a file name")]
    MissingTarget(&'static str),
    #[error("standard input is redirected more than once")]
    DuplicateInput,
    #[error("standard output is redirected more than once")]
    DuplicateOutput,
}

struct CommandBuilder<'a> {
    tokens: &'a [Token],
    pos: usize,
    max_args: usize,
}

impl<'a> CommandBuilder<'a> {
    fn new(tokens: &'a [Token], max_args: usize) -> Self {
        CommandBuilder {
            tokens,
            pos: 0,
            max_args,
        }
    }

    fn consume(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn build(mut self) -> Result<ParsedCommand<'a>, ParsingError> {
        let mut command = ParsedCommand::default();

        while let Some(token) = self.consume() {
            match token.kind() {
                TokenKind::Word => {
                    // Once the vector is full the rest of the line is ignored,
                    // redirections included.
                    if command.argv.len() >= self.max_args {
                        break;
                    }
                    command.argv.push(token.as_str());
                }
                TokenKind::RedirectAppend => return Err(ParsingError::AppendUnsupported),
                TokenKind::RedirectIn => {
                    let target = self.parse_target("<")?;
                    set_once(
                        &mut command.redirection.input,
                        target,
                        ParsingError::DuplicateInput,
                    )?;
                }
                TokenKind::RedirectOut => {
                    let target = self.parse_target(">")?;
                    set_once(
                        &mut command.redirection.output,
                        target,
                        ParsingError::DuplicateOutput,
                    )?;
                }
            }
        }

        Ok(command)
    }

    /// Consumes the file name following a redirection operator.
    fn parse_target(&mut self, operator: &'static str) -> Result<&'a str, ParsingError> {
        match self.consume() {
            Some(token) if !token.is_redirect() => Ok(token.as_str()),
            _ => Err(ParsingError::MissingTarget(operator)),
        }
    }
}

fn set_once<'a>(
    slot: &mut Option<&'a str>,
    target: &'a str,
    duplicate: ParsingError,
) -> Result<(), ParsingError> {
    if slot.is_some() {
        return Err(duplicate);
    }
    *slot = Some(target);
    Ok(())
}

/// Splits `tokens` into an argument vector of at most `max_args` words and the
/// redirections they request.
///
/// An empty argument vector is not an error: a line made only of
/// redirections parses successfully and is simply not executed.
pub fn parse_command(tokens: &[Token], max_args: usize) -> Result<ParsedCommand<'_>, ParsingError> {
    CommandBuilder::new(tokens, max_args).build()
}
