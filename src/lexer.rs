//! A module implementing lexical analysis (tokenization) of a command line.
//!
//! The language is deliberately tiny: words are separated by runs of spaces
//! and tabs, and the redirection operators `<`, `>` and `>>` are recognized
//! only where a token begins (at the start of the line or right after a run of
//! blanks). Inside a word the characters `<` and `>` are ordinary text, so
//! `a<b` is a single word while `a <b` is the word `a`, the operator `<` and
//! the word `b`.

use thiserror::Error;

/// Number of tokens kept from a single line unless configured otherwise.
pub const DEFAULT_MAX_TOKENS: usize = 256;

/// Classification of a token, inferred from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Anything that is not exactly one of the operators below.
    Word,
    /// Input redirection symbol, `<`.
    RedirectIn,
    /// Output redirection symbol, `>`.
    RedirectOut,
    /// Append redirection symbol, `>>`. Recognized only to be rejected.
    RedirectAppend,
}

/// Represents a token resulting from lexical analysis.
///
/// A token is an owned copy of the matched text. Its [`TokenKind`] is not
/// stored but derived from the text, so a word that happens to read `>` is
/// treated as an operator by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> TokenKind {
        match self.0.as_str() {
            "<" => TokenKind::RedirectIn,
            ">" => TokenKind::RedirectOut,
            ">>" => TokenKind::RedirectAppend,
            _ => TokenKind::Word,
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.kind() != TokenKind::Word
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token(text.to_string())
    }
}

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Storage for a token could not be reserved. The tokens produced so far
    /// are dropped together with the error.
    #[error("cannot allocate memory for a token")]
    Allocation,
}

struct LexingFSM<'a> {
    input: &'a str,
    pos: usize,
    /// Set at the start of the line and after every run of blanks; cleared
    /// once a token has been emitted.
    at_boundary: bool,
    max_tokens: usize,
}

impl<'a> LexingFSM<'a> {
    fn new(input: &'a str, max_tokens: usize) -> Self {
        LexingFSM {
            input,
            pos: 0,
            at_boundary: true,
            max_tokens,
        }
    }

    fn make_tokens(&mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut out = Vec::new();

        loop {
            self.skip_blanks();
            let Some(ch) = self.peek_byte(0) else {
                break;
            };
            // Tokens past the capacity are dropped without notice.
            if out.len() >= self.max_tokens {
                break;
            }

            let text = if self.at_boundary && (ch == b'<' || ch == b'>') {
                let len = if ch == b'>' && self.peek_byte(1) == Some(b'>') {
                    2
                } else {
                    1
                };
                self.take(len)
            } else {
                self.take_word()
            };

            out.try_reserve(1).map_err(|_| TokenizeError::Allocation)?;
            out.push(owned_token(text)?);
            self.at_boundary = false;
        }

        Ok(out)
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_blanks(&mut self) {
        let start = self.pos;
        while matches!(self.peek_byte(0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
        if self.pos != start {
            self.at_boundary = true;
        }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let text = &self.input[self.pos..self.pos + len];
        self.pos += len;
        text
    }

    fn take_word(&mut self) -> &'a str {
        let start = self.pos;
        while !matches!(self.peek_byte(0), None | Some(b' ' | b'\t')) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }
}

fn owned_token(text: &str) -> Result<Token, TokenizeError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(text.len())
        .map_err(|_| TokenizeError::Allocation)?;
    owned.push_str(text);
    Ok(Token(owned))
}

/// The main entry point function to perform lexical analysis.
///
/// Returns at most `max_tokens` tokens in input order. A blank line yields an
/// empty vector.
pub fn split_into_tokens(line: &str, max_tokens: usize) -> Result<Vec<Token>, TokenizeError> {
    LexingFSM::new(line, max_tokens).make_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        split_into_tokens(line, DEFAULT_MAX_TOKENS)
            .unwrap()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    #[test]
    fn blank_lines_yield_no_tokens() {
        assert!(texts("").is_empty());
        assert!(texts("   ").is_empty());
        assert!(texts(" \t \t").is_empty());
    }

    #[test]
    fn splits_on_spaces_and_tabs() {
        assert_eq!(texts("ls -la"), ["ls", "-la"]);
        assert_eq!(texts("  ls\t\t-la   /tmp "), ["ls", "-la", "/tmp"]);
    }

    #[test]
    fn output_redirection_is_an_operator() {
        assert_eq!(texts("echo hi > out.txt"), ["echo", "hi", ">", "out.txt"]);
    }

    #[test]
    fn append_operator_is_one_token() {
        let tokens = split_into_tokens("cmd >> f", DEFAULT_MAX_TOKENS).unwrap();
        assert_eq!(tokens, [Token::from("cmd"), Token::from(">>"), Token::from("f")]);
        assert_eq!(tokens[1].kind(), TokenKind::RedirectAppend);
    }

    #[test]
    fn both_redirections() {
        assert_eq!(texts("a < b > c"), ["a", "<", "b", ">", "c"]);
    }

    #[test]
    fn operator_glued_to_following_word() {
        assert_eq!(texts("echo >out"), ["echo", ">", "out"]);
        assert_eq!(texts("<in cat"), ["<", "in", "cat"]);
    }

    #[test]
    fn operators_inside_words_are_literal() {
        assert_eq!(texts("a<b"), ["a<b"]);
        assert_eq!(texts("echo x>y"), ["echo", "x>y"]);
        assert_eq!(texts("echo x>>y"), ["echo", "x>>y"]);
    }

    #[test]
    fn operator_chars_after_an_operator_form_a_word() {
        // Only the first operator sits at a boundary.
        assert_eq!(texts("<>f"), ["<", ">f"]);
        let tokens = split_into_tokens("cmd >>> f", DEFAULT_MAX_TOKENS).unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].as_str(), ">>");
        assert_eq!(tokens[2].as_str(), ">");
        // The kind comes from the text, whatever the scanner state was.
        assert_eq!(tokens[2].kind(), TokenKind::RedirectOut);
    }

    #[test]
    fn ampersand_is_a_plain_word() {
        assert_eq!(texts("sleep 1 &"), ["sleep", "1", "&"]);
        assert_eq!(split_into_tokens("&", 4).unwrap()[0].kind(), TokenKind::Word);
    }

    #[test]
    fn tokens_past_capacity_are_dropped() {
        let tokens = split_into_tokens("a b c d e", 3).unwrap();
        assert_eq!(tokens, [Token::from("a"), Token::from("b"), Token::from("c")]);
        assert!(split_into_tokens("a b", 0).unwrap().is_empty());
    }

    #[test]
    fn non_ascii_words_are_kept_intact() {
        assert_eq!(texts("echo привет\tмир"), ["echo", "привет", "мир"]);
    }
}
