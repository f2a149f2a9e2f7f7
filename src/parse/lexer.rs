use winnow::{
    ascii::{digit0, digit1},
    combinator::{opt, preceded},
    token::take_while,
    PResult, Parser,
};

use super::{Token, TokenKind};
use crate::error::LexError;

/// Byte-driven tokenizer for dice notation.
///
/// Tokens come out one at a time, either pulled through [`Iterator`] or
/// pushed to a callback with [`Lexer::lex`]. The stream always ends with
/// exactly one `EndOfStream` or one `Error` token and nothing after it.
#[derive(Debug, Clone)]
pub struct Lexer<'s> {
    input: &'s str,
    remaining: &'s str,
    finished: bool,
    error: Option<LexError>,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            input,
            remaining: input,
            finished: false,
            error: None,
        }
    }

    /// Drives the lexer to completion, handing every token to `receiver`.
    pub fn lex(self, mut receiver: impl FnMut(Token)) {
        for token in self {
            receiver(token);
        }
    }

    /// The failure behind the `Error` token, once one has been emitted.
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    fn offset(&self) -> usize {
        self.input.len() - self.remaining.len()
    }

    fn detect(&mut self) -> Token {
        let Some(c) = self.remaining.chars().next() else {
            self.finished = true;
            return Token::end_of_stream();
        };

        match c {
            '0'..='9' => match number.parse_next(&mut self.remaining) {
                Ok(digits) => Token::new(TokenKind::Literal, digits),
                Err(_) => self.fail(c),
            },
            'd' => match roller_run.parse_next(&mut self.remaining) {
                Ok(run) if run.len() == 1 => Token::new(TokenKind::InfixOperator, run),
                Ok(run) => Token::new(TokenKind::PostfixOperator, run),
                Err(_) => self.fail(c),
            },
            '(' => self.single(TokenKind::OpenParen, c),
            ')' => self.single(TokenKind::CloseParen, c),
            '+' | '-' | '*' | '/' | 'b' | 'w' => self.single(TokenKind::InfixOperator, c),
            '!' => self.single(TokenKind::PostfixOperator, c),
            _ => self.fail(c),
        }
    }

    fn single(&mut self, kind: TokenKind, c: char) -> Token {
        self.remaining = &self.remaining[c.len_utf8()..];
        Token::new(kind, c)
    }

    fn fail(&mut self, character: char) -> Token {
        let error = LexError {
            character,
            offset: self.offset() + 1,
        };
        let token = Token::new(TokenKind::Error, error.to_string());
        self.error = Some(error);
        self.finished = true;
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.detect())
    }
}

/// Digits with an optional fractional part, which is consumed and dropped.
fn number<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (digit1, opt(preceded('.', digit0)))
        .map(|(integer, _fraction): (&'s str, Option<&'s str>)| integer)
        .parse_next(input)
}

/// `d`, `dF`, `d%` and any other run of dice-roller bytes.
fn roller_run<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., ['d', 'F', '%']).parse_next(input)
}

/// Lexes the whole input, failing on the first illegal character.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    for token in lexer.by_ref() {
        if token.kind == TokenKind::Error {
            break;
        }
        tokens.push(token);
    }

    match lexer.error {
        Some(error) => Err(error),
        None => Ok(tokens),
    }
}
