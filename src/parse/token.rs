use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Literal,
    InfixOperator,
    PostfixOperator,
    OpenParen,
    CloseParen,
    Error,
    EndOfStream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn end_of_stream() -> Self {
        Self::new(TokenKind::EndOfStream, "")
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            TokenKind::Literal => "lit",
            TokenKind::InfixOperator => "ifo",
            TokenKind::PostfixOperator => "pfo",
            TokenKind::OpenParen => "op",
            TokenKind::CloseParen => "cp",
            TokenKind::Error => "err",
            TokenKind::EndOfStream => "eos",
        };
        write!(f, "{str}")
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
