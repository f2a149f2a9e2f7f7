use thiserror::Error;

/// The lexer met a byte it has no state for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unhandled char: {character} @ offset {offset}")]
pub struct LexError {
    pub character: char,
    /// 1-based byte offset of the offending character.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("parse error: unexpected {found} after {previous}")]
    UnexpectedOperand { previous: String, found: String },
    #[error("parse error: missing operand before {before}")]
    MissingOperand { before: String },
    #[error("parse error: invalid literal {0}")]
    InvalidLiteral(String),
    #[error("unregistered operator: {0}")]
    UnknownOperator(String),
    #[error("parse error: unmatched '('")]
    UnmatchedOpenParen,
    #[error("parse error: unmatched ')'")]
    UnmatchedCloseParen,
    #[error("parse error: empty parenthesis")]
    EmptyGroup,
    #[error("parse error: parenthesis nested deeper than {0}")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("nil node")]
    NilNode,
    #[error("divide by zero in {0}")]
    DivideByZero(String),
    #[error("integer overflow in {0}")]
    Overflow(String),
    #[error("{node} can't roll {count} dice")]
    InvalidDiceCount { node: String, count: i64 },
    #[error("{node} can't roll more than {limit} dice, got {count}")]
    TooManyDice { node: String, count: i64, limit: u32 },
    #[error("{node} can't roll a die with {sides} sides")]
    InvalidSides { node: String, sides: i64 },
    #[error("{node} can't keep {count} items")]
    InvalidKeepCount { node: String, count: i64 },
    #[error("{node} can't gather {count} {kind} items from a slice of {available} items")]
    NotEnoughDice {
        node: String,
        kind: &'static str,
        count: i64,
        available: usize,
    },
    #[error("{0} - can't explode a leaf node")]
    ExplodeLeaf(String),
    #[error("{0} - can't explode a non die expression")]
    ExplodeNonDice(String),
}

/// Failure of any stage of a single roll.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<LexError> for RollError {
    fn from(err: LexError) -> Self {
        RollError::Parse(ParseError::Lex(err))
    }
}
