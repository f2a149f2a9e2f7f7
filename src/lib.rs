//! Lex, parse and roll tabletop dice notation.
//!
//! ```rust
//! # use dice_notation::{parse, roll, roll_with, Roller};
//! # use rand::rngs::StdRng;
//! # use rand::SeedableRng;
//! #
//! # fn main() -> Result<(), dice_notation::RollError> {
//! // Roll 4 d6 and keep the best 3.
//! let rolled = roll("3b4d6")?;
//! println!("{rolled}"); // 13 : (3b(4d6 [2 6 1 5]) [2 5 6])
//!
//! // Use a custom Rng that implements the rand::Rng trait
//! let mut rng = StdRng::seed_from_u64(1);
//! let rolled = roll_with("2d6! + 1", &mut rng)?;
//! println!("{} = {}", rolled.plan(), rolled.value());
//!
//! // A roller owns its random stream, seeded ones repeat the same results.
//! let mut roller = Roller::seeded(7);
//! assert_eq!(roller.roll("(1+3)*7")?.value(), 28);
//!
//! // Parse once, evaluate as often as needed.
//! let ast = parse("4dF")?;
//! let evaluation = ast.evaluate(&mut rng)?;
//! println!("{}", evaluation.resolved(&ast)); // ((4dF) -> -1)
//! # Ok(())
//! # }
//! ```

mod error;
mod evaluate;
mod parse;
mod roller;

pub use error::{EvalError, LexError, ParseError, RollError};
pub use evaluate::{to_notation, Evaluation, Outcome, Rendering, DEFAULT_DICE_LIMIT};
pub use parse::{
    tokenize, Ast, InfixOperator, KeepKind, Lexer, Node, NodeDisplay, NodeId, Operator, Parser,
    PostfixOperator, Token, TokenKind, MAX_NESTING,
};
pub use roller::{normalize, Rolled, Roller, RollerConfig};

/// Parses the notation returning the abstract syntax tree without rolling
/// the dice. Whitespace is ignored.
pub fn parse(notation: &str) -> Result<Ast, ParseError> {
    Ast::parse(&normalize(notation))
}

/// Parses the notation returning the result of rolling all the dice parsed.
pub fn roll(notation: &str) -> Result<Rolled, RollError> {
    roll_with(notation, &mut rand::thread_rng())
}

/// Same as `roll()` but allows you to choose the rng you prefer to use.
pub fn roll_with(notation: &str, rng: &mut impl rand::Rng) -> Result<Rolled, RollError> {
    roller::roll_limited(notation, rng, DEFAULT_DICE_LIMIT)
}
