mod dice_roll;
pub(crate) mod expression;
pub(crate) mod roll;

pub use expression::DEFAULT_DICE_LIMIT;
pub use roll::{to_notation, Evaluation, Outcome, Rendering};
