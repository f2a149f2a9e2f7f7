use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::RollError;
use crate::evaluate::{Evaluation, DEFAULT_DICE_LIMIT};
use crate::parse::Ast;

/// Settings for a [`Roller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollerConfig {
    /// Seed for reproducible rolls, the wall clock is used when unset.
    pub seed: Option<i64>,
    /// Most dice a single operator may roll.
    pub dice_limit: u32,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            dice_limit: DEFAULT_DICE_LIMIT,
        }
    }
}

impl RollerConfig {
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_dice_limit(mut self, dice_limit: u32) -> Self {
        self.dice_limit = dice_limit;
        self
    }
}

/// The total of a roll and the plan showing how it came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rolled {
    value: i64,
    plan: String,
    breakdown: Vec<i64>,
}

impl Rolled {
    pub fn new(ast: &Ast, evaluation: &Evaluation) -> Self {
        Self {
            value: evaluation.value(),
            plan: evaluation.plan(ast).to_string(),
            breakdown: evaluation.breakdown().to_vec(),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// Breakdown of the outermost operator.
    pub fn breakdown(&self) -> &[i64] {
        &self.breakdown
    }
}

impl Display for Rolled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.value, self.plan)
    }
}

/// Rolls expressions one after another from a single random stream.
///
/// Not meant to be shared between threads: give each thread its own roller.
#[derive(Debug, Clone)]
pub struct Roller {
    rng: StdRng,
    dice_limit: u32,
}

impl Roller {
    /// Seeds the roller from the wall clock.
    pub fn new() -> Self {
        Self::with_config(RollerConfig::default())
    }

    /// Two rollers with the same seed roll the same sequence of results.
    /// Negative seeds are as valid as positive ones.
    pub fn seeded(seed: i64) -> Self {
        Self::with_config(RollerConfig::default().with_seed(seed))
    }

    pub fn with_config(config: RollerConfig) -> Self {
        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        Self {
            rng: StdRng::seed_from_u64(seed as u64),
            dice_limit: config.dice_limit,
        }
    }

    pub fn roll(&mut self, notation: &str) -> Result<Rolled, RollError> {
        roll_limited(notation, &mut self.rng, self.dice_limit)
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::new()
    }
}

fn wall_clock_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or_default()
}

/// Drops spaces, tabs and newlines, which the lexer does not accept.
pub fn normalize(notation: &str) -> String {
    notation.chars().filter(|c| !c.is_whitespace()).collect()
}

pub(crate) fn roll_limited(
    notation: &str,
    rng: &mut impl Rng,
    dice_limit: u32,
) -> Result<Rolled, RollError> {
    let ast = Ast::parse(&normalize(notation))?;
    let evaluation = ast.evaluate_with_limit(rng, dice_limit)?;
    Ok(Rolled::new(&ast, &evaluation))
}
