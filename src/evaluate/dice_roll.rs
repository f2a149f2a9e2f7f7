use rand::Rng;

use super::expression::Evaluator;
use super::roll::Outcome;
use crate::error::EvalError;
use crate::parse::{InfixOperator, KeepKind, Node, NodeId};

const PERCENTILE_SIDES: i64 = 100;
const FUDGE_SIDES: i64 = 3;

impl<R: Rng> Evaluator<'_, R> {
    /// Rolls `count` dice in `[1, sides]`, keeping every roll in order.
    pub(crate) fn roll_dice(
        &mut self,
        id: NodeId,
        count: i64,
        sides: i64,
    ) -> Result<Outcome, EvalError> {
        let count = self.dice_count(id, count)?;
        if sides < 1 {
            return Err(EvalError::InvalidSides {
                node: self.describe(id),
                sides,
            });
        }

        let rolls = (0..count).map(|_| self.roll_die(sides)).collect();
        self.sum(id, rolls)
    }

    /// Fudge dice are 3-sided dice shifted down to `{-1, 0, 1}`.
    pub(crate) fn roll_fudge(&mut self, id: NodeId, count: i64) -> Result<Outcome, EvalError> {
        let count = self.dice_count(id, count)?;
        let rolls = (0..count)
            .map(|_| self.roll_die(FUDGE_SIDES) - 2)
            .collect();
        self.sum(id, rolls)
    }

    /// Keeps the highest or lowest `count` entries of `source`'s breakdown,
    /// reported in ascending order.
    pub(crate) fn keep(
        &mut self,
        id: NodeId,
        keep_kind: KeepKind,
        count: i64,
        source: NodeId,
    ) -> Result<Outcome, EvalError> {
        let kind = match keep_kind {
            KeepKind::Highest => "best",
            KeepKind::Lowest => "worst",
        };
        let Ok(amount) = usize::try_from(count) else {
            return Err(EvalError::InvalidKeepCount {
                node: self.describe(id),
                count,
            });
        };

        let mut pool = self.breakdown(source).to_vec();
        if amount > pool.len() {
            return Err(EvalError::NotEnoughDice {
                node: self.describe(id),
                kind,
                count,
                available: pool.len(),
            });
        }

        pool.sort_unstable();
        let kept = match keep_kind {
            KeepKind::Highest => pool.split_off(pool.len() - amount),
            KeepKind::Lowest => {
                pool.truncate(amount);
                pool
            }
        };
        self.sum(id, kept)
    }

    /// Every die of `source` that rolled its maximum adds one bonus roll,
    /// placed right after it. Bonus rolls never explode themselves.
    pub(crate) fn explode(&mut self, id: NodeId, source: NodeId) -> Result<Outcome, EvalError> {
        let sides = match *self.ast.node(source) {
            Node::Leaf(_) => return Err(EvalError::ExplodeLeaf(self.describe(id))),
            Node::Infix(InfixOperator::Roll, _, sides) => self.value(sides),
            Node::Infix(..) | Node::Postfix(..) => {
                return Err(EvalError::ExplodeNonDice(self.describe(id)))
            }
        };

        let rolls = self.breakdown(source).to_vec();
        let mut exploded = Vec::with_capacity(rolls.len() * 2);
        for roll in rolls {
            exploded.push(roll);
            if roll == sides {
                exploded.push(self.roll_die(sides));
            }
        }
        self.sum(id, exploded)
    }

    fn roll_die(&mut self, sides: i64) -> i64 {
        self.rng.gen_range(1..=sides)
    }

    fn dice_count(&self, id: NodeId, count: i64) -> Result<usize, EvalError> {
        if count > i64::from(self.dice_limit) {
            return Err(EvalError::TooManyDice {
                node: self.describe(id),
                count,
                limit: self.dice_limit,
            });
        }
        usize::try_from(count).map_err(|_| EvalError::InvalidDiceCount {
            node: self.describe(id),
            count,
        })
    }
}
