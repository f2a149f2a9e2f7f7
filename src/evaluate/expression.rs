use rand::Rng;

use super::roll::{Evaluation, Outcome};
use crate::error::EvalError;
use crate::parse::{Ast, InfixOperator, KeepKind, Node, NodeId, PostfixOperator};

/// Dice rolled by a single operator are capped at this many by default.
pub const DEFAULT_DICE_LIMIT: u32 = 999;

impl Ast {
    /// Rolls every die in the expression with `rng`, left operand before right.
    pub fn evaluate(&self, rng: &mut impl Rng) -> Result<Evaluation, EvalError> {
        self.evaluate_with_limit(rng, DEFAULT_DICE_LIMIT)
    }

    /// Same as `evaluate()` with a custom cap on dice per operator.
    pub fn evaluate_with_limit(
        &self,
        rng: &mut impl Rng,
        dice_limit: u32,
    ) -> Result<Evaluation, EvalError> {
        let root = self.root().ok_or(EvalError::NilNode)?;
        let mut evaluator = Evaluator {
            ast: self,
            rng,
            outcomes: vec![None; self.len()],
            dice_limit,
        };
        // Operands sit before their operator and left subtrees before right
        // ones, so a forward pass matches the left-to-right draw order.
        for index in 0..=root.0 {
            evaluator.eval(NodeId(index))?;
        }

        Ok(Evaluation {
            outcomes: evaluator.outcomes,
            root,
        })
    }
}

pub(crate) struct Evaluator<'a, R: Rng> {
    pub(crate) ast: &'a Ast,
    pub(crate) rng: &'a mut R,
    pub(crate) outcomes: Vec<Option<Outcome>>,
    pub(crate) dice_limit: u32,
}

impl<R: Rng> Evaluator<'_, R> {
    /// Evaluates a single node whose operands are already resolved.
    fn eval(&mut self, id: NodeId) -> Result<(), EvalError> {
        let outcome = match *self.ast.node(id) {
            Node::Leaf(value) => Outcome::single(value),
            Node::Infix(op, lhs, rhs) => self.eval_infix(id, op, lhs, rhs)?,
            Node::Postfix(op, operand) => self.eval_postfix(id, op, operand)?,
        };

        self.outcomes[id.0] = Some(outcome);
        Ok(())
    }

    fn eval_infix(
        &mut self,
        id: NodeId,
        op: InfixOperator,
        lhs: NodeId,
        rhs: NodeId,
    ) -> Result<Outcome, EvalError> {
        let left = self.value(lhs);
        let right = self.value(rhs);

        match op {
            InfixOperator::Add => self.arithmetic(id, left.checked_add(right)),
            InfixOperator::Sub => self.arithmetic(id, left.checked_sub(right)),
            InfixOperator::Mul => self.arithmetic(id, left.checked_mul(right)),
            InfixOperator::Div => {
                if right == 0 {
                    return Err(EvalError::DivideByZero(self.describe(id)));
                }
                self.arithmetic(id, left.checked_div(right))
            }
            InfixOperator::Roll => self.roll_dice(id, left, right),
            InfixOperator::Best => self.keep(id, KeepKind::Highest, left, rhs),
            InfixOperator::Worst => self.keep(id, KeepKind::Lowest, left, rhs),
        }
    }

    fn eval_postfix(
        &mut self,
        id: NodeId,
        op: PostfixOperator,
        operand: NodeId,
    ) -> Result<Outcome, EvalError> {
        let count = self.value(operand);

        match op {
            PostfixOperator::Explode => self.explode(id, operand),
            PostfixOperator::Percentile => self.roll_dice(id, count, 100),
            PostfixOperator::Fudge => self.roll_fudge(id, count),
        }
    }

    fn arithmetic(&self, id: NodeId, result: Option<i64>) -> Result<Outcome, EvalError> {
        result
            .map(Outcome::single)
            .ok_or_else(|| EvalError::Overflow(self.describe(id)))
    }

    pub(crate) fn value(&self, id: NodeId) -> i64 {
        self.outcomes[id.0].as_ref().map_or(0, |o| o.value)
    }

    pub(crate) fn breakdown(&self, id: NodeId) -> &[i64] {
        self.outcomes[id.0]
            .as_ref()
            .map_or(&[][..], |o| o.breakdown.as_slice())
    }

    pub(crate) fn describe(&self, id: NodeId) -> String {
        self.ast.display_node(id).to_string()
    }

    pub(crate) fn sum(&self, id: NodeId, breakdown: Vec<i64>) -> Result<Outcome, EvalError> {
        let value = breakdown
            .iter()
            .try_fold(0i64, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| EvalError::Overflow(self.describe(id)))?;
        Ok(Outcome::new(value, breakdown))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn evaluate(input: &str) -> Result<Evaluation, EvalError> {
        Ast::parse(input).unwrap().evaluate(&mut test_rng())
    }

    fn value(input: &str) -> i64 {
        evaluate(input).unwrap().value()
    }

    #[test]
    fn test_arithmetic() {
        #[rustfmt::skip]
        let inputs = [
            ("1", 1),
            ("1+3", 4),
            ("1*3", 3),
            ("4/2", 2),
            ("7/3", 2),
            ("1+3*7", 22),
            ("(1+3)*7", 28),
            ("8-2-1", 5),
            ("2-7", -5),
            ("-3", -2),
            ("0+0", 0),
            ("101+1", 102),
            ("7.3+1.9", 8),
        ];

        for (input, expected) in inputs {
            assert_eq!(value(input), expected, "{input}");
        }
    }

    #[test]
    fn test_arithmetic_breakdown_is_result() {
        let evaluation = evaluate("(1+3)*7").unwrap();
        assert_eq!(evaluation.breakdown(), [28]);

        let evaluation = evaluate("5").unwrap();
        assert_eq!(evaluation.breakdown(), [5]);
    }

    #[test]
    fn test_nil_node() {
        let err = evaluate("").unwrap_err();
        assert_eq!(err, EvalError::NilNode);
        assert_eq!(err.to_string(), "nil node");
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            evaluate("4/0"),
            Err(EvalError::DivideByZero("(4/0)".to_string()))
        );
        assert_eq!(
            evaluate("1+4/(2-2)").unwrap_err().to_string(),
            "divide by zero in (4/(2-2))"
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            evaluate("9223372036854775807+1"),
            Err(EvalError::Overflow("(9223372036854775807+1)".to_string()))
        );
        assert!(matches!(
            evaluate("4611686018427387904*2"),
            Err(EvalError::Overflow(_))
        ));
    }

    #[test]
    fn test_dice_limit() {
        let ast = Ast::parse("11d6").unwrap();
        assert!(ast.evaluate_with_limit(&mut test_rng(), 11).is_ok());
        assert_eq!(
            ast.evaluate_with_limit(&mut test_rng(), 10),
            Err(EvalError::TooManyDice {
                node: "(11d6)".to_string(),
                count: 11,
                limit: 10
            })
        );
    }

    #[test]
    fn test_leaf_outcomes_are_recorded() {
        let ast = Ast::parse("3d6").unwrap();
        let evaluation = ast.evaluate(&mut test_rng()).unwrap();
        let Node::Infix(_, lhs, rhs) = *ast.node(ast.root().unwrap()) else {
            panic!("expected infix root");
        };
        assert_eq!(evaluation.outcome(lhs), Some(&Outcome::single(3)));
        assert_eq!(evaluation.outcome(rhs), Some(&Outcome::single(6)));
    }

    #[test]
    fn test_same_seed_same_evaluation() {
        let ast = Ast::parse("3b4d6+2d6!-1w3d8+4dF+d%").unwrap();
        let first = ast.evaluate(&mut test_rng()).unwrap();
        let second = ast.evaluate(&mut test_rng()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.plan(&ast).to_string(), second.plan(&ast).to_string());
    }

    #[test]
    fn test_reevaluation_draws_fresh_rolls() {
        let ast = Ast::parse("20d20").unwrap();
        let mut rng = test_rng();
        let first = ast.evaluate(&mut rng).unwrap();
        let second = ast.evaluate(&mut rng).unwrap();
        assert_ne!(first.breakdown(), second.breakdown());
    }

    #[test]
    fn test_left_operand_draws_first() {
        let ast = Ast::parse("1d6+1d20").unwrap();
        let evaluation = ast.evaluate(&mut test_rng()).unwrap();
        let Node::Infix(_, lhs, rhs) = *ast.node(ast.root().unwrap()) else {
            panic!("expected infix root");
        };

        let mut rng = test_rng();
        let first = rng.gen_range(1..=6i64);
        let second = rng.gen_range(1..=20i64);
        assert_eq!(evaluation.outcome(lhs).unwrap().breakdown, [first]);
        assert_eq!(evaluation.outcome(rhs).unwrap().breakdown, [second]);
    }

    #[test]
    fn test_long_chain() {
        let input = vec!["1"; 100_000].join("+");
        let ast = Ast::parse(&input).unwrap();
        let evaluation = ast.evaluate(&mut test_rng()).unwrap();
        assert_eq!(evaluation.value(), 100_000);

        let plan = evaluation.plan(&ast).to_string();
        assert!(plan
            .trim_start_matches('(')
            .starts_with("1+1 [2])+1 [3])+1 [4])"));
        assert!(plan.ends_with("+1 [100000])"));
        assert!(ast.to_string().ends_with("+1)"));
    }

    #[test]
    fn test_long_chain_error_message() {
        let input = format!("{}/0", vec!["1"; 50_000].join("*"));
        let err = Ast::parse(&input)
            .unwrap()
            .evaluate(&mut test_rng())
            .unwrap_err();
        let EvalError::DivideByZero(node) = err else {
            panic!("expected divide by zero, got {err:?}");
        };
        assert!(node.ends_with("*1)/0)"));
    }
}
