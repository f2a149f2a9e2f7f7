use std::fmt::Display;

use crate::parse::{Ast, NodeId, Piece};

/// Value and per-die breakdown of one evaluated node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub value: i64,
    pub breakdown: Vec<i64>,
}

impl Outcome {
    pub fn new(value: i64, breakdown: Vec<i64>) -> Self {
        Self { value, breakdown }
    }

    /// Literals and arithmetic report their own value as breakdown.
    pub fn single(value: i64) -> Self {
        Self::new(value, vec![value])
    }
}

/// Result of evaluating an [`Ast`] once.
///
/// Outcomes are indexed by [`NodeId`] and kept apart from the tree, so the
/// same tree can be evaluated repeatedly and each evaluation compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub(crate) outcomes: Vec<Option<Outcome>>,
    pub(crate) root: NodeId,
}

impl Evaluation {
    pub fn value(&self) -> i64 {
        self.outcome(self.root).map_or(0, |o| o.value)
    }

    pub fn breakdown(&self) -> &[i64] {
        self.outcome(self.root)
            .map_or(&[][..], |o| o.breakdown.as_slice())
    }

    pub fn outcome(&self, id: NodeId) -> Option<&Outcome> {
        self.outcomes.get(id.0).and_then(Option::as_ref)
    }

    /// Structure with every operator's resolved value, e.g. `((2d6 -> 7)+1 -> 8)`.
    pub fn resolved<'a>(&'a self, ast: &'a Ast) -> Rendering<'a> {
        Rendering {
            ast,
            evaluation: self,
            style: Style::Resolved,
        }
    }

    /// Structure with every operator's breakdown, e.g. `((2d6 [3 4])+1 [8])`.
    pub fn plan<'a>(&'a self, ast: &'a Ast) -> Rendering<'a> {
        Rendering {
            ast,
            evaluation: self,
            style: Style::Plan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Resolved,
    Plan,
}

pub struct Rendering<'a> {
    ast: &'a Ast,
    evaluation: &'a Evaluation,
    style: Style,
}

impl Rendering<'_> {
    fn write_node(&self, f: &mut std::fmt::Formatter<'_>, id: NodeId) -> std::fmt::Result {
        self.ast.walk(id, |piece| match piece {
            Piece::Leaf(value) => write!(f, "{value}"),
            Piece::Open => write!(f, "("),
            Piece::Operator(op) => write!(f, "{op}"),
            Piece::Close(id) => {
                self.write_outcome(f, id)?;
                write!(f, ")")
            }
        })
    }

    fn write_outcome(&self, f: &mut std::fmt::Formatter<'_>, id: NodeId) -> std::fmt::Result {
        let Some(outcome) = self.evaluation.outcome(id) else {
            return write!(f, " ?");
        };

        match self.style {
            Style::Resolved => write!(f, " -> {}", outcome.value),
            Style::Plan => write!(f, " {}", to_notation(&outcome.breakdown)),
        }
    }
}

impl Display for Rendering<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ast.root() {
            Some(root) => self.write_node(f, root),
            None => write!(f, "<nil>"),
        }
    }
}

/// `[3 4 1]`
pub fn to_notation(breakdown: &[i64]) -> String {
    format!(
        "[{}]",
        breakdown
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{InfixOperator, Node};

    fn two_d6_plus_one() -> (Ast, Evaluation) {
        let mut ast = Ast::default();
        let two = ast.push(Node::Leaf(2));
        let six = ast.push(Node::Leaf(6));
        let dice = ast.push(Node::Infix(InfixOperator::Roll, two, six));
        let one = ast.push(Node::Leaf(1));
        let sum = ast.push(Node::Infix(InfixOperator::Add, dice, one));
        ast.set_root(sum);

        let evaluation = Evaluation {
            outcomes: vec![
                Some(Outcome::single(2)),
                Some(Outcome::single(6)),
                Some(Outcome::new(7, vec![3, 4])),
                Some(Outcome::single(1)),
                Some(Outcome::single(8)),
            ],
            root: sum,
        };
        (ast, evaluation)
    }

    #[test]
    fn test_plan() {
        let (ast, evaluation) = two_d6_plus_one();
        assert_eq!(evaluation.plan(&ast).to_string(), "((2d6 [3 4])+1 [8])");
    }

    #[test]
    fn test_resolved() {
        let (ast, evaluation) = two_d6_plus_one();
        assert_eq!(
            evaluation.resolved(&ast).to_string(),
            "((2d6 -> 7)+1 -> 8)"
        );
    }

    #[test]
    fn test_root_accessors() {
        let (_, evaluation) = two_d6_plus_one();
        assert_eq!(evaluation.value(), 8);
        assert_eq!(evaluation.breakdown(), [8]);
        assert_eq!(
            evaluation.outcome(NodeId(2)),
            Some(&Outcome::new(7, vec![3, 4]))
        );
        assert_eq!(evaluation.outcome(NodeId(9)), None);
    }

    #[test]
    fn test_to_notation() {
        assert_eq!(to_notation(&[]), "[]");
        assert_eq!(to_notation(&[-1, 0, 1]), "[-1 0 1]");
    }
}
