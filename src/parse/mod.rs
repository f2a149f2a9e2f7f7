mod lexer;
mod parser;
mod token;

pub use lexer::*;
pub use parser::*;
pub use token::*;

use std::fmt::Display;

use crate::error::ParseError;

/// Binary operators, written between their operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`\
    /// Integer division, truncating toward zero.
    Div,
    /// `{count}d{sides}`\
    /// Rolls `count` dice with `sides` sides and sums them.
    Roll,
    /// `{keep}b{dice}`\
    /// Keeps the highest `keep` results of the dice pool on the right.
    Best,
    /// `{keep}w{dice}`\
    /// Keeps the lowest `keep` results of the dice pool on the right.
    Worst,
}

/// Unary operators, written after their operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOperator {
    /// `{dice}!`\
    /// Every die that rolled its maximum value adds exactly one bonus roll.
    Explode,
    /// `{count}d%`\
    /// Rolls `count` 100-sided dice.
    Percentile,
    /// `{count}dF`\
    /// Rolls `count` Fudge/Fate dice, each worth -1, 0 or +1.
    Fudge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Infix(InfixOperator),
    Postfix(PostfixOperator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeepKind {
    Highest,
    Lowest,
}

impl InfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Sub => "-",
            InfixOperator::Mul => "*",
            InfixOperator::Div => "/",
            InfixOperator::Roll => "d",
            InfixOperator::Best => "b",
            InfixOperator::Worst => "w",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            InfixOperator::Roll => 3,
            InfixOperator::Best | InfixOperator::Worst => 2,
            InfixOperator::Mul | InfixOperator::Div => 1,
            InfixOperator::Add | InfixOperator::Sub => 0,
        }
    }
}

impl PostfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOperator::Explode => "!",
            PostfixOperator::Percentile => "d%",
            PostfixOperator::Fudge => "dF",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            PostfixOperator::Percentile | PostfixOperator::Fudge => 3,
            PostfixOperator::Explode => 2,
        }
    }
}

impl Operator {
    /// Maps an operator token to the operator it names.
    pub fn from_token(token: &Token) -> Result<Self, ParseError> {
        let operator = match (token.kind, token.value.as_str()) {
            (TokenKind::InfixOperator, "+") => Operator::Infix(InfixOperator::Add),
            (TokenKind::InfixOperator, "-") => Operator::Infix(InfixOperator::Sub),
            (TokenKind::InfixOperator, "*") => Operator::Infix(InfixOperator::Mul),
            (TokenKind::InfixOperator, "/") => Operator::Infix(InfixOperator::Div),
            (TokenKind::InfixOperator, "d") => Operator::Infix(InfixOperator::Roll),
            (TokenKind::InfixOperator, "b") => Operator::Infix(InfixOperator::Best),
            (TokenKind::InfixOperator, "w") => Operator::Infix(InfixOperator::Worst),
            (TokenKind::PostfixOperator, "!") => Operator::Postfix(PostfixOperator::Explode),
            (TokenKind::PostfixOperator, "d%") => Operator::Postfix(PostfixOperator::Percentile),
            (TokenKind::PostfixOperator, "dF") => Operator::Postfix(PostfixOperator::Fudge),
            _ => return Err(ParseError::UnknownOperator(token.to_string())),
        };
        Ok(operator)
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Infix(op) => op.precedence(),
            Operator::Postfix(op) => op.precedence(),
        }
    }

    /// Dice operators default a missing left operand to a single die.
    pub fn rolls_dice(self) -> bool {
        matches!(
            self,
            Operator::Infix(InfixOperator::Roll)
                | Operator::Postfix(PostfixOperator::Percentile | PostfixOperator::Fudge)
        )
    }
}

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Leaf(i64),
    Infix(InfixOperator, NodeId, NodeId),
    Postfix(PostfixOperator, NodeId),
}

/// A parsed expression.
///
/// Nodes live in an arena and refer to their operands by [`NodeId`], so the
/// tree is immutable once parsed and any number of evaluations can be run
/// against it. An empty input parses to an `Ast` without a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn parse(notation: &str) -> Result<Ast, ParseError> {
        Parser::new(notation).parse()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Renders the subtree rooted at `id`.
    pub fn display_node(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { ast: self, id }
    }

    /// Operands must be pushed before the operator using them, the whole
    /// left subtree before the right one.
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }
}

pub struct NodeDisplay<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ast.walk(self.id, |piece| match piece {
            Piece::Leaf(value) => write!(f, "{value}"),
            Piece::Open => write!(f, "("),
            Piece::Operator(op) => write!(f, "{op}"),
            Piece::Close(_) => write!(f, ")"),
        })
    }
}

/// One step of rendering a subtree, in output order.
pub(crate) enum Piece {
    Leaf(i64),
    Open,
    Operator(Operator),
    /// Closes the operator node with this id.
    Close(NodeId),
}

impl Ast {
    /// Visits the subtree rooted at `id` in rendering order with an explicit
    /// stack, so left-deep chains of any length render without recursing.
    pub(crate) fn walk<F>(&self, id: NodeId, mut visit: F) -> std::fmt::Result
    where
        F: FnMut(Piece) -> std::fmt::Result,
    {
        enum Step {
            Enter(NodeId),
            Emit(Piece),
        }

        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Emit(piece) => visit(piece)?,
                Step::Enter(id) => match *self.node(id) {
                    Node::Leaf(value) => visit(Piece::Leaf(value))?,
                    Node::Infix(op, lhs, rhs) => {
                        stack.push(Step::Emit(Piece::Close(id)));
                        stack.push(Step::Enter(rhs));
                        stack.push(Step::Emit(Piece::Operator(Operator::Infix(op))));
                        stack.push(Step::Enter(lhs));
                        visit(Piece::Open)?;
                    }
                    Node::Postfix(op, operand) => {
                        stack.push(Step::Emit(Piece::Close(id)));
                        stack.push(Step::Emit(Piece::Operator(Operator::Postfix(op))));
                        stack.push(Step::Enter(operand));
                        visit(Piece::Open)?;
                    }
                },
            }
        }
        Ok(())
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => write!(f, "{}", self.display_node(root)),
            None => write!(f, "<nil>"),
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for PostfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Infix(op) => write!(f, "{op}"),
            Operator::Postfix(op) => write!(f, "{op}"),
        }
    }
}
