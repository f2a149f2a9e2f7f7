use super::{Ast, Lexer, Node, NodeId, Operator, Token, TokenKind};
use crate::error::ParseError;

/// Parenthesis nesting deeper than this is rejected instead of recursing.
pub const MAX_NESTING: usize = 256;

/// Precedence-climbing parser fed by a [`Lexer`] with one token of lookahead.
pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: Token,
    ast: Ast,
    depth: usize,
}

impl<'s> Parser<'s> {
    pub fn new(input: &'s str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next().unwrap_or_else(Token::end_of_stream);

        Self {
            lexer,
            current,
            ast: Ast::default(),
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Ast, ParseError> {
        if self.current.kind == TokenKind::EndOfStream {
            return Ok(self.ast);
        }

        let root = self.parse_expression(0, true)?;
        match self.current.kind {
            TokenKind::EndOfStream => {
                self.ast.set_root(root);
                Ok(self.ast)
            }
            _ => Err(ParseError::UnmatchedCloseParen),
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.next().unwrap_or_else(Token::end_of_stream);
        std::mem::replace(&mut self.current, next)
    }

    fn lex_error(&self) -> ParseError {
        match self.lexer.error() {
            Some(error) => ParseError::Lex(error.clone()),
            None => ParseError::UnknownOperator(self.current.to_string()),
        }
    }

    /// Parses operators binding at least as tight as `min_precedence`.
    /// `leading` is set at the start of the input or of a parenthesised group.
    fn parse_expression(&mut self, min_precedence: u8, leading: bool) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_operand(leading)?;

        loop {
            match self.current.kind {
                TokenKind::InfixOperator | TokenKind::PostfixOperator => {
                    let operator = Operator::from_token(&self.current)?;
                    if operator.precedence() < min_precedence {
                        break;
                    }
                    self.advance();

                    lhs = match operator {
                        Operator::Postfix(op) => self.ast.push(Node::Postfix(op, lhs)),
                        Operator::Infix(op) => {
                            let rhs = self.parse_expression(op.precedence() + 1, false)?;
                            self.ast.push(Node::Infix(op, lhs, rhs))
                        }
                    };
                }
                TokenKind::Literal | TokenKind::OpenParen => {
                    return Err(ParseError::UnexpectedOperand {
                        previous: self.ast.display_node(lhs).to_string(),
                        found: self.current.value.clone(),
                    });
                }
                TokenKind::CloseParen | TokenKind::EndOfStream => break,
                TokenKind::Error => return Err(self.lex_error()),
            }
        }

        Ok(lhs)
    }

    fn parse_operand(&mut self, leading: bool) -> Result<NodeId, ParseError> {
        match self.current.kind {
            TokenKind::Literal => {
                let token = self.advance();
                let value = token
                    .value
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidLiteral(token.value))?;
                Ok(self.ast.push(Node::Leaf(value)))
            }
            TokenKind::OpenParen => self.parse_group(),
            TokenKind::InfixOperator | TokenKind::PostfixOperator => {
                let operator = Operator::from_token(&self.current)?;
                if leading || operator.rolls_dice() {
                    // The operator stays current and picks this up as its left operand.
                    Ok(self.ast.push(Node::Leaf(1)))
                } else {
                    Err(ParseError::MissingOperand {
                        before: self.current.value.clone(),
                    })
                }
            }
            TokenKind::CloseParen if self.depth == 0 => Err(ParseError::UnmatchedCloseParen),
            TokenKind::CloseParen => Err(ParseError::MissingOperand {
                before: self.current.value.clone(),
            }),
            TokenKind::EndOfStream => Err(ParseError::MissingOperand {
                before: "end of input".to_string(),
            }),
            TokenKind::Error => Err(self.lex_error()),
        }
    }

    fn parse_group(&mut self) -> Result<NodeId, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep(MAX_NESTING));
        }
        self.advance();

        match self.current.kind {
            TokenKind::CloseParen => return Err(ParseError::EmptyGroup),
            TokenKind::EndOfStream => return Err(ParseError::UnmatchedOpenParen),
            _ => {}
        }

        self.depth += 1;
        let inner = self.parse_expression(0, true)?;
        self.depth -= 1;

        match self.current.kind {
            TokenKind::CloseParen => {
                self.advance();
                Ok(inner)
            }
            _ => Err(ParseError::UnmatchedOpenParen),
        }
    }
}
