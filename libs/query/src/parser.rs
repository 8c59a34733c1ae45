//! Pool query parser
//!
//! Recursive descent over the lexer's tokens:
//!
//! ```text
//! sequence := unary ( (AND | OR | NOT) unary | unary )*
//! unary    := NOT unary | primary
//! primary  := FIELD '{' sequence? '}' | '(' sequence? ')' | WORD | PHRASE
//! ```

use crate::ast::{BoolOp, Expr, Field};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

const MAX_DEPTH: usize = 64;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

/// Parse a pool query into an expression tree.
pub fn parse(query: &str) -> Result<Expr> {
    Parser::new(query)?.parse()
}

impl Parser {
    pub fn new(query: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(query).tokenize()?,
            position: 0,
            depth: 0,
        })
    }

    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_sequence()?;
        let token = self.current();
        if token.kind != TokenKind::Eof {
            return Err(Error::malformed(
                token.pos,
                format!("unexpected {}", token.describe()),
            ));
        }
        Ok(expr)
    }

    fn current(&self) -> &Token {
        // The token stream always ends with Eof and we never advance past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn at_sequence_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Eof | TokenKind::RBrace | TokenKind::RParen
        )
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::malformed(
                self.current().pos,
                format!("query nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn parse_sequence(&mut self) -> Result<Expr> {
        if self.at_sequence_end() {
            return Ok(Expr::Empty);
        }

        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        while !self.at_sequence_end() {
            let op = match self.current().kind {
                TokenKind::And => Some(BoolOp::And),
                TokenKind::Or => Some(BoolOp::Or),
                TokenKind::Not => Some(BoolOp::Not),
                _ => None,
            };

            if let Some(op) = op {
                let op_token = self.advance();
                if self.at_sequence_end() {
                    return Err(Error::malformed(
                        op_token.pos,
                        format!("{} is missing its right-hand operand", op.as_str()),
                    ));
                }
            }
            rest.push((op, self.parse_unary()?));
        }

        if rest.is_empty() {
            return Ok(first);
        }
        Ok(Expr::Chain {
            first: Box::new(first),
            rest,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.current().kind == TokenKind::Not {
            let not = self.advance();
            if self.at_sequence_end() {
                return Err(Error::malformed(not.pos, "NOT is missing its operand"));
            }
            self.enter()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Word(word) => Ok(Expr::Term(word)),
            TokenKind::Phrase(text) => Ok(Expr::Phrase(text)),
            TokenKind::Field(name) => {
                let field = Field::parse(&name).ok_or(Error::UnknownField(name))?;
                let open = self.advance();
                if open.kind != TokenKind::LBrace {
                    return Err(Error::malformed(
                        open.pos,
                        format!("expected '{{' after '{}:'", field.as_str()),
                    ));
                }
                let body = self.parse_enclosed(&open, TokenKind::RBrace)?;
                Ok(Expr::Scoped {
                    field,
                    body: Box::new(body),
                })
            }
            TokenKind::LParen => {
                let body = self.parse_enclosed(&token, TokenKind::RParen)?;
                Ok(Expr::Group(Box::new(body)))
            }
            // A bare brace group behaves like parentheses.
            TokenKind::LBrace => {
                let body = self.parse_enclosed(&token, TokenKind::RBrace)?;
                Ok(Expr::Group(Box::new(body)))
            }
            TokenKind::And | TokenKind::Or => Err(Error::malformed(
                token.pos,
                format!("{} is missing its left-hand operand", token.describe()),
            )),
            _ => Err(Error::malformed(
                token.pos,
                format!("unexpected {}", token.describe()),
            )),
        }
    }

    fn parse_enclosed(&mut self, open: &Token, close: TokenKind) -> Result<Expr> {
        self.enter()?;
        let body = self.parse_sequence()?;
        self.depth -= 1;

        let end = self.advance();
        if end.kind == close {
            return Ok(body);
        }
        let message = if end.kind == TokenKind::Eof {
            format!("unterminated {} group", open.describe())
        } else {
            format!("{} closed by {}", open.describe(), end.describe())
        };
        Err(Error::malformed(open.pos, message))
    }
}
