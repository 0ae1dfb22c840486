//! Recursive-descent parser for row constraint expressions.
//!
//! Precedence, loosest first: `or`/`||`, `and`/`&&`, `not`/`!`, comparison
//! (chained, including `in`, `not in`, `is`, `is not`), `+ -`, `* / %`,
//! unary minus, then attribute and index lookups.

use super::lexer::{Token, TokenKind};
use super::value::ExprValue;
use crate::error::{Result, ValidateError};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
}

/// Expression syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(ExprValue),
    Name(String),
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    /// `a < b <= c` is held as one chain and means `a < b and b <= c`.
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    Attr(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Every free name referenced by the expression.
    pub fn names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Name(n) => out.push(n),
            Expr::List(items) => items.iter().for_each(|e| e.collect_names(out)),
            Expr::Neg(e) | Expr::Not(e) | Expr::Attr(e, _) => e.collect_names(out),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Arith(_, a, b) | Expr::Index(a, b) => {
                a.collect_names(out);
                b.collect_names(out);
            }
            Expr::Compare(first, rest) => {
                first.collect_names(out);
                rest.iter().for_each(|(_, e)| e.collect_names(out));
            }
        }
    }
}

/// Parse a token stream (ending in `Eof`) into an expression.
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or_expr()?;
    if !matches!(parser.peek(), TokenKind::Eof) {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + ahead)
            .or_else(|| self.tokens.last())
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    fn error(&self, message: &str) -> ValidateError {
        let offset = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.start);
        ValidateError::ExpressionSyntax {
            offset,
            message: message.to_string(),
        }
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.and_expr()?;
        while matches!(self.peek(), TokenKind::Or | TokenKind::OrOr) {
            self.advance();
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.not_expr()?;
        while matches!(self.peek(), TokenKind::And | TokenKind::AndAnd) {
            self.advance();
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if matches!(self.peek(), TokenKind::Not | TokenKind::Bang) {
            self.advance();
            return Ok(Expr::Not(Box::new(self.not_expr()?)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        let first = self.additive()?;
        let mut chain = Vec::new();
        while let Some(op) = self.cmp_op() {
            chain.push((op, self.additive()?));
        }
        if chain.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), chain))
        }
    }

    fn cmp_op(&mut self) -> Option<CmpOp> {
        let (op, width) = match (self.peek(), self.peek_at(1)) {
            (TokenKind::EqEq, _) => (CmpOp::Eq, 1),
            (TokenKind::NotEq, _) => (CmpOp::NotEq, 1),
            (TokenKind::Lt, _) => (CmpOp::Lt, 1),
            (TokenKind::LtEq, _) => (CmpOp::LtEq, 1),
            (TokenKind::Gt, _) => (CmpOp::Gt, 1),
            (TokenKind::GtEq, _) => (CmpOp::GtEq, 1),
            (TokenKind::In, _) => (CmpOp::In, 1),
            (TokenKind::Not, TokenKind::In) => (CmpOp::NotIn, 2),
            (TokenKind::Is, TokenKind::Not) => (CmpOp::IsNot, 2),
            (TokenKind::Is, _) => (CmpOp::Is, 1),
            _ => return None,
        };
        self.pos += width;
        Some(op)
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = Expr::Arith(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                TokenKind::Percent => ArithOp::Rem,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Arith(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&TokenKind::Plus) {
            return self.unary();
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    match self.advance() {
                        TokenKind::Ident(name) => expr = Expr::Attr(Box::new(expr), name),
                        _ => return Err(self.error("expected attribute name after '.'")),
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.or_expr()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                TokenKind::LParen => return Err(self.error("function calls are not allowed")),
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let expr = match self.peek().clone() {
            TokenKind::Int(i) => Expr::Literal(ExprValue::Int(i)),
            TokenKind::Float(f) => Expr::Literal(ExprValue::Float(f)),
            TokenKind::Str(s) => Expr::Literal(ExprValue::Str(s)),
            TokenKind::True => Expr::Literal(ExprValue::Bool(true)),
            TokenKind::False => Expr::Literal(ExprValue::Bool(false)),
            TokenKind::None => Expr::Literal(ExprValue::Null),
            TokenKind::Ident(name) => Expr::Name(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.or_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if !self.eat(&TokenKind::RBracket) {
                    loop {
                        items.push(self.or_expr()?);
                        if self.eat(&TokenKind::Comma) {
                            if self.eat(&TokenKind::RBracket) {
                                break;
                            }
                            continue;
                        }
                        self.expect(TokenKind::RBracket, "']' or ','")?;
                        break;
                    }
                }
                return Ok(Expr::List(items));
            }
            TokenKind::Eof => return Err(self.error("unexpected end of expression")),
            _ => return Err(self.error("expected a value")),
        };
        self.advance();
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;

    fn parse_str(source: &str) -> Result<Expr> {
        parse(&tokenize(source)?)
    }

    fn name(n: &str) -> Box<Expr> {
        Box::new(Expr::Name(n.to_string()))
    }

    #[test]
    fn precedence_binds_and_tighter_than_or() {
        let expr = parse_str("a or b and c").unwrap();
        assert_eq!(
            expr,
            Expr::Or(name("a"), Box::new(Expr::And(name("b"), name("c"))))
        );
    }

    #[test]
    fn chained_comparison_and_not_in() {
        let expr = parse_str("0 < x <= 10 and y not in ['a', 'b']").unwrap();
        let Expr::And(lhs, rhs) = expr else {
            panic!("expected and");
        };
        assert!(matches!(*lhs, Expr::Compare(_, ref chain) if chain.len() == 2));
        assert!(matches!(*rhs, Expr::Compare(_, ref chain) if chain[0].0 == CmpOp::NotIn));
    }

    #[test]
    fn postfix_lookups() {
        let expr = parse_str("site.bounds[0]").unwrap();
        assert_eq!(
            expr,
            Expr::Index(
                Box::new(Expr::Attr(name("site"), "bounds".to_string())),
                Box::new(Expr::Literal(ExprValue::Int(0)))
            )
        );
    }

    #[test]
    fn collects_free_names() {
        let expr = parse_str("a + b > limit or a is None").unwrap();
        assert_eq!(expr.names(), vec!["a", "b", "limit"]);
    }

    #[test]
    fn rejects_calls_and_garbage() {
        assert!(parse_str("len(a) > 1").is_err());
        assert!(parse_str("a ==").is_err());
        assert!(parse_str("(a").is_err());
        assert!(parse_str("a b").is_err());
    }
}
