//! Row constraint expression language.
//!
//! A tiny whitelisted language for side-input row constraints: literals,
//! names, arithmetic, chained comparison, membership, boolean operators and
//! attribute/index lookups. Function calls and assignment do not exist in
//! the grammar, so an expression can only read the namespace it is given.
//!
//! Tokenizing uses winnow; parsing is a small recursive descent over tokens.

pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use eval::{EvalError, Namespace};
pub use parser::Expr;
pub use value::ExprValue;

use crate::error::Result;

/// A parsed expression together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    /// Parse `source`, failing with an offset-tagged syntax error.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = lexer::tokenize(source)?;
        let ast = parser::parse(&tokens)?;
        Ok(Self {
            source: source.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Free names referenced by the expression.
    pub fn names(&self) -> Vec<&str> {
        self.ast.names()
    }

    /// Evaluate against a namespace.
    pub fn evaluate(&self, ns: &Namespace) -> std::result::Result<ExprValue, EvalError> {
        eval::evaluate(&self.ast, ns)
    }

    /// Evaluate and apply truthiness.
    pub fn test(&self, ns: &Namespace) -> std::result::Result<bool, EvalError> {
        self.evaluate(ns).map(|v| v.truthy())
    }
}
