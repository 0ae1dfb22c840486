//! Sandboxed evaluation of parsed expressions.
//!
//! The only state an expression can see is the namespace it is evaluated
//! against. There are no calls and no assignment, so evaluation cannot have
//! side effects.

use std::collections::BTreeMap;

use thiserror::Error;

use super::parser::{ArithOp, CmpOp, Expr};
use super::value::ExprValue;

/// Names visible to an expression.
pub type Namespace = BTreeMap<String, ExprValue>;

/// Failure while evaluating an expression against one namespace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("unsupported operand types for {op}: {lhs} and {rhs}")]
    Operands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("bad operand type for {op}: {operand}")]
    Operand { op: &'static str, operand: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("{0} has no attribute '{1}'")]
    NoAttribute(&'static str, String),

    #[error("index {0} out of range")]
    IndexOutOfRange(i64),

    #[error("key {0} not found")]
    KeyNotFound(String),
}

type EvalResult = std::result::Result<ExprValue, EvalError>;

/// Evaluate `expr` against `ns`.
pub fn evaluate(expr: &Expr, ns: &Namespace) -> EvalResult {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Name(n) => ns
            .get(n)
            .cloned()
            .ok_or_else(|| EvalError::UnknownName(n.clone())),
        Expr::List(items) => items
            .iter()
            .map(|e| evaluate(e, ns))
            .collect::<Result<Vec<_>, _>>()
            .map(ExprValue::List),
        Expr::Neg(e) => match evaluate(e, ns)? {
            ExprValue::Int(i) => i.checked_neg().map(ExprValue::Int).ok_or(EvalError::Overflow),
            ExprValue::Float(f) => Ok(ExprValue::Float(-f)),
            other => Err(EvalError::Operand {
                op: "unary -",
                operand: other.type_name(),
            }),
        },
        Expr::Not(e) => Ok(ExprValue::Bool(!evaluate(e, ns)?.truthy())),
        Expr::And(a, b) => {
            let lhs = evaluate(a, ns)?;
            if lhs.truthy() {
                evaluate(b, ns)
            } else {
                Ok(lhs)
            }
        }
        Expr::Or(a, b) => {
            let lhs = evaluate(a, ns)?;
            if lhs.truthy() {
                Ok(lhs)
            } else {
                evaluate(b, ns)
            }
        }
        Expr::Arith(op, a, b) => arith(*op, evaluate(a, ns)?, evaluate(b, ns)?),
        Expr::Compare(first, chain) => {
            let mut lhs = evaluate(first, ns)?;
            for (op, next) in chain {
                let rhs = evaluate(next, ns)?;
                if !compare(*op, &lhs, &rhs)? {
                    return Ok(ExprValue::Bool(false));
                }
                lhs = rhs;
            }
            Ok(ExprValue::Bool(true))
        }
        Expr::Attr(e, name) => match evaluate(e, ns)? {
            ExprValue::Map(mut entries) => entries
                .remove(name)
                .ok_or_else(|| EvalError::NoAttribute("map", name.clone())),
            other => Err(EvalError::NoAttribute(other.type_name(), name.clone())),
        },
        Expr::Index(e, index) => index_into(evaluate(e, ns)?, evaluate(index, ns)?),
    }
}

fn arith(op: ArithOp, lhs: ExprValue, rhs: ExprValue) -> EvalResult {
    use ExprValue::{Float, Int, List, Str};

    let symbol = match op {
        ArithOp::Add => "+",
        ArithOp::Sub => "-",
        ArithOp::Mul => "*",
        ArithOp::Div => "/",
        ArithOp::Rem => "%",
    };
    let mismatch = |lhs: &ExprValue, rhs: &ExprValue| EvalError::Operands {
        op: symbol,
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    };

    match (op, &lhs, &rhs) {
        (ArithOp::Add, Str(a), Str(b)) => Ok(Str(format!("{a}{b}"))),
        (ArithOp::Add, List(a), List(b)) => Ok(List(a.iter().chain(b).cloned().collect())),
        (ArithOp::Div, _, _) => {
            let (a, b) = float_pair(&lhs, &rhs).ok_or_else(|| mismatch(&lhs, &rhs))?;
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Float(a / b))
        }
        (_, Int(a), Int(b)) => {
            let (a, b) = (*a, *b);
            let result = match op {
                ArithOp::Add => a.checked_add(b),
                ArithOp::Sub => a.checked_sub(b),
                ArithOp::Mul => a.checked_mul(b),
                ArithOp::Rem => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_rem(b).map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
                }
                ArithOp::Div => None,
            };
            result.map(Int).ok_or(EvalError::Overflow)
        }
        _ => {
            let (a, b) = float_pair(&lhs, &rhs).ok_or_else(|| mismatch(&lhs, &rhs))?;
            match op {
                ArithOp::Add => Ok(Float(a + b)),
                ArithOp::Sub => Ok(Float(a - b)),
                ArithOp::Mul => Ok(Float(a * b)),
                ArithOp::Rem if b == 0.0 => Err(EvalError::DivisionByZero),
                ArithOp::Rem => Ok(Float(a - b * (a / b).floor())),
                ArithOp::Div => Ok(Float(a / b)),
            }
        }
    }
}

fn float_pair(lhs: &ExprValue, rhs: &ExprValue) -> Option<(f64, f64)> {
    let num = |v: &ExprValue| match v {
        ExprValue::Int(i) => Some(*i as f64),
        ExprValue::Float(f) => Some(*f),
        _ => None,
    };
    Some((num(lhs)?, num(rhs)?))
}

fn compare(op: CmpOp, lhs: &ExprValue, rhs: &ExprValue) -> Result<bool, EvalError> {
    let ordered = |symbol: &'static str| {
        lhs.compare(rhs).ok_or(EvalError::Operands {
            op: symbol,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        })
    };
    Ok(match op {
        CmpOp::Eq => lhs.loose_eq(rhs),
        CmpOp::NotEq => !lhs.loose_eq(rhs),
        CmpOp::Is => lhs == rhs,
        CmpOp::IsNot => lhs != rhs,
        CmpOp::Lt => ordered("<")?.is_lt(),
        CmpOp::LtEq => ordered("<=")?.is_le(),
        CmpOp::Gt => ordered(">")?.is_gt(),
        CmpOp::GtEq => ordered(">=")?.is_ge(),
        CmpOp::In => contains(rhs, lhs)?,
        CmpOp::NotIn => !contains(rhs, lhs)?,
    })
}

fn contains(container: &ExprValue, item: &ExprValue) -> Result<bool, EvalError> {
    match (container, item) {
        (ExprValue::List(items), _) => Ok(items.iter().any(|v| v.loose_eq(item))),
        (ExprValue::Str(haystack), ExprValue::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (ExprValue::Map(entries), ExprValue::Str(key)) => Ok(entries.contains_key(key)),
        _ => Err(EvalError::Operands {
            op: "in",
            lhs: item.type_name(),
            rhs: container.type_name(),
        }),
    }
}

fn index_into(target: ExprValue, index: ExprValue) -> EvalResult {
    match (target, index) {
        (ExprValue::List(mut items), ExprValue::Int(i)) => {
            let at = resolve_index(i, items.len()).ok_or(EvalError::IndexOutOfRange(i))?;
            Ok(items.swap_remove(at))
        }
        (ExprValue::Str(s), ExprValue::Int(i)) => {
            let chars: Vec<char> = s.chars().collect();
            let at = resolve_index(i, chars.len()).ok_or(EvalError::IndexOutOfRange(i))?;
            Ok(ExprValue::Str(chars[at].to_string()))
        }
        (ExprValue::Map(mut entries), ExprValue::Str(key)) => entries
            .remove(&key)
            .ok_or_else(|| EvalError::KeyNotFound(format!("{key:?}"))),
        (target, index) => Err(EvalError::Operands {
            op: "[]",
            lhs: target.type_name(),
            rhs: index.type_name(),
        }),
    }
}

fn resolve_index(i: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let at = if i < 0 { len + i } else { i };
    (0..len).contains(&at).then_some(at as usize)
}
