//! Builtin operator rules
//!
//! Each rule takes evaluated operands and decides coercion on its own:
//! - `+` adds when both sides are numeric and concatenates text otherwise
//! - `-`, `*`, `/`, `%`, `^` and the unary signs are numeric only
//! - `||` concatenates arrays structurally and everything else as text
//! - comparisons are numeric when both sides are numeric, textual otherwise
//! - `and`, `or`, `not` work on truthiness
//! - `in` tests membership in an array
//!
//! # Examples
//! ```text
//! "2" + 3         = 5
//! "2 " + 3        = "2 3"
//! 2 || 3          = "23"
//! "10" > "9"      = true
//! "b" > "a"       = true
//! 2 in [1, 2]     = true
//! ```

use crate::error::{RuntimeError, ShuntError};
use crate::token::TokenKind;
use crate::value::Value;
use crate::ShuntResult;
use std::cmp::Ordering;

/// Apply a prefix operator
pub fn unary_operation(op: TokenKind, operand: &Value) -> ShuntResult<Value> {
    match op {
        TokenKind::UnaryPlus => Ok(Value::Number(number(op, operand)?)),
        TokenKind::UnaryMinus => Ok(Value::Number(-number(op, operand)?)),
        TokenKind::Not => Ok(Value::Boolean(!operand.is_truthy())),
        _ => Err(not_applicable(op, "prefix")),
    }
}

/// Apply an infix operator
pub fn binary_operation(op: TokenKind, lhs: &Value, rhs: &Value) -> ShuntResult<Value> {
    match op {
        TokenKind::Plus => add(lhs, rhs),
        TokenKind::Minus
        | TokenKind::Times
        | TokenKind::Div
        | TokenKind::Mod
        | TokenKind::Pow => {
            let l = number(op, lhs)?;
            let r = number(op, rhs)?;
            Ok(Value::Number(number_arithmetic(l, op, r)?))
        }
        TokenKind::Concat => Ok(concat(lhs, rhs)),
        TokenKind::Equal
        | TokenKind::NotEqual
        | TokenKind::Greater
        | TokenKind::Less
        | TokenKind::GreaterEqual
        | TokenKind::LessEqual => Ok(Value::Boolean(comparison_operation(lhs, op, rhs))),
        TokenKind::And => Ok(Value::Boolean(lhs.is_truthy() && rhs.is_truthy())),
        TokenKind::Or => Ok(Value::Boolean(lhs.is_truthy() || rhs.is_truthy())),
        TokenKind::In => membership(lhs, rhs),
        _ => Err(not_applicable(op, "infix")),
    }
}

fn not_applicable(op: TokenKind, position: &str) -> ShuntError {
    ShuntError::runtime(
        RuntimeError::UnsupportedOperator(op),
        format!("{} is not a {} operator", op, position),
    )
}

/// Numeric view of an operand, or an `InvalidOperand` error naming the operator
fn number(op: TokenKind, value: &Value) -> ShuntResult<f64> {
    value.as_number().ok_or_else(|| {
        ShuntError::runtime(
            RuntimeError::InvalidOperand,
            format!(
                "operator '{}' expects a number, got {} {}",
                op.symbol(),
                value.type_name(),
                describe(value)
            ),
        )
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

fn add(lhs: &Value, rhs: &Value) -> ShuntResult<Value> {
    if let Value::Array(_) = lhs {
        return Err(array_operand(TokenKind::Plus));
    }
    if let Value::Array(_) = rhs {
        return Err(array_operand(TokenKind::Plus));
    }
    match (lhs.as_number(), rhs.as_number()) {
        (Some(l), Some(r)) => Ok(Value::Number(l + r)),
        _ => Ok(Value::Text(lhs.to_text() + &rhs.to_text())),
    }
}

fn array_operand(op: TokenKind) -> ShuntError {
    ShuntError::runtime(
        RuntimeError::InvalidOperand,
        format!("operator '{}' cannot be applied to an array", op.symbol()),
    )
    .with_suggestion("use || to concatenate arrays")
}

/// Perform basic number arithmetic
fn number_arithmetic(left: f64, op: TokenKind, right: f64) -> ShuntResult<f64> {
    let result = match op {
        TokenKind::Minus => left - right,
        TokenKind::Times => left * right,
        TokenKind::Div => {
            if right == 0.0 {
                return Err(ShuntError::runtime(
                    RuntimeError::DivisionByZero,
                    "division by zero",
                ));
            }
            left / right
        }
        TokenKind::Mod => {
            if right == 0.0 {
                return Err(ShuntError::runtime(
                    RuntimeError::ModulusByZero,
                    "modulus by zero",
                ));
            }
            left % right
        }
        TokenKind::Pow => left.powf(right),
        _ => return Err(not_applicable(op, "numeric")),
    };
    Ok(result)
}

fn concat(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Array(l), Value::Array(r)) => Value::Array(l.concat(r)),
        _ => Value::Text(lhs.to_text() + &rhs.to_text()),
    }
}

/// Perform a comparison.
///
/// Two numeric operands compare as numbers, two arrays compare structurally
/// for equality, and everything else compares by text form.
pub fn comparison_operation(lhs: &Value, op: TokenKind, rhs: &Value) -> bool {
    if let (Value::Array(l), Value::Array(r)) = (lhs, rhs) {
        match op {
            TokenKind::Equal => return l == r,
            TokenKind::NotEqual => return l != r,
            _ => {}
        }
    }
    match compare(lhs, rhs) {
        Some(ordering) => matches_ordering(op, ordering),
        // NaN on either side: only `<>` holds
        None => op == TokenKind::NotEqual,
    }
}

fn matches_ordering(op: TokenKind, ordering: Ordering) -> bool {
    match op {
        TokenKind::Equal => ordering == Ordering::Equal,
        TokenKind::NotEqual => ordering != Ordering::Equal,
        TokenKind::Greater => ordering == Ordering::Greater,
        TokenKind::Less => ordering == Ordering::Less,
        TokenKind::GreaterEqual => ordering != Ordering::Less,
        TokenKind::LessEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Ordering used by comparisons and by `min`/`max`
pub fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => Some(lhs.to_text().cmp(&rhs.to_text())),
    }
}

fn membership(needle: &Value, haystack: &Value) -> ShuntResult<Value> {
    let array = haystack.as_array().ok_or_else(|| {
        ShuntError::runtime(
            RuntimeError::InvalidOperand,
            format!(
                "right operand of 'in' must be an array, got {}",
                haystack.type_name()
            ),
        )
    })?;
    let found = array
        .values()
        .any(|candidate| comparison_operation(needle, TokenKind::Equal, candidate));
    Ok(Value::Boolean(found))
}

/// Key under which a value is stored in an array
pub fn array_key(value: &Value) -> ShuntResult<String> {
    match value {
        Value::Array(_) => Err(ShuntError::runtime(
            RuntimeError::InvalidOperand,
            "an array cannot be used as an array key",
        )),
        other => Ok(other.to_text()),
    }
}
