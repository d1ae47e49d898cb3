use crate::error::RuntimeError;
use crate::evaluator::operations::{
    array_key, binary_operation, compare, comparison_operation, unary_operation,
};
use crate::token::TokenKind;
use crate::value::{Array, Value};
use std::cmp::Ordering;

fn text(s: &str) -> Value {
    Value::from(s)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_plus_adds_numeric_operands() {
    assert_eq!(binary_operation(TokenKind::Plus, &num(2.0), &num(3.0)).unwrap(), num(5.0));
    assert_eq!(binary_operation(TokenKind::Plus, &text("2"), &num(3.0)).unwrap(), num(5.0));
    assert_eq!(binary_operation(TokenKind::Plus, &text("2"), &text("3")).unwrap(), num(5.0));
    assert_eq!(binary_operation(TokenKind::Plus, &Value::Boolean(true), &num(1.0)).unwrap(), num(2.0));
    assert_eq!(binary_operation(TokenKind::Plus, &Value::Null, &num(7.0)).unwrap(), num(7.0));
}

#[test]
fn test_plus_concatenates_other_text() {
    assert_eq!(binary_operation(TokenKind::Plus, &text("2 "), &num(3.0)).unwrap(), text("2 3"));
    assert_eq!(binary_operation(TokenKind::Plus, &text("2a"), &text("3")).unwrap(), text("2a3"));
    assert_eq!(
        binary_operation(TokenKind::Plus, &text("hello"), &text("my honey")).unwrap(),
        text("hellomy honey")
    );
    assert_eq!(binary_operation(TokenKind::Plus, &text("a"), &Value::Null).unwrap(), text("a"));
}

#[test]
fn test_plus_rejects_arrays() {
    let array = Value::from(vec![num(1.0)]);
    let err = binary_operation(TokenKind::Plus, &array, &num(1.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::InvalidOperand));
    assert!(err.details().unwrap().suggestion.is_some());
}

#[test]
fn test_numeric_operators_reject_text() {
    for op in [TokenKind::Minus, TokenKind::Times, TokenKind::Div, TokenKind::Mod, TokenKind::Pow] {
        let err = binary_operation(op, &text("abc"), &num(1.0)).unwrap_err();
        assert_eq!(err.runtime_kind(), Some(&RuntimeError::InvalidOperand), "for {}", op);
    }
    let err = unary_operation(TokenKind::UnaryMinus, &text("x")).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::InvalidOperand));
}

#[test]
fn test_division_and_modulus_by_zero() {
    let err = binary_operation(TokenKind::Div, &num(100.0), &num(0.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::DivisionByZero));
    let err = binary_operation(TokenKind::Mod, &num(100.0), &num(0.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::ModulusByZero));
    let err = binary_operation(TokenKind::Div, &num(1.0), &num(-0.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::DivisionByZero));
}

#[test]
fn test_modulus_keeps_dividend_sign() {
    assert_eq!(binary_operation(TokenKind::Mod, &num(-7.0), &num(3.0)).unwrap(), num(-1.0));
    assert_eq!(binary_operation(TokenKind::Mod, &num(7.5), &num(2.0)).unwrap(), num(1.5));
}

#[test]
fn test_unary_operators() {
    assert_eq!(unary_operation(TokenKind::UnaryMinus, &text("4")).unwrap(), num(-4.0));
    assert_eq!(unary_operation(TokenKind::UnaryPlus, &Value::Boolean(true)).unwrap(), num(1.0));
    assert_eq!(unary_operation(TokenKind::Not, &text("")).unwrap(), Value::Boolean(true));
    let err = unary_operation(TokenKind::Times, &num(1.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::UnsupportedOperator(TokenKind::Times)));
}

#[test]
fn test_concat() {
    assert_eq!(binary_operation(TokenKind::Concat, &num(2.0), &num(3.0)).unwrap(), text("23"));
    assert_eq!(binary_operation(TokenKind::Concat, &Value::Boolean(true), &Value::Null).unwrap(), text("true"));

    let mut left = Array::new();
    left.push(num(1.0));
    left.insert("k", num(2.0));
    let mut right = Array::new();
    right.insert("k", num(3.0));
    right.push(num(4.0));
    let joined = binary_operation(
        TokenKind::Concat,
        &Value::Array(left),
        &Value::Array(right),
    )
    .unwrap();

    let mut expected = Array::new();
    expected.push(num(1.0));
    expected.insert("k", num(3.0));
    expected.push(num(4.0));
    assert_eq!(joined, Value::Array(expected));
}

#[test]
fn test_comparisons() {
    assert!(comparison_operation(&text("10"), TokenKind::Greater, &text("9")));
    assert!(comparison_operation(&text("b"), TokenKind::Greater, &text("a")));
    assert!(comparison_operation(&text("abc"), TokenKind::Equal, &text("abc")));
    assert!(comparison_operation(&num(57.0), TokenKind::Equal, &text("57")));
    assert!(comparison_operation(&num(1.0), TokenKind::LessEqual, &num(1.0)));
    assert!(comparison_operation(&num(1.0), TokenKind::NotEqual, &num(2.0)));
    assert!(!comparison_operation(&num(1.0), TokenKind::GreaterEqual, &num(2.0)));
    assert!(comparison_operation(&Value::Null, TokenKind::Equal, &num(0.0)));
}

#[test]
fn test_nan_is_only_not_equal() {
    let nan = num(f64::NAN);
    assert!(!comparison_operation(&nan, TokenKind::Equal, &nan));
    assert!(!comparison_operation(&nan, TokenKind::Less, &num(1.0)));
    assert!(comparison_operation(&nan, TokenKind::NotEqual, &nan));
}

#[test]
fn test_array_equality_is_structural() {
    let a = Value::from(vec![num(1.0), text("b")]);
    let b = Value::from(vec![num(1.0), text("b")]);
    let c = Value::from(vec![num(1.0)]);
    assert!(comparison_operation(&a, TokenKind::Equal, &b));
    assert!(comparison_operation(&a, TokenKind::NotEqual, &c));
}

#[test]
fn test_compare() {
    assert_eq!(compare(&num(2.0), &text("10")), Some(Ordering::Less));
    assert_eq!(compare(&text("2x"), &text("10x")), Some(Ordering::Greater));
}

#[test]
fn test_logic_operators() {
    let t = Value::Boolean(true);
    assert_eq!(binary_operation(TokenKind::And, &t, &num(0.0)).unwrap(), Value::Boolean(false));
    assert_eq!(binary_operation(TokenKind::Or, &text(""), &text("x")).unwrap(), Value::Boolean(true));
}

#[test]
fn test_membership() {
    let haystack = Value::from(vec![num(1.0), text("2")]);
    assert_eq!(binary_operation(TokenKind::In, &num(2.0), &haystack).unwrap(), Value::Boolean(true));
    assert_eq!(binary_operation(TokenKind::In, &num(3.0), &haystack).unwrap(), Value::Boolean(false));
    let err = binary_operation(TokenKind::In, &num(1.0), &num(1.0)).unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::InvalidOperand));
}

#[test]
fn test_array_key() {
    assert_eq!(array_key(&num(4.0)).unwrap(), "4");
    assert_eq!(array_key(&num(1.5)).unwrap(), "1.5");
    assert_eq!(array_key(&Value::Null).unwrap(), "");
    assert!(array_key(&Value::Array(Array::new())).is_err());
}
