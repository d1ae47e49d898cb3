use crate::environment::{default_environment, Environment};
use crate::error::{RuntimeError, SyntaxError};
use crate::lexer::{Intercept, Lexer};
use crate::token::Token;
use crate::value::{Array, Value};
use crate::{evaluate, evaluate_tokens, evaluate_with, ShuntError};

fn number(source: &str) -> f64 {
    match evaluate(source) {
        Ok(Value::Number(n)) => n,
        other => panic!("expected a number from {:?}, got {:?}", source, other),
    }
}

fn syntax_error(source: &str) -> SyntaxError {
    match evaluate(source) {
        Err(ShuntError::Syntax(kind, _)) => kind,
        other => panic!("expected a syntax error from {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(number("3 + 4 * 2 / (1 - 5) ^ 2 ^ 3"), 3.0001220703125);
    assert_eq!(number("2^3^2"), 512.0);
    assert_eq!(number("10 - 4 - 3"), 3.0);
    assert_eq!(number("64 / 4 / 2"), 8.0);
    assert_eq!(number("-2^2"), -4.0);
    assert_eq!(number("4^-2"), 0.0625);
    assert_eq!(number("3*(3+4)^(1+2)"), 1029.0);
    assert_eq!(number("7 % 4 * 2"), 6.0);
}

#[test]
fn test_stacked_prefix_operators() {
    assert_eq!(number("--3"), 3.0);
    assert_eq!(number("-+-3"), 3.0);
    assert_eq!(evaluate("!!1").unwrap(), Value::Boolean(true));
    assert_eq!(evaluate("not not 0").unwrap(), Value::Boolean(false));
}

#[test]
fn test_logic_binds_loosest() {
    assert_eq!(evaluate("1 < 2 and 3 > 4").unwrap(), Value::Boolean(false));
    assert_eq!(evaluate("1 < 2 or 3 > 4").unwrap(), Value::Boolean(true));
    assert_eq!(evaluate("1 + 1 = 2").unwrap(), Value::Boolean(true));
    assert_eq!(evaluate("2 + 3 || 3 + 4").unwrap(), Value::from("57"));
}

#[test]
fn test_calls() {
    assert_eq!(number("min(3, 1, 2)"), 1.0);
    assert_eq!(number("max(min(5, 9), 2 * 2)"), 5.0);
    assert_eq!(number("if(1 > 2, 10, 20)"), 20.0);
    assert_eq!(number("2 * max(1, 2)"), 4.0);
}

#[test]
fn test_zero_argument_call() {
    let mut env = Environment::new();
    env.define_function("answer", |args: &[Value]| {
        Ok(Value::Number(args.len() as f64 + 42.0))
    });
    assert_eq!(evaluate_with("answer()", &env).unwrap(), Value::Number(42.0));
    assert_eq!(evaluate_with("answer( )", &env).unwrap(), Value::Number(42.0));
}

#[test]
fn test_call_arguments_arrive_in_order() {
    let mut env = Environment::new();
    env.define_function("list", |args: &[Value]| Ok(Value::from(args.to_vec())));
    let result = evaluate_with("list(1, 2 + 3, \"x\")", &env).unwrap();
    assert_eq!(
        result,
        Value::from(vec![Value::from(1), Value::from(5), Value::from("x")])
    );
}

#[test]
fn test_arrays() {
    assert_eq!(evaluate("[]").unwrap(), Value::Array(Array::new()));
    assert_eq!(
        evaluate("[[1], 2]").unwrap(),
        Value::from(vec![Value::from(vec![Value::from(1)]), Value::from(2)])
    );

    let mut expected = Array::new();
    expected.push(Value::from(1));
    expected.push(Value::from("b"));
    expected.insert("4", Value::from(2));
    assert_eq!(
        evaluate("[1, \"b\", 2 + 2 -> 1 + 1]").unwrap(),
        Value::Array(expected)
    );
}

#[test]
fn test_repeated_array_key_overwrites() {
    let result = evaluate("[\"a\" -> 1, 2, \"a\" -> 3]").unwrap();
    let array = result.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array.get("a"), Some(&Value::from(3)));
    assert_eq!(array.entries()[0].key(), Some("a"));
}

#[test]
fn test_array_as_key_is_invalid() {
    let err = evaluate("[[1] -> 2]").unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::InvalidOperand));
}

#[test]
fn test_empty_input() {
    assert_eq!(syntax_error(""), SyntaxError::EmptyExpression);
    assert_eq!(syntax_error("   # nothing here"), SyntaxError::EmptyExpression);
}

#[test]
fn test_structural_errors() {
    assert_eq!(syntax_error("1 +"), SyntaxError::UnexpectedEnd);
    assert_eq!(syntax_error("-"), SyntaxError::UnexpectedEnd);
    assert_eq!(syntax_error("(1"), SyntaxError::UnclosedBracket);
    assert_eq!(syntax_error("[1, 2"), SyntaxError::UnclosedBracket);
    assert_eq!(syntax_error("min(1"), SyntaxError::UnclosedBracket);
    assert_eq!(syntax_error("1)"), SyntaxError::UnmatchedClose);
    assert_eq!(syntax_error("[1)"), SyntaxError::UnmatchedClose);
    assert_eq!(syntax_error("(1]"), SyntaxError::UnmatchedClose);
}

#[test]
fn test_unexpected_tokens() {
    for source in [
        "()",
        "(1, 2)",
        "1, 2",
        "1 -> 2",
        "[1 -> 2 -> 3]",
        "min(1 -> 2)",
        "[1,]",
        "min(1,)",
        "min(,1)",
        "1 * * 2",
        "\"a\" 2",
        "\"a\"(1)",
        "1 not 2",
        "min(-)",
    ] {
        assert_eq!(
            syntax_error(source),
            SyntaxError::UnexpectedToken,
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_unexpected_token_points_at_token() {
    let err = evaluate("1 + (2, 3)").unwrap_err();
    let details = err.details().unwrap();
    assert_eq!(details.span.map(|s| s.start), Some(6));
    assert_eq!(details.fragment.as_deref(), Some(","));
}

#[test]
fn test_runtime_error_gets_operator_span() {
    let err = evaluate("1 + 10 / 0").unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeError::DivisionByZero));
    assert_eq!(err.span().map(|s| s.start), Some(7));
}

#[test]
fn test_undefined_function_gets_call_span() {
    let err = evaluate("1 + nope(2)").unwrap_err();
    assert_eq!(
        err.runtime_kind(),
        Some(&RuntimeError::UndefinedFunction("nope".to_string()))
    );
    assert_eq!(err.span().map(|s| s.start), Some(4));
}

#[test]
fn test_undefined_function_fails_in_both_modes() {
    let mut env = default_environment();
    for strict in [false, true] {
        env.set_strict_mode(strict);
        let err = evaluate_with("nope(1)", &env).unwrap_err();
        assert_eq!(
            err.runtime_kind(),
            Some(&RuntimeError::UndefinedFunction("nope".to_string())),
            "strict = {}",
            strict
        );
    }
}

#[test]
fn test_lenient_unbound_constant_is_null() {
    assert_eq!(number("${2}+3"), 3.0);
    assert_eq!(evaluate("missing").unwrap(), Value::Null);
}

#[test]
fn test_strict_unbound_constant() {
    let mut env = default_environment();
    env.set_strict_mode(true);
    let err = evaluate_with("1 + missing", &env).unwrap_err();
    assert_eq!(
        err.runtime_kind(),
        Some(&RuntimeError::UndefinedConstant("missing".to_string()))
    );
    assert_eq!(err.span().map(|s| s.start), Some(4));
}

#[test]
fn test_evaluate_tokens_from_intercepted_stream() {
    let mut lexer = Lexer::with_interceptor(|_emitted: &[Token], lexeme: &str, _rest: &str| {
        if lexeme == ";" || lexeme == "end" {
            Intercept::Stop
        } else {
            Intercept::Continue
        }
    });
    let stream = lexer.tokenize("2 * 21 end of formula").unwrap();
    assert_eq!(stream.remainder(), Some("end of formula"));
    assert_eq!(
        evaluate_tokens(&stream, &default_environment()).unwrap(),
        Value::Number(42.0)
    );
}

#[test]
fn test_literal_only_expressions_ignore_environment() {
    let mut other = Environment::new();
    other.define_constant("x", 99);
    for source in ["1 + 2 * 3", "\"a\" || \"b\"", "[1, 2 -> 3]", "not true"] {
        assert_eq!(
            evaluate_with(source, &Environment::new()).unwrap(),
            evaluate_with(source, &other).unwrap()
        );
    }
}
