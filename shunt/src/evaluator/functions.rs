//! Functions shipped with the crate
//!
//! `install_defaults` puts `if`, `coalesce`, `min` and `max` into an
//! environment. The numeric host builtins (`abs`, `sqrt`, …) are only
//! registered on request through [`Environment::define_builtin`].

use super::operations::compare;
use crate::environment::{Environment, Function};
use crate::error::{RuntimeError, ShuntError};
use crate::value::Value;
use crate::ShuntResult;
use std::cmp::Ordering;
use std::sync::Arc;

/// Names accepted by [`Environment::define_builtin`]
pub const BUILTINS: &[&str] = &[
    "abs", "ceil", "floor", "round", "sqrt", "exp", "ln", "log10", "sin", "cos", "tan", "min",
    "max", "pow",
];

pub(crate) fn install_defaults(env: &mut Environment) {
    env.define_function("if", if_function);
    env.define_function("coalesce", coalesce);
    env.define_function("min", |args: &[Value]| extreme("min", args, Ordering::Less));
    env.define_function("max", |args: &[Value]| extreme("max", args, Ordering::Greater));
}

/// `if(cond, then, else = 0)`
fn if_function(args: &[Value]) -> ShuntResult<Value> {
    check_arity("if", args, 2, 3)?;
    if args[0].is_truthy() {
        Ok(args[1].clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or(Value::Number(0.0)))
    }
}

/// First truthy argument, `null` when there is none
fn coalesce(args: &[Value]) -> ShuntResult<Value> {
    Ok(args
        .iter()
        .find(|value| value.is_truthy())
        .cloned()
        .unwrap_or(Value::Null))
}

/// Smallest (`Less`) or largest (`Greater`) argument. A single array argument
/// is searched instead of the argument list.
fn extreme(name: &str, args: &[Value], wanted: Ordering) -> ShuntResult<Value> {
    let candidates: Vec<&Value> = match args {
        [Value::Array(array)] => array.values().collect(),
        _ => args.iter().collect(),
    };
    let mut best = *candidates.first().ok_or_else(|| {
        ShuntError::runtime(
            RuntimeError::ArgumentCount {
                function: name.to_string(),
                expected: "at least 1".to_string(),
                actual: 0,
            },
            format!("{}() needs at least one value", name),
        )
    })?;
    for candidate in &candidates[1..] {
        if compare(candidate, best) == Some(wanted) {
            best = *candidate;
        }
    }
    Ok(best.clone())
}

fn check_arity(name: &str, args: &[Value], min: usize, max: usize) -> ShuntResult<()> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = if min == max {
        min.to_string()
    } else {
        format!("{} to {}", min, max)
    };
    Err(ShuntError::runtime(
        RuntimeError::ArgumentCount {
            function: name.to_string(),
            expected: expected.clone(),
            actual: args.len(),
        },
        format!(
            "{}() takes {} argument(s), got {}",
            name,
            expected,
            args.len()
        ),
    ))
}

fn numeric_argument(name: &str, value: &Value) -> ShuntResult<f64> {
    value.as_number().ok_or_else(|| {
        ShuntError::runtime(
            RuntimeError::InvalidOperand,
            format!("{}() expects a number, got {}", name, value.type_name()),
        )
    })
}

/// Generates a one-argument numeric builtin from an `f64` method
macro_rules! unary_builtin {
    ($fname:ident, $method:ident) => {
        fn $fname(args: &[Value]) -> ShuntResult<Value> {
            let name = stringify!($fname);
            check_arity(name, args, 1, 1)?;
            Ok(Value::Number(numeric_argument(name, &args[0])?.$method()))
        }
    };
}

unary_builtin!(abs, abs);
unary_builtin!(ceil, ceil);
unary_builtin!(floor, floor);
unary_builtin!(round, round);
unary_builtin!(sqrt, sqrt);
unary_builtin!(exp, exp);
unary_builtin!(ln, ln);
unary_builtin!(log10, log10);
unary_builtin!(sin, sin);
unary_builtin!(cos, cos);
unary_builtin!(tan, tan);

fn pow(args: &[Value]) -> ShuntResult<Value> {
    check_arity("pow", args, 2, 2)?;
    let base = numeric_argument("pow", &args[0])?;
    let exponent = numeric_argument("pow", &args[1])?;
    Ok(Value::Number(base.powf(exponent)))
}

/// Look up a host builtin by name
pub(crate) fn builtin(name: &str) -> Option<Arc<dyn Function>> {
    let function: Arc<dyn Function> = match name {
        "abs" => Arc::new(abs),
        "ceil" => Arc::new(ceil),
        "floor" => Arc::new(floor),
        "round" => Arc::new(round),
        "sqrt" => Arc::new(sqrt),
        "exp" => Arc::new(exp),
        "ln" => Arc::new(ln),
        "log10" => Arc::new(log10),
        "sin" => Arc::new(sin),
        "cos" => Arc::new(cos),
        "tan" => Arc::new(tan),
        "pow" => Arc::new(pow),
        "min" => Arc::new(|args: &[Value]| extreme("min", args, Ordering::Less)),
        "max" => Arc::new(|args: &[Value]| extreme("max", args, Ordering::Greater)),
        _ => return None,
    };
    Some(function)
}
