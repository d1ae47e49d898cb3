//! Evaluation environment
//!
//! An [`Environment`] holds everything an expression can refer to: constants,
//! functions, operator overrides, the strict/lenient policy for unbound
//! names, and the resource limits applied to each evaluation.
//!
//! Functions and overrides are stored behind `Arc`, so cloning an environment
//! to swap in different constants shares the function tables.

use crate::error::{RuntimeError, ShuntError};
use crate::evaluator::functions;
use crate::resource_limits::ResourceLimits;
use crate::token::TokenKind;
use crate::value::Value;
use crate::ShuntResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A callable exposed to expressions.
///
/// Receives the evaluated arguments in source order. Implemented for any
/// `Fn(&[Value]) -> ShuntResult<Value>` closure.
pub trait Function: Send + Sync {
    fn call(&self, args: &[Value]) -> ShuntResult<Value>;
}

impl<F> Function for F
where
    F: Fn(&[Value]) -> ShuntResult<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> ShuntResult<Value> {
        self(args)
    }
}

/// Replacement for a builtin operator rule.
///
/// Binary operators pass `(lhs, rhs)`; unary operators pass the operand as
/// `lhs` and `Value::Null` as `rhs`.
pub trait OperatorHandler: Send + Sync {
    fn apply(&self, lhs: &Value, rhs: &Value) -> ShuntResult<Value>;
}

impl<F> OperatorHandler for F
where
    F: Fn(&Value, &Value) -> ShuntResult<Value> + Send + Sync,
{
    fn apply(&self, lhs: &Value, rhs: &Value) -> ShuntResult<Value> {
        self(lhs, rhs)
    }
}

/// Either side of [`Environment::define`]
#[derive(Clone)]
pub enum Definition {
    Function(Arc<dyn Function>),
    Constant(Value),
}

impl Definition {
    pub fn function(f: impl Function + 'static) -> Self {
        Definition::Function(Arc::new(f))
    }
}

macro_rules! constant_definition {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Definition {
                fn from(value: $ty) -> Self {
                    Definition::Constant(value.into())
                }
            }
        )*
    };
}

constant_definition!(Value, f64, i32, i64, bool, &str, String, crate::value::Array, Vec<Value>);

#[derive(Clone, Default)]
pub struct Environment {
    functions: HashMap<String, Arc<dyn Function>>,
    constants: HashMap<String, Value>,
    operators: HashMap<TokenKind, Arc<dyn OperatorHandler>>,
    strict: bool,
    limits: ResourceLimits,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        let mut operators: Vec<&TokenKind> = self.operators.keys().collect();
        operators.sort();
        f.debug_struct("Environment")
            .field("functions", &functions)
            .field("constants", &self.constants)
            .field("operators", &operators)
            .field("strict", &self.strict)
            .field("limits", &self.limits)
            .finish()
    }
}

/// An environment with `if`, `coalesce`, `min` and `max` installed, in
/// lenient mode
pub fn default_environment() -> Environment {
    let mut env = Environment::new();
    functions::install_defaults(&mut env);
    env
}

impl Environment {
    /// An empty, lenient environment with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) {
        self.limits = limits;
    }

    pub fn define_function(&mut self, name: impl Into<String>, function: impl Function + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn define_constant(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.constants.insert(name.into(), value.into());
    }

    /// Register a function or a constant under `name`, replacing any previous
    /// binding of the same kind
    pub fn define(&mut self, name: impl Into<String>, definition: impl Into<Definition>) {
        match definition.into() {
            Definition::Function(f) => {
                self.functions.insert(name.into(), f);
            }
            Definition::Constant(v) => {
                self.constants.insert(name.into(), v);
            }
        }
    }

    /// Register one of the numeric host builtins (`abs`, `sqrt`, `round`, …)
    /// under its own name
    pub fn define_builtin(&mut self, name: &str) -> ShuntResult<()> {
        let function = functions::builtin(name).ok_or_else(|| {
            ShuntError::runtime(
                RuntimeError::UndefinedFunction(name.to_string()),
                format!("no host builtin named \"{}\"", name),
            )
            .with_suggestion(format!("available: {}", functions::BUILTINS.join(", ")))
        })?;
        self.functions.insert(name.to_string(), function);
        Ok(())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> ShuntResult<Value> {
        let function = self.functions.get(name).ok_or_else(|| {
            ShuntError::runtime(
                RuntimeError::UndefinedFunction(name.to_string()),
                format!("undefined function \"{}\"", name),
            )
        })?;
        function.call(args)
    }

    /// Look up a constant.
    ///
    /// Unbound names are an error in strict mode and `Null` otherwise.
    pub fn resolve(&self, name: &str) -> ShuntResult<Value> {
        match self.constants.get(name) {
            Some(value) => Ok(value.clone()),
            None if self.strict => Err(ShuntError::runtime(
                RuntimeError::UndefinedConstant(name.to_string()),
                format!("undefined constant \"{}\"", name),
            )),
            None => {
                warn!(name, "unbound constant resolved to null");
                Ok(Value::Null)
            }
        }
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> &HashMap<String, Value> {
        &self.constants
    }

    /// Replace the constant table, keeping functions and overrides
    pub fn with_constants(mut self, constants: HashMap<String, Value>) -> Self {
        self.constants = constants;
        self
    }

    pub fn set_constants(&mut self, constants: HashMap<String, Value>) {
        self.constants = constants;
    }

    pub fn set_strict_mode(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn define_operator(
        &mut self,
        operator: TokenKind,
        handler: impl OperatorHandler + 'static,
    ) -> ShuntResult<()> {
        if !operator.is_operator() {
            return Err(ShuntError::runtime(
                RuntimeError::UnsupportedOperator(operator),
                format!("{} is not an operator and cannot be overridden", operator),
            ));
        }
        self.operators.insert(operator, Arc::new(handler));
        Ok(())
    }

    pub fn has_operator_override(&self, operator: TokenKind) -> bool {
        self.operators.contains_key(&operator)
    }

    pub fn invoke_operator_override(
        &self,
        operator: TokenKind,
        lhs: &Value,
        rhs: &Value,
    ) -> ShuntResult<Value> {
        let handler = self.operators.get(&operator).ok_or_else(|| {
            ShuntError::runtime(
                RuntimeError::UndefinedOperatorHandler(operator),
                format!("no handler registered for operator {}", operator),
            )
        })?;
        handler.apply(lhs, rhs)
    }

    /// Evaluate `source` against this environment
    pub fn evaluate(&self, source: &str) -> ShuntResult<Value> {
        crate::evaluator::evaluate_with(source, self)
    }
}
