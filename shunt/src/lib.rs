//! # Shunt
//!
//! **An embeddable expression language**
//!
//! Shunt evaluates small formulas such as `price * (1 + vat)` or
//! `if(age >= 18, "adult", "minor")` against host-supplied constants,
//! functions and operator overrides. Expressions are evaluated in a single
//! pass with the shunting-yard algorithm; no syntax tree is built.
//!
//! ## Quick Start
//!
//! ```rust
//! use shunt::{default_environment, ShuntResult, Value};
//!
//! fn main() -> ShuntResult<()> {
//!     let mut env = default_environment();
//!     env.define_constant("price", 100);
//!     env.define_constant("vat", 0.25);
//!     env.define_function("double", |args: &[Value]| {
//!         Ok(Value::Number(args[0].as_number().unwrap_or(0.0) * 2.0))
//!     });
//!
//!     assert_eq!(env.evaluate("double(price * (1 + vat))")?, Value::Number(250.0));
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Values
//! Numbers, text, booleans, null and arrays. Arrays mix positional entries and
//! `key -> value` pairs: `[1, "b", 2 + 2 -> 1 + 1]`.
//!
//! ### Environment
//! Constants, functions and operator overrides live in an [`Environment`].
//! Unbound constants resolve to null unless strict mode is on.
//!
//! ### Lexer
//! [`tokenize`] exposes the token stream on its own. A [`Lexer`] can carry an
//! [`Interceptor`] that skips lexemes or stops scanning early.

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod resource_limits;
pub mod serializers;
pub mod token;
pub mod value;

pub use ast::Span;
pub use environment::{default_environment, Definition, Environment, Function, OperatorHandler};
pub use error::{ErrorDetails, RuntimeError, ShuntError, SyntaxError};
pub use evaluator::{evaluate, evaluate_tokens, evaluate_with};
pub use lexer::{tokenize, Intercept, Interceptor, Lexer, TokenStream};
pub use resource_limits::ResourceLimits;
pub use token::{Payload, Token, TokenKind};
pub use value::{Array, Entry, Value};

/// Result type for Shunt operations
pub type ShuntResult<T> = Result<T, ShuntError>;

#[cfg(test)]
mod tests;
