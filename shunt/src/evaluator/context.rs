//! Evaluation state for a single expression
//!
//! Holds the three stacks of the shunting-yard run:
//! - operators, with a marker for every open bracket
//! - values produced so far
//! - frames, one per open bracket, collecting call arguments or array entries

use super::operations::{array_key, binary_operation, unary_operation};
use crate::ast::Span;
use crate::environment::Environment;
use crate::error::{ShuntError, SyntaxError};
use crate::token::{Token, TokenKind};
use crate::value::{Array, Value};
use crate::ShuntResult;
use tracing::trace;

/// An entry on the operator stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stacked {
    Operator(TokenKind, Span),
    /// Bottom of the operators belonging to an open bracket
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    Group,
    Call { name: String, args: Vec<Value> },
    Array { array: Array, key: Option<Value> },
}

/// An open bracket
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Value stack height when the bracket opened
    pub base: usize,
    /// The token that opened the bracket
    pub open: Span,
}

impl Frame {
    /// True while nothing has been collected into the frame yet
    pub fn is_fresh(&self) -> bool {
        match &self.kind {
            FrameKind::Group => true,
            FrameKind::Call { args, .. } => args.is_empty(),
            FrameKind::Array { array, key } => array.is_empty() && key.is_none(),
        }
    }
}

pub struct EvaluationContext<'a> {
    pub env: &'a Environment,
    pub operators: Vec<Stacked>,
    pub values: Vec<Value>,
    pub frames: Vec<Frame>,
    /// True where the next token has to start an operand
    pub expect_operand: bool,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self {
            env,
            operators: Vec::new(),
            values: Vec::new(),
            frames: Vec::new(),
            expect_operand: true,
        }
    }

    /// Push an infix operator after applying everything on the stack that
    /// binds at least as tightly
    pub fn push_binary(&mut self, kind: TokenKind, span: Span) -> ShuntResult<()> {
        let incoming = kind.precedence().unwrap_or(0);
        while let Some(Stacked::Operator(top, _)) = self.operators.last() {
            let stacked = top.precedence().unwrap_or(0);
            let pops = stacked > incoming
                || (stacked == incoming && !kind.is_right_associative());
            if !pops {
                break;
            }
            self.apply_top()?;
        }
        self.operators.push(Stacked::Operator(kind, span));
        Ok(())
    }

    /// Prefix operators wait for their operand, so nothing is popped
    pub fn push_prefix(&mut self, kind: TokenKind, span: Span) {
        self.operators.push(Stacked::Operator(kind, span));
    }

    pub fn open(&mut self, kind: FrameKind, token: &Token) {
        self.operators.push(Stacked::Marker);
        self.frames.push(Frame {
            kind,
            base: self.values.len(),
            open: token.span,
        });
    }

    /// Apply operators down to the innermost marker, or down to the bottom of
    /// the stack when no bracket is open. The marker itself stays.
    pub fn reduce(&mut self) -> ShuntResult<()> {
        while let Some(Stacked::Operator(..)) = self.operators.last() {
            self.apply_top()?;
        }
        Ok(())
    }

    /// Pop the single value an operand produced above `base`
    pub fn take_single(&mut self, base: usize, at: Span) -> ShuntResult<Value> {
        if self.values.len() != base + 1 {
            return Err(unbalanced(self.values.len().saturating_sub(base), at));
        }
        self.values.pop().ok_or_else(|| unbalanced(0, at))
    }

    /// Remove the innermost frame together with its marker
    pub fn close(&mut self) -> Option<Frame> {
        if let Some(Stacked::Marker) = self.operators.last() {
            self.operators.pop();
        }
        self.frames.pop()
    }

    fn apply_top(&mut self) -> ShuntResult<()> {
        let Some(Stacked::Operator(kind, span)) = self.operators.pop() else {
            return Ok(());
        };
        trace!(operator = ?kind, "applying operator");

        let result = if kind.is_unary() {
            let operand = self.pop_operand(span)?;
            if self.env.has_operator_override(kind) {
                self.env
                    .invoke_operator_override(kind, &operand, &Value::Null)
            } else {
                unary_operation(kind, &operand)
            }
        } else {
            let rhs = self.pop_operand(span)?;
            let lhs = self.pop_operand(span)?;
            if self.env.has_operator_override(kind) {
                self.env.invoke_operator_override(kind, &lhs, &rhs)
            } else {
                binary_operation(kind, &lhs, &rhs)
            }
        };

        self.values.push(result.map_err(|e| e.or_span(span))?);
        Ok(())
    }

    fn pop_operand(&mut self, at: Span) -> ShuntResult<Value> {
        let floor = self.frames.last().map_or(0, |frame| frame.base);
        if self.values.len() <= floor {
            return Err(unbalanced(0, at));
        }
        self.values.pop().ok_or_else(|| unbalanced(0, at))
    }
}

/// Store a finished entry in an array frame, under its pending key if any
pub fn store_entry(array: &mut Array, key: Option<Value>, value: Value) -> ShuntResult<()> {
    match key {
        Some(key) => array.insert(array_key(&key)?, value),
        None => array.push(value),
    }
    Ok(())
}

fn unbalanced(found: usize, at: Span) -> ShuntError {
    ShuntError::syntax(
        SyntaxError::UnbalancedExpression,
        format!("expected a single value here, found {}", found),
    )
    .with_span(at)
}
