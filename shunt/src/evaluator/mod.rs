//! Expression evaluation
//!
//! Evaluates a token stream in one left-to-right pass with the shunting-yard
//! algorithm. No syntax tree is built: operators are applied as soon as
//! precedence allows, and brackets open frames that collect call arguments
//! and array entries.

pub mod context;
pub mod functions;
pub mod operations;
pub mod timeout;

use crate::environment::{default_environment, Environment};
use crate::error::{ShuntError, SyntaxError};
use crate::lexer::{tokenize, TokenStream};
use crate::token::{Token, TokenKind};
use crate::value::{Array, Value};
use crate::ShuntResult;
use context::{store_entry, EvaluationContext, FrameKind, Stacked};
use timeout::TimeoutTracker;
use tracing::{debug, trace};

/// Evaluate `source` with [`default_environment`]
pub fn evaluate(source: &str) -> ShuntResult<Value> {
    evaluate_with(source, &default_environment())
}

/// Evaluate `source` against `env`
pub fn evaluate_with(source: &str, env: &Environment) -> ShuntResult<Value> {
    let limits = env.limits();
    if source.len() > limits.max_expression_bytes {
        return Err(ShuntError::ResourceLimitExceeded {
            limit_name: "max_expression_bytes".to_string(),
            limit_value: limits.max_expression_bytes.to_string(),
            actual_value: source.len().to_string(),
            suggestion: "Shorten the expression or raise max_expression_bytes".to_string(),
        });
    }

    debug!(expression = source, "evaluating expression");
    let stream = tokenize(source)?;
    let value = Evaluator::new(env).run(&stream)?;
    debug!(result = %value, "evaluated expression");
    Ok(value)
}

/// Evaluate an already scanned stream, e.g. one produced by a
/// [`Lexer`](crate::Lexer) with an interceptor
pub fn evaluate_tokens(stream: &TokenStream, env: &Environment) -> ShuntResult<Value> {
    Evaluator::new(env).run(stream)
}

pub struct Evaluator<'a> {
    env: &'a Environment,
}

impl<'a> Evaluator<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    pub fn run(&self, stream: &TokenStream) -> ShuntResult<Value> {
        let tokens = stream.tokens();
        if tokens.is_empty() {
            return Err(ShuntError::syntax(
                SyntaxError::EmptyExpression,
                "nothing to evaluate",
            ));
        }

        let limits = self.env.limits();
        let timeout = TimeoutTracker::new();
        let mut ctx = EvaluationContext::new(self.env);
        let mut index = 0;

        while index < tokens.len() {
            let step = index + 1;
            if step > limits.max_evaluation_steps {
                return Err(ShuntError::ResourceLimitExceeded {
                    limit_name: "max_evaluation_steps".to_string(),
                    limit_value: limits.max_evaluation_steps.to_string(),
                    actual_value: step.to_string(),
                    suggestion: "Split the expression or raise max_evaluation_steps".to_string(),
                });
            }
            timeout.check(limits, step)?;

            let token = &tokens[index];
            trace!(token = %token, kind = ?token.kind, "processing token");
            index += 1;

            match token.kind {
                TokenKind::Number | TokenKind::Literal => {
                    expect_operand(&ctx, token)?;
                    let value = token.value().cloned().unwrap_or_default();
                    ctx.values.push(value);
                    ctx.expect_operand = false;
                }
                TokenKind::Identifier => {
                    expect_operand(&ctx, token)?;
                    let name = token.name().unwrap_or_default();
                    let value = self.env.resolve(name).map_err(|e| e.or_span(token.span))?;
                    ctx.values.push(value);
                    ctx.expect_operand = false;
                }
                TokenKind::FunctionCall => {
                    expect_operand(&ctx, token)?;
                    match tokens.get(index) {
                        Some(next) if next.kind == TokenKind::ParenOpen => index += 1,
                        Some(next) => return Err(unexpected(next)),
                        None => return Err(unexpected_end(token)),
                    }
                    self.check_depth(&ctx, token)?;
                    let name = token.name().unwrap_or_default().to_string();
                    ctx.open(
                        FrameKind::Call {
                            name,
                            args: Vec::new(),
                        },
                        token,
                    );
                    ctx.expect_operand = true;
                }
                TokenKind::ParenOpen | TokenKind::ArrayOpen => {
                    expect_operand(&ctx, token)?;
                    self.check_depth(&ctx, token)?;
                    let kind = if token.kind == TokenKind::ParenOpen {
                        FrameKind::Group
                    } else {
                        FrameKind::Array {
                            array: Array::new(),
                            key: None,
                        }
                    };
                    ctx.open(kind, token);
                    ctx.expect_operand = true;
                }
                TokenKind::Comma => {
                    expect_operator(&ctx, token)?;
                    ctx.reduce()?;
                    let base = match ctx.frames.last() {
                        Some(frame) if !matches!(frame.kind, FrameKind::Group) => frame.base,
                        _ => return Err(unexpected(token)),
                    };
                    let value = ctx.take_single(base, token.span)?;
                    match ctx.frames.last_mut().map(|frame| &mut frame.kind) {
                        Some(FrameKind::Call { args, .. }) => args.push(value),
                        Some(FrameKind::Array { array, key }) => {
                            store_entry(array, key.take(), value)
                                .map_err(|e| e.or_span(token.span))?;
                        }
                        _ => return Err(unexpected(token)),
                    }
                    ctx.expect_operand = true;
                }
                TokenKind::PairArrow => {
                    expect_operator(&ctx, token)?;
                    let base = match ctx.frames.last() {
                        Some(frame)
                            if matches!(frame.kind, FrameKind::Array { key: None, .. }) =>
                        {
                            frame.base
                        }
                        _ => return Err(unexpected(token)),
                    };
                    ctx.reduce()?;
                    let value = ctx.take_single(base, token.span)?;
                    if let Some(FrameKind::Array { key, .. }) =
                        ctx.frames.last_mut().map(|frame| &mut frame.kind)
                    {
                        *key = Some(value);
                    }
                    ctx.expect_operand = true;
                }
                TokenKind::ParenClose | TokenKind::ArrayClose => {
                    self.close_bracket(&mut ctx, token)?;
                    ctx.expect_operand = false;
                }
                kind if kind.is_unary() => {
                    expect_operand(&ctx, token)?;
                    ctx.push_prefix(kind, token.span);
                }
                kind if kind.is_operator() => {
                    expect_operator(&ctx, token)?;
                    ctx.push_binary(kind, token.span)?;
                    ctx.expect_operand = true;
                }
                _ => return Err(unexpected(token)),
            }
        }

        if let Some(frame) = ctx.frames.last() {
            return Err(ShuntError::syntax(
                SyntaxError::UnclosedBracket,
                "bracket is never closed",
            )
            .with_span(frame.open));
        }
        if ctx.expect_operand {
            let last = &tokens[tokens.len() - 1];
            return Err(unexpected_end(last));
        }

        ctx.reduce()?;
        if ctx.values.len() != 1 {
            return Err(ShuntError::syntax(
                SyntaxError::UnbalancedExpression,
                format!(
                    "expression left {} values instead of one",
                    ctx.values.len()
                ),
            ));
        }
        ctx.values.pop().ok_or_else(|| {
            ShuntError::syntax(SyntaxError::UnbalancedExpression, "expression left no value")
        })
    }

    fn check_depth(&self, ctx: &EvaluationContext, token: &Token) -> ShuntResult<()> {
        let limit = self.env.limits().max_nesting_depth;
        let depth = ctx.frames.len() + 1;
        if depth > limit {
            return Err(ShuntError::ResourceLimitExceeded {
                limit_name: "max_nesting_depth".to_string(),
                limit_value: limit.to_string(),
                actual_value: depth.to_string(),
                suggestion: format!(
                    "Brackets nest {} deep at {}. Flatten the expression or raise max_nesting_depth.",
                    depth, token.span
                ),
            });
        }
        Ok(())
    }

    fn close_bracket(&self, ctx: &mut EvaluationContext, token: &Token) -> ShuntResult<()> {
        let closes_array = token.kind == TokenKind::ArrayClose;
        let frame = ctx.frames.last().ok_or_else(|| unmatched(token))?;
        if matches!(frame.kind, FrameKind::Array { .. }) != closes_array {
            return Err(unmatched(token));
        }
        let base = frame.base;

        // `f()` and `[]` close a frame that never received an operand
        let empty = ctx.expect_operand
            && !matches!(frame.kind, FrameKind::Group)
            && frame.is_fresh()
            && ctx.values.len() == base
            && matches!(ctx.operators.last(), Some(Stacked::Marker));

        if ctx.expect_operand && !empty {
            return Err(unexpected(token));
        }

        let last = if empty {
            None
        } else {
            ctx.reduce()?;
            Some(ctx.take_single(base, token.span)?)
        };

        let Some(frame) = ctx.close() else {
            return Err(unmatched(token));
        };
        let value = match frame.kind {
            FrameKind::Group => last.unwrap_or_default(),
            FrameKind::Call { name, mut args } => {
                args.extend(last);
                trace!(function = %name, args = args.len(), "calling function");
                self.env
                    .call(&name, &args)
                    .map_err(|e| e.or_span(frame.open))?
            }
            FrameKind::Array { mut array, key } => {
                if let Some(value) = last {
                    store_entry(&mut array, key, value).map_err(|e| e.or_span(token.span))?;
                }
                Value::Array(array)
            }
        };
        ctx.values.push(value);
        Ok(())
    }
}

fn expect_operand(ctx: &EvaluationContext, token: &Token) -> ShuntResult<()> {
    if ctx.expect_operand {
        Ok(())
    } else {
        Err(unexpected(token))
    }
}

fn expect_operator(ctx: &EvaluationContext, token: &Token) -> ShuntResult<()> {
    if ctx.expect_operand {
        Err(unexpected(token))
    } else {
        Ok(())
    }
}

fn unexpected(token: &Token) -> ShuntError {
    ShuntError::syntax(
        SyntaxError::UnexpectedToken,
        format!("unexpected {} `{}`", token.kind.symbol(), token),
    )
    .with_fragment(token.to_string())
    .with_span(token.span)
}

fn unexpected_end(last: &Token) -> ShuntError {
    ShuntError::syntax(
        SyntaxError::UnexpectedEnd,
        format!("expression ends after `{}` where a value is expected", last),
    )
    .with_span(last.span)
}

fn unmatched(token: &Token) -> ShuntError {
    ShuntError::syntax(
        SyntaxError::UnmatchedClose,
        format!("`{}` does not close any open bracket", token.kind.symbol()),
    )
    .with_span(token.span)
}
