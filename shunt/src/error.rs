use crate::ast::Span;
use crate::token::TokenKind;
use std::fmt;

/// Detailed error information with optional source location
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Option<Span>,
    /// The piece of input the error refers to, when there is one
    pub fragment: Option<String>,
    pub suggestion: Option<String>,
}

/// What went wrong while scanning or structuring an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// No lexeme matches at the current position
    UnexpectedInput,
    /// A lexeme matched without consuming input
    EmptyMatch,
    /// A token appeared where it cannot stand (two operands in a row, a dangling operator, a stray separator)
    UnexpectedToken,
    /// The expression ended while an operand was still expected
    UnexpectedEnd,
    /// A `)` or `]` without a matching opener of the same kind
    UnmatchedClose,
    /// A `(` or `[` that is never closed
    UnclosedBracket,
    /// The value stack did not end with exactly one value
    UnbalancedExpression,
    /// Nothing to evaluate
    EmptyExpression,
}

impl SyntaxError {
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxError::UnexpectedInput => "unexpected input",
            SyntaxError::EmptyMatch => "empty match",
            SyntaxError::UnexpectedToken => "unexpected token",
            SyntaxError::UnexpectedEnd => "unexpected end of expression",
            SyntaxError::UnmatchedClose => "unmatched closing bracket",
            SyntaxError::UnclosedBracket => "unclosed bracket",
            SyntaxError::UnbalancedExpression => "unbalanced expression",
            SyntaxError::EmptyExpression => "empty expression",
        }
    }
}

/// What went wrong while evaluating a well-formed expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    UndefinedFunction(String),
    /// Only raised in strict mode
    UndefinedConstant(String),
    DivisionByZero,
    ModulusByZero,
    UndefinedOperatorHandler(TokenKind),
    /// An override was registered for a kind outside the operator class
    UnsupportedOperator(TokenKind),
    /// An operand has a type the operator or function cannot work with
    InvalidOperand,
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
    /// A host function reported a failure of its own
    FunctionFailed(String),
}

impl RuntimeError {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedFunction(_) => "undefined function",
            RuntimeError::UndefinedConstant(_) => "undefined constant",
            RuntimeError::DivisionByZero => "division by zero",
            RuntimeError::ModulusByZero => "modulus by zero",
            RuntimeError::UndefinedOperatorHandler(_) => "undefined operator handler",
            RuntimeError::UnsupportedOperator(_) => "unsupported operator",
            RuntimeError::InvalidOperand => "invalid operand",
            RuntimeError::ArgumentCount { .. } => "wrong argument count",
            RuntimeError::FunctionFailed(_) => "function failed",
        }
    }
}

/// Error types for the Shunt system
#[derive(Debug, Clone, PartialEq)]
pub enum ShuntError {
    /// The expression text could not be scanned or structured
    Syntax(SyntaxError, Box<ErrorDetails>),

    /// Evaluation of a well-formed expression failed against the environment
    Runtime(RuntimeError, Box<ErrorDetails>),

    /// A configured resource limit was hit
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },
}

impl ShuntError {
    /// Create a syntax error
    pub fn syntax(kind: SyntaxError, message: impl Into<String>) -> Self {
        Self::Syntax(
            kind,
            Box::new(ErrorDetails {
                message: message.into(),
                span: None,
                fragment: None,
                suggestion: None,
            }),
        )
    }

    /// Create a runtime error
    pub fn runtime(kind: RuntimeError, message: impl Into<String>) -> Self {
        Self::Runtime(
            kind,
            Box::new(ErrorDetails {
                message: message.into(),
                span: None,
                fragment: None,
                suggestion: None,
            }),
        )
    }

    /// Shorthand for host functions that want to fail with their own message
    pub fn function_failed(function: impl Into<String>, message: impl Into<String>) -> Self {
        let function = function.into();
        let message = format!("{}: {}", function, message.into());
        Self::runtime(RuntimeError::FunctionFailed(function), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        if let Some(details) = self.details_mut() {
            details.span = Some(span);
        }
        self
    }

    /// Attach `span` unless the error already points somewhere
    pub fn or_span(mut self, span: Span) -> Self {
        if let Some(details) = self.details_mut() {
            if details.span.is_none() {
                details.span = Some(span);
            }
        }
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        if let Some(details) = self.details_mut() {
            details.fragment = Some(fragment.into());
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        if let Some(details) = self.details_mut() {
            details.suggestion = Some(suggestion.into());
        }
        self
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ShuntError::Syntax(_, details) | ShuntError::Runtime(_, details) => Some(details),
            ShuntError::ResourceLimitExceeded { .. } => None,
        }
    }

    fn details_mut(&mut self) -> Option<&mut ErrorDetails> {
        match self {
            ShuntError::Syntax(_, details) | ShuntError::Runtime(_, details) => Some(details),
            ShuntError::ResourceLimitExceeded { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.details().and_then(|d| d.span)
    }

    pub fn syntax_kind(&self) -> Option<&SyntaxError> {
        match self {
            ShuntError::Syntax(kind, _) => Some(kind),
            _ => None,
        }
    }

    pub fn runtime_kind(&self) -> Option<&RuntimeError> {
        match self {
            ShuntError::Runtime(kind, _) => Some(kind),
            _ => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ShuntError::Syntax(..))
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, ShuntError::Runtime(..))
    }
}

impl fmt::Display for ShuntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShuntError::Syntax(_, details) => {
                write!(f, "Syntax error: {}", details.message)?;
                write_details(f, details)
            }
            ShuntError::Runtime(_, details) => {
                write!(f, "Runtime error: {}", details.message)?;
                write_details(f, details)
            }
            ShuntError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                limit_name, limit_value, actual_value, suggestion
            ),
        }
    }
}

fn write_details(f: &mut fmt::Formatter<'_>, details: &ErrorDetails) -> fmt::Result {
    if let Some(fragment) = &details.fragment {
        write!(f, " near `{}`", fragment)?;
    }
    if let Some(suggestion) = &details.suggestion {
        write!(f, " (suggestion: {})", suggestion)?;
    }
    if let Some(span) = &details.span {
        write!(f, " at {}", span)?;
    }
    Ok(())
}

impl std::error::Error for ShuntError {}
