//! Tokens produced by the lexer
//!
//! Token kinds carry their class in the bit pattern of the discriminant, so
//! class membership is a mask test:
//!
//! | mask     | class     | kinds                                             |
//! |----------|-----------|---------------------------------------------------|
//! | `0x0100` | operand   | `Number`, `Identifier`, `Literal`, `FunctionCall` |
//! | `0x0200` | open      | `ParenOpen`, `ArrayOpen`                          |
//! | `0x0400` | close     | `ParenClose`, `ArrayClose`                        |
//! | `0x0800` | separator | `Comma`, `PairArrow`                              |
//! | `0x1000` | operator  | everything from `Plus` to `Or`                    |
//!
//! The low byte numbers the kinds within a class.

use crate::ast::Span;
use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenKind {
    Number = 0x0101,
    Identifier = 0x0102,
    /// String, boolean or null literal
    Literal = 0x0103,
    FunctionCall = 0x0104,
    ParenOpen = 0x0201,
    ArrayOpen = 0x0202,
    ParenClose = 0x0401,
    ArrayClose = 0x0402,
    Comma = 0x0801,
    PairArrow = 0x0802,

    Plus = 0x1001,
    Minus = 0x1002,
    UnaryPlus = 0x1003,
    UnaryMinus = 0x1004,
    Times = 0x1005,
    Div = 0x1006,
    Mod = 0x1007,
    Pow = 0x1008,
    Not = 0x1009,
    Concat = 0x100A,
    In = 0x100B,
    GreaterEqual = 0x100C,
    LessEqual = 0x100D,
    Greater = 0x100E,
    Less = 0x100F,
    Equal = 0x1010,
    NotEqual = 0x1011,
    And = 0x1012,
    Or = 0x1013,
}

impl TokenKind {
    pub const OPERAND: u32 = 0x0100;
    pub const OPEN: u32 = 0x0200;
    pub const CLOSE: u32 = 0x0400;
    pub const SEPARATOR: u32 = 0x0800;
    pub const OPERATOR: u32 = 0x1000;

    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn is_operand(self) -> bool {
        self.bits() & Self::OPERAND != 0
    }

    pub fn is_operator(self) -> bool {
        self.bits() & Self::OPERATOR != 0
    }

    pub fn is_open(self) -> bool {
        self.bits() & Self::OPEN != 0
    }

    pub fn is_close(self) -> bool {
        self.bits() & Self::CLOSE != 0
    }

    pub fn is_separator(self) -> bool {
        self.bits() & Self::SEPARATOR != 0
    }

    /// Prefix operators take a single operand to their right
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            TokenKind::UnaryPlus | TokenKind::UnaryMinus | TokenKind::Not
        )
    }

    /// Binding strength of an operator, `None` for non-operators
    pub fn precedence(self) -> Option<u8> {
        let level = match self {
            TokenKind::Or | TokenKind::And => 1,
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Greater
            | TokenKind::Less
            | TokenKind::GreaterEqual
            | TokenKind::LessEqual
            | TokenKind::In => 2,
            TokenKind::Concat => 3,
            TokenKind::Plus | TokenKind::Minus => 4,
            TokenKind::Times | TokenKind::Div | TokenKind::Mod => 5,
            TokenKind::UnaryPlus | TokenKind::UnaryMinus => 6,
            TokenKind::Pow => 7,
            TokenKind::Not => 8,
            _ => return None,
        };
        Some(level)
    }

    pub fn is_right_associative(self) -> bool {
        self == TokenKind::Pow || self.is_unary()
    }

    /// Source symbol, for diagnostics and token dumps
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Literal => "literal",
            TokenKind::FunctionCall => "function call",
            TokenKind::ParenOpen => "(",
            TokenKind::ArrayOpen => "[",
            TokenKind::ParenClose => ")",
            TokenKind::ArrayClose => "]",
            TokenKind::Comma => ",",
            TokenKind::PairArrow => "->",
            TokenKind::Plus | TokenKind::UnaryPlus => "+",
            TokenKind::Minus | TokenKind::UnaryMinus => "-",
            TokenKind::Times => "*",
            TokenKind::Div => "/",
            TokenKind::Mod => "%",
            TokenKind::Pow => "^",
            TokenKind::Not => "!",
            TokenKind::Concat => "||",
            TokenKind::In => "in",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "<>",
            TokenKind::And => "&",
            TokenKind::Or => "|",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What a token carries besides its kind
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    /// Number and literal tokens
    Value(Value),
    /// Identifier and function call tokens
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Payload,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, payload: Payload, span: Span) -> Self {
        Self {
            kind,
            payload,
            span,
        }
    }

    pub fn bare(kind: TokenKind, span: Span) -> Self {
        Self::new(kind, Payload::None, span)
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.payload {
            Payload::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Implicit tokens are inserted by the lexer and have no source text
    pub fn is_implicit(&self) -> bool {
        self.span.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Value(Value::Text(s)) => write!(f, "{:?}", s),
            Payload::Value(v) => write!(f, "{}", v),
            Payload::Name(n) => write!(f, "{}", n),
            Payload::None => write!(f, "{}", self.kind.symbol()),
        }
    }
}
