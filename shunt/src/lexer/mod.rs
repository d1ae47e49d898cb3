//! Expression scanner
//!
//! Turns expression text into a [`TokenStream`]. The scanner tries a fixed set
//! of alternatives at each position, in priority order:
//!
//! 1. operator symbols (`->`, `||`, `>=`, `<=`, `<>` before single characters)
//! 2. numbers (`12`, `1.5`, `.5`, `3.`)
//! 3. words (`price`, `b.c`, `手紙`) and explicit names (`${hello world}`)
//! 4. quoted strings (`"…"` or `'…'`, no escapes)
//! 5. whitespace and `#` comments, which are dropped
//!
//! Ambiguous lexemes are resolved against the previously emitted token: `+`/`-`
//! become unary where an operand is expected, `2(3)` and `(2)(3)` get an
//! implicit `*`, and two adjacent identifiers get an implicit `+`.

mod stream;

pub use stream::TokenStream;

use crate::ast::Span;
use crate::error::{ShuntError, SyntaxError};
use crate::token::{Payload, Token, TokenKind};
use crate::value::Value;
use crate::ShuntResult;
use tracing::trace;

/// Longest fragment of input quoted back in a syntax error
const FRAGMENT_CHARS: usize = 20;

/// What an [`Interceptor`] wants done with the lexeme it was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    /// Classify and emit the lexeme as usual
    Continue,
    /// Drop the lexeme and keep scanning
    Skip,
    /// Stop scanning before this lexeme; the rest of the input becomes the
    /// stream's remainder
    Stop,
}

/// Lexer middleware, consulted for every significant lexeme before it is
/// classified.
///
/// Closures of the form `FnMut(&[Token], &str, &str) -> Intercept` implement
/// this trait. The arguments are the tokens emitted so far, the lexeme text and
/// the input that follows it.
pub trait Interceptor {
    fn intercept(&mut self, emitted: &[Token], lexeme: &str, rest: &str) -> Intercept;
}

impl<F> Interceptor for F
where
    F: FnMut(&[Token], &str, &str) -> Intercept,
{
    fn intercept(&mut self, emitted: &[Token], lexeme: &str, rest: &str) -> Intercept {
        self(emitted, lexeme, rest)
    }
}

/// Scan `source` with no interceptor
pub fn tokenize(source: &str) -> ShuntResult<TokenStream> {
    Lexer::new().tokenize(source)
}

#[derive(Default)]
pub struct Lexer<'i> {
    interceptor: Option<Box<dyn Interceptor + 'i>>,
}

impl<'i> Lexer<'i> {
    pub fn new() -> Self {
        Self { interceptor: None }
    }

    pub fn with_interceptor(interceptor: impl Interceptor + 'i) -> Self {
        Self {
            interceptor: Some(Box::new(interceptor)),
        }
    }

    pub fn tokenize(&mut self, source: &str) -> ShuntResult<TokenStream> {
        let mut scan = Scan::new(source);
        let mut remainder = None;

        while scan.pos < source.len() {
            let rest = &source[scan.pos..];
            let (lexeme, len) = match match_lexeme(rest) {
                Some(found) => found,
                None => {
                    return Err(ShuntError::syntax(
                        SyntaxError::UnexpectedInput,
                        "no token matches the input",
                    )
                    .with_fragment(fragment(rest))
                    .with_span(scan.span(rest.chars().next().map_or(0, char::len_utf8))));
                }
            };
            if len == 0 {
                return Err(ShuntError::syntax(
                    SyntaxError::EmptyMatch,
                    "scanner matched nothing and cannot advance",
                )
                .with_fragment(fragment(rest))
                .with_span(scan.span(0)));
            }

            if matches!(lexeme, Lexeme::Trivia) {
                scan.consume(len);
                continue;
            }

            if let Some(interceptor) = self.interceptor.as_mut() {
                match interceptor.intercept(&scan.tokens, &rest[..len], &rest[len..]) {
                    Intercept::Continue => {}
                    Intercept::Skip => {
                        scan.consume(len);
                        continue;
                    }
                    Intercept::Stop => {
                        remainder = Some(rest.to_string());
                        break;
                    }
                }
            }

            let span = scan.span(len);
            scan.consume(len);
            scan.emit(lexeme, span);
        }

        trace!(tokens = scan.tokens.len(), "scanned expression");
        Ok(TokenStream::new(scan.tokens).with_remainder(remainder))
    }
}

/// A matched piece of input before classification
#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Symbol(TokenKind),
    Number(f64),
    Word { name: String, explicit: bool },
    Text(String),
    Trivia,
}

fn match_lexeme(input: &str) -> Option<(Lexeme, usize)> {
    match_symbol(input)
        .or_else(|| match_number(input))
        .or_else(|| match_word(input))
        .or_else(|| match_text(input))
        .or_else(|| match_trivia(input))
}

fn match_symbol(input: &str) -> Option<(Lexeme, usize)> {
    let double = match input.get(..2) {
        Some("->") => Some(TokenKind::PairArrow),
        Some("||") => Some(TokenKind::Concat),
        Some(">=") => Some(TokenKind::GreaterEqual),
        Some("<=") => Some(TokenKind::LessEqual),
        Some("<>") => Some(TokenKind::NotEqual),
        _ => None,
    };
    if let Some(kind) = double {
        return Some((Lexeme::Symbol(kind), 2));
    }

    let kind = match input.chars().next()? {
        '!' => TokenKind::Not,
        ',' => TokenKind::Comma,
        '>' => TokenKind::Greater,
        '<' => TokenKind::Less,
        '=' => TokenKind::Equal,
        '&' => TokenKind::And,
        '|' => TokenKind::Or,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Times,
        '/' => TokenKind::Div,
        '^' => TokenKind::Pow,
        '%' => TokenKind::Mod,
        '(' => TokenKind::ParenOpen,
        ')' => TokenKind::ParenClose,
        '[' => TokenKind::ArrayOpen,
        ']' => TokenKind::ArrayClose,
        _ => return None,
    };
    Some((Lexeme::Symbol(kind), 1))
}

fn match_number(input: &str) -> Option<(Lexeme, usize)> {
    let bytes = input.as_bytes();
    let int = count_digits(bytes);
    let len = if bytes.get(int) == Some(&b'.') {
        let frac = count_digits(&bytes[int + 1..]);
        if int == 0 && frac == 0 {
            return None;
        }
        int + 1 + frac
    } else if int > 0 {
        int
    } else {
        return None;
    };
    let number = input[..len].parse::<f64>().ok()?;
    Some((Lexeme::Number(number), len))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.' || c == '_'
}

fn match_word(input: &str) -> Option<(Lexeme, usize)> {
    if let Some(body) = input.strip_prefix("${") {
        let close = body.find('}')?;
        if close == 0 {
            return None;
        }
        let name = body[..close].to_string();
        return Some((
            Lexeme::Word {
                name,
                explicit: true,
            },
            close + 3,
        ));
    }

    let len: usize = input
        .chars()
        .take_while(|c| is_word_char(*c))
        .map(char::len_utf8)
        .sum();
    if len == 0 {
        return None;
    }
    Some((
        Lexeme::Word {
            name: input[..len].to_string(),
            explicit: false,
        },
        len,
    ))
}

fn match_text(input: &str) -> Option<(Lexeme, usize)> {
    let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &input[1..];
    let close = body.find(quote)?;
    Some((Lexeme::Text(body[..close].to_string()), close + 2))
}

fn match_trivia(input: &str) -> Option<(Lexeme, usize)> {
    if input.starts_with('#') {
        let len = input.find('\n').map_or(input.len(), |newline| newline + 1);
        return Some((Lexeme::Trivia, len));
    }
    let len: usize = input
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some((Lexeme::Trivia, len))
}

/// True when the next significant character of `input` is `(`
fn opens_call(input: &str) -> bool {
    let mut rest = input;
    loop {
        match match_trivia(rest) {
            Some((_, len)) => rest = &rest[len..],
            None => return rest.starts_with('('),
        }
    }
}

fn fragment(input: &str) -> String {
    input.chars().take(FRAGMENT_CHARS).collect()
}

/// Scanning state for one `tokenize` call
struct Scan<'s> {
    source: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'s> Scan<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
        }
    }

    fn span(&self, len: usize) -> Span {
        Span::new(self.pos, self.pos + len, self.line, self.col)
    }

    fn consume(&mut self, len: usize) {
        for c in self.source[self.pos..self.pos + len].chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos += len;
    }

    fn previous(&self) -> Option<TokenKind> {
        self.tokens.last().map(|t| t.kind)
    }

    /// An operand is expected at the start, after an operator, after an
    /// opening bracket and after a separator
    fn expects_operand(&self) -> bool {
        self.previous()
            .is_none_or(|k| k.is_operator() || k.is_open() || k.is_separator())
    }

    fn implicit(&mut self, kind: TokenKind, span: Span) {
        let at = Span::point(span.start, span.line, span.col);
        self.tokens.push(Token::bare(kind, at));
    }

    fn emit(&mut self, lexeme: Lexeme, span: Span) {
        match lexeme {
            Lexeme::Symbol(kind) => self.emit_symbol(kind, span),
            Lexeme::Number(n) => {
                if matches!(
                    self.previous(),
                    Some(TokenKind::Number | TokenKind::ParenClose)
                ) {
                    self.implicit(TokenKind::Times, span);
                }
                self.tokens
                    .push(Token::new(TokenKind::Number, Payload::Value(Value::Number(n)), span));
            }
            Lexeme::Text(text) => {
                self.tokens
                    .push(Token::new(TokenKind::Literal, Payload::Value(Value::Text(text)), span));
            }
            Lexeme::Word { name, explicit } => self.emit_word(name, explicit, span),
            Lexeme::Trivia => {}
        }
    }

    fn emit_symbol(&mut self, kind: TokenKind, span: Span) {
        let kind = match kind {
            TokenKind::Plus if self.expects_operand() => TokenKind::UnaryPlus,
            TokenKind::Minus if self.expects_operand() => TokenKind::UnaryMinus,
            TokenKind::ParenOpen => {
                if matches!(
                    self.previous(),
                    Some(TokenKind::Number | TokenKind::ParenClose)
                ) {
                    self.implicit(TokenKind::Times, span);
                }
                kind
            }
            other => other,
        };
        self.tokens.push(Token::bare(kind, span));
    }

    fn emit_word(&mut self, name: String, explicit: bool, span: Span) {
        if !explicit {
            let literal = match name.to_lowercase().as_str() {
                "null" => Some(Value::Null),
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            };
            if let Some(value) = literal {
                self.tokens
                    .push(Token::new(TokenKind::Literal, Payload::Value(value), span));
                return;
            }

            let keyword = match name.as_str() {
                "and" => Some(TokenKind::And),
                "or" => Some(TokenKind::Or),
                "not" => Some(TokenKind::Not),
                "in" => Some(TokenKind::In),
                _ => None,
            };
            if let Some(kind) = keyword {
                self.emit_symbol(kind, span);
                return;
            }
        }

        let kind = if opens_call(&self.source[span.end..]) {
            TokenKind::FunctionCall
        } else {
            TokenKind::Identifier
        };
        if self.previous() == Some(TokenKind::Identifier) {
            self.implicit(TokenKind::Plus, span);
        }
        self.tokens.push(Token::new(kind, Payload::Name(name), span));
    }
}
