//! Expression lexer implementation using winnow.

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::Location;
use winnow::token::{any, one_of, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use crate::error::{Result, ValidateError};

/// Input type for the lexer - tracks position for spans.
type Input<'a> = LocatingSlice<&'a str>;

/// Token kinds of the expression language.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    // Keywords
    And,
    Or,
    Not,
    In,
    Is,
    True,
    False,
    None,
    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Eof,
}

/// A token with its start byte offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
}

/// Tokenize an expression, failing on the first invalid character.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut input = LocatingSlice::new(source);

    loop {
        let _: ModalResult<&str, ContextError> =
            take_while(0.., char::is_whitespace).parse_next(&mut input);

        let start = input.current_token_start();
        if input.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                start,
            });
            return Ok(tokens);
        }

        match next_token(&mut input) {
            Ok(kind) => tokens.push(Token { kind, start }),
            Err(_) => {
                let bad = source[start..].chars().next().unwrap_or('?');
                let message = if bad == '"' || bad == '\'' {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character '{bad}'")
                };
                return Err(ValidateError::ExpressionSyntax {
                    offset: start,
                    message,
                });
            }
        }
    }
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_number, parse_string, parse_word, parse_operator)).parse_next(input)
}

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text = (digit1, opt(preceded('.', digit1)))
        .take()
        .parse_next(input)?;
    if text.contains('.') {
        text.parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| ErrMode::Cut(ContextError::new()))
    } else {
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| ErrMode::Cut(ContextError::new()))
    }
}

fn parse_string(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut out = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        match c {
            c if c == quote => return Ok(TokenKind::Str(out)),
            '\\' => {
                let escaped: char = any.parse_next(input)?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            c => out.push(c),
        }
    }
}

fn parse_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let word = (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)?;
    Ok(match word {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "is" => TokenKind::Is,
        "True" | "true" => TokenKind::True,
        "False" | "false" => TokenKind::False,
        "None" | "null" => TokenKind::None,
        other => TokenKind::Ident(other.to_string()),
    })
}

fn parse_operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "==".value(TokenKind::EqEq),
        "!=".value(TokenKind::NotEq),
        "<=".value(TokenKind::LtEq),
        ">=".value(TokenKind::GtEq),
        "&&".value(TokenKind::AndAnd),
        "||".value(TokenKind::OrOr),
        parse_single_char,
    ))
    .parse_next(input)
}

fn parse_single_char(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '!' => Some(TokenKind::Bang),
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        _ => None,
    })
    .parse_next(input)
}
