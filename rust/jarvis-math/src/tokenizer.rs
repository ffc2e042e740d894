//! Tokenizer for canonical expressions.
//!
//! Canonical expressions are produced by [`crate::translate`] and only ever
//! contain digits, whitespace, `. + - * / % ( ) ,` and lowercase names. The
//! tokenizer rejects anything else up front so the parser never sees it.
//!
//! Token types:
//! - **Number**: decimal literal, optionally with a fraction and an exponent
//! - **Name**: `[a-z_][a-z0-9_]*`, resolved later against the whitelist
//! - **Operators**: `+ - * ** / %`
//! - **Punctuation**: `(`, `)`, `,`

use std::fmt;

use crate::error::EvalError;

/// A classified token of a canonical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Percent,
    LeftParen,
    RightParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Name(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::DoubleStar => write!(f, "**"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Split a canonical expression into tokens.
///
/// Whitespace is consumed but not emitted. Uppercase letters are accepted and
/// folded to lowercase so that `PI` and `pi` resolve identically.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let ch = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && i + 1 < len && chars[i + 1].is_ascii_digit()) {
            let start = i;
            while i < len && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // Exponent part: `e` followed by an optional sign and at least one digit.
            if i < len && chars[i] == 'e' {
                let mut j = i + 1;
                if j < len && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < len && chars[j].is_ascii_digit() {
                    while j < len && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| EvalError::syntax("number", format!("'{literal}'")))?;
            tokens.push(Token::Number(value));
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let start = i;
            while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            tokens.push(Token::Name(name.to_ascii_lowercase()));
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if i + 1 < len && chars[i + 1] == '*' => {
                i += 1;
                Token::DoubleStar
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            other => return Err(EvalError::syntax("expression", format!("'{other}'"))),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}
