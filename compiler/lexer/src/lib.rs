use std::fmt::{Display, Formatter};

use thiserror::Error;

pub use lex::Lexer;

mod lex;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("unrecognized token at {line}:{col}: tried to lex {expected} but '{text}' did not match")]
    UnrecognizedToken {
        expected: TokenType,
        text: String,
        start: usize,
        end: usize,
        line: i32,
        col: i32,
    },
    #[error("unexpected character '{ch}' at {line}:{col}")]
    UnexpectedChar {
        ch: char,
        start: usize,
        end: usize,
        line: i32,
        col: i32,
    },
}

/// A lexed token. Its text is recovered by slicing the source with `start..end`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token {
    pub kind: TokenType,
    pub start: usize,
    pub end: usize,
    pub line: i32,
    pub col: i32,
}

impl Token {
    fn new(kind: TokenType, start: usize, end: usize, line: i32, col: i32) -> Self {
        Self {
            kind,
            start,
            end,
            line,
            col,
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Tilde,
    Plus,
    Star,
    Slash,
    Percent,

    // One or two character tokens
    Minus,
    MinusMinus,

    // Literals
    Identifier,
    Constant,

    // Keywords
    Int,
    Void,
    Return,

    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            TokenType::OpenParen => "'('",
            TokenType::CloseParen => "')'",
            TokenType::OpenBrace => "'{'",
            TokenType::CloseBrace => "'}'",
            TokenType::Semicolon => "';'",
            TokenType::Tilde => "'~'",
            TokenType::Plus => "'+'",
            TokenType::Star => "'*'",
            TokenType::Slash => "'/'",
            TokenType::Percent => "'%'",
            TokenType::Minus => "'-'",
            TokenType::MinusMinus => "'--'",
            TokenType::Identifier => "identifier",
            TokenType::Constant => "constant",
            TokenType::Int => "'int'",
            TokenType::Void => "'void'",
            TokenType::Return => "'return'",
            TokenType::Eof => "end of file",
        };

        write!(f, "{}", repr)
    }
}
