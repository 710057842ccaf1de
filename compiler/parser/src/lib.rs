use thiserror::Error;

use lexer::{LexError, TokenType};

pub use parser::Parser;

mod parser;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, but found {found} '{text}' at {line}:{col}")]
    UnexpectedToken {
        expected: TokenType,
        found: TokenType,
        text: String,
        line: i32,
        col: i32,
    },
    #[error("expected an expression, but found {found} '{text}' at {line}:{col}")]
    ExpectedFactor {
        found: TokenType,
        text: String,
        line: i32,
        col: i32,
    },
    #[error("integer constant '{text}' at {line}:{col} does not fit in an int")]
    InvalidConstant { text: String, line: i32, col: i32 },
    #[error(transparent)]
    Lex(#[from] LexError),
}
