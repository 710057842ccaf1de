use std::str::Chars;

use log::trace;

use crate::{LexError, Token, TokenType};

const EOF: char = '\0';

pub struct Lexer<'a> {
    /// Source Text
    source: &'a str,

    /// Remaining source characters
    chars: Chars<'a>,
    line: i32,
    col: i32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            line: 1,
            col: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Yields every token up to, but not including, end of file.
    /// Lexical errors are yielded in place and lexing carries on after them.
    pub fn tokenize(&mut self) -> impl Iterator<Item = Result<Token, LexError>> + use<'_, 'a> {
        std::iter::from_fn(move || match self.next_token() {
            Ok(token) if token.kind == TokenType::Eof => None,
            result => Some(result),
        })
    }

    /// Scan the next token. Once the source is exhausted every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.offset();
        let line = self.line;
        let col = self.col;

        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(Token::new(TokenType::Eof, start, start, line, col)),
        };

        let token_type = match c {
            '(' => TokenType::OpenParen,
            ')' => TokenType::CloseParen,
            '{' => TokenType::OpenBrace,
            '}' => TokenType::CloseBrace,
            ';' => TokenType::Semicolon,
            '~' => TokenType::Tilde,
            '+' => TokenType::Plus,
            '*' => TokenType::Star,
            '/' => TokenType::Slash,
            '%' => TokenType::Percent,
            '-' => match self.peek() {
                '-' => {
                    self.advance();
                    TokenType::MinusMinus
                }
                _ => TokenType::Minus,
            },
            '0'..='9' => self.number(start, line, col)?,
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(start, line, col)?,
            ch => {
                self.skip_error();
                return Err(LexError::UnexpectedChar {
                    ch,
                    start,
                    end: self.offset(),
                    line,
                    col,
                });
            }
        };

        let token = Token::new(token_type, start, self.offset(), line, col);
        trace!("lexed {:?} '{}'", token.kind, token.text(self.source));

        Ok(token)
    }

    fn number(&mut self, start: usize, line: i32, col: i32) -> Result<TokenType, LexError> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // a constant running straight into letters (`123abc`) is one bad token, not two
        if !self.at_boundary() {
            return Err(self.unrecognized(TokenType::Constant, start, line, col));
        }

        Ok(TokenType::Constant)
    }

    fn identifier(&mut self, start: usize, line: i32, col: i32) -> Result<TokenType, LexError> {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        if !self.at_boundary() {
            return Err(self.unrecognized(TokenType::Identifier, start, line, col));
        }

        let token_type = match &self.source[start..self.offset()] {
            "int" => TokenType::Int,
            "void" => TokenType::Void,
            "return" => TokenType::Return,
            _ => TokenType::Identifier,
        };

        Ok(token_type)
    }

    fn unrecognized(&mut self, expected: TokenType, start: usize, line: i32, col: i32) -> LexError {
        self.skip_error();
        let end = self.offset();

        LexError::UnrecognizedToken {
            expected,
            text: self.source[start..end].to_string(),
            start,
            end,
            line,
            col,
        }
    }

    /// Skip to the next whitespace or semicolon so lexing can resume after a bad token
    fn skip_error(&mut self) {
        while !self.is_eof() && !self.peek().is_whitespace() && self.peek() != ';' {
            self.advance();
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_next()) {
                (c, _) if c.is_whitespace() => {
                    self.advance();
                }
                ('/', '/') => {
                    while !self.is_eof() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                ('/', '*') => {
                    self.advance();
                    self.advance();

                    // an unterminated comment runs to the end of the file
                    while !self.is_eof() && !(self.peek() == '*' && self.peek_next() == '/') {
                        self.advance();
                    }
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Get offset into source text
    fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Whether an identifier or constant may end here
    fn at_boundary(&self) -> bool {
        self.is_eof() || is_boundary(self.peek())
    }

    fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF)
    }

    fn peek_next(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;

        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }

        Some(c)
    }
}

/// Characters allowed to directly follow an identifier or constant
fn is_boundary(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '(' | ')' | '{' | '}' | ';' | '~' | '+' | '-' | '*' | '/' | '%'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenType::*;

    fn kinds(src: &str) -> Vec<TokenType> {
        Lexer::new(src)
            .tokenize()
            .map(|t| t.expect("source should lex cleanly").kind)
            .collect()
    }

    #[test]
    fn single_char_punctuation() {
        let cases = [
            ("{", OpenBrace),
            ("}", CloseBrace),
            ("(", OpenParen),
            (")", CloseParen),
            (";", Semicolon),
            ("+", Plus),
            ("*", Star),
            ("%", Percent),
            ("~", Tilde),
            ("-", Minus),
            ("/", Slash),
        ];

        for (src, expected) in cases {
            let mut lexer = Lexer::new(src);
            let token = lexer.next_token().unwrap();

            assert_eq!(token.kind, expected);
            assert_eq!((token.start, token.end), (0, 1));
            assert_eq!(lexer.next_token().unwrap().kind, Eof);
        }
    }

    #[test]
    fn keywords() {
        assert_eq!(kinds("int void return"), vec![Int, Void, Return]);
    }

    #[test]
    fn keyword_prefix_is_identifier() {
        let src = "return1";
        let tokens: Vec<_> = Lexer::new(src).tokenize().collect();

        assert_eq!(tokens.len(), 1);
        let token = tokens[0].clone().unwrap();
        assert_eq!(token.kind, Identifier);
        assert_eq!(token.text(src), "return1");
    }

    #[test]
    fn minus_minus() {
        let src = "int main(void) { --5; }";

        assert_eq!(
            kinds(src).into_iter().filter(|k| *k == MinusMinus).count(),
            1
        );
    }

    #[test]
    fn double_minus_paren() {
        let tokens = kinds("int main(void) { -(-5); }");

        assert_eq!(tokens.iter().filter(|k| **k == MinusMinus).count(), 0);
        assert_eq!(tokens.iter().filter(|k| **k == Minus).count(), 2)
    }

    #[test]
    fn full_function() {
        let src = "int main(void) {\n    return 2;\n}";
        let expected = vec![
            Int, Identifier, OpenParen, Void, CloseParen, OpenBrace, Return, Constant, Semicolon,
            CloseBrace,
        ];

        assert_eq!(kinds(src), expected)
    }

    #[test]
    fn comments_are_skipped() {
        let src = "// leading\nreturn /* inline */ 1; /* multi\nline */ // trailing";

        assert_eq!(kinds(src), vec![Return, Constant, Semicolon]);
    }

    #[test]
    fn slash_is_division_outside_comments() {
        assert_eq!(kinds("6/3"), vec![Constant, Slash, Constant]);
    }

    #[test]
    fn unterminated_block_comment() {
        assert_eq!(kinds("return /* never closed"), vec![Return]);
    }

    #[test]
    fn constant_followed_by_letters() {
        let src = "123abc";
        let mut lexer = Lexer::new(src);

        assert_eq!(
            lexer.next_token(),
            Err(LexError::UnrecognizedToken {
                expected: Constant,
                text: "123abc".to_string(),
                start: 0,
                end: 6,
                line: 1,
                col: 1,
            })
        );
        assert_eq!(lexer.next_token().unwrap().kind, Eof);
    }

    #[test]
    fn recovers_after_bad_token() {
        let src = "return 1foo; 2";
        let results: Vec<_> = Lexer::new(src).tokenize().collect();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].clone().unwrap().kind, Return);
        assert!(matches!(
            results[1],
            Err(LexError::UnrecognizedToken {
                expected: Constant,
                ..
            })
        ));
        assert_eq!(results[2].clone().unwrap().kind, Semicolon);
        assert_eq!(results[3].clone().unwrap().kind, Constant);
    }

    #[test]
    fn bad_identifier() {
        let src = "ma@in x";
        let mut lexer = Lexer::new(src);

        let err = lexer.next_token().unwrap_err();
        assert!(matches!(
            err,
            LexError::UnrecognizedToken {
                expected: Identifier,
                ..
            }
        ));
        assert!(matches!(err, LexError::UnrecognizedToken { start: 0, end: 5, .. }));
        assert_eq!(lexer.next_token().unwrap().kind, Identifier);
    }

    #[test]
    fn unexpected_char() {
        let mut lexer = Lexer::new("$ 1");

        assert!(matches!(
            lexer.next_token(),
            Err(LexError::UnexpectedChar { ch: '$', .. })
        ));
        assert_eq!(lexer.next_token().unwrap().kind, Constant);
    }

    #[test]
    fn nul_after_constant_is_not_a_boundary() {
        let src = "return 12\0;";
        let results: Vec<_> = Lexer::new(src).tokenize().collect();

        assert_eq!(
            results[1],
            Err(LexError::UnrecognizedToken {
                expected: Constant,
                text: "12\0".to_string(),
                start: 7,
                end: 10,
                line: 1,
                col: 8,
            })
        );
        assert_eq!(results[2].clone().unwrap().kind, Semicolon);
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lexer = Lexer::new("  ");

        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, Eof);
        }
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut lexer = Lexer::new("int\n  main");

        let int = lexer.next_token().unwrap();
        let main = lexer.next_token().unwrap();

        assert_eq!((int.line, int.col), (1, 1));
        assert_eq!((main.line, main.col), (2, 3));
    }
}
