use log::{debug, trace};

use ast::*;
use lexer::*;

use crate::ParseError;

/// Recursive descent parser pulling tokens from the lexer with a single token of lookahead
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: None,
        }
    }

    pub fn parse(&mut self) -> Result<TranslationUnit, ParseError> {
        let func = self.parse_func()?;
        self.expect(TokenType::Eof)?;

        debug!("parsed function '{}'", func.ident);

        Ok(TranslationUnit { func })
    }

    fn parse_func(&mut self) -> Result<Func, ParseError> {
        self.expect(TokenType::Int)?;
        let ident = self.parse_ident()?;

        self.expect(TokenType::OpenParen)?;
        self.expect(TokenType::Void)?;
        self.expect(TokenType::CloseParen)?;
        self.expect(TokenType::OpenBrace)?;

        let body = self.parse_stmt()?;

        self.expect(TokenType::CloseBrace)?;

        Ok(Func { ident, body })
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        let token = self.expect(TokenType::Identifier)?;
        Ok(self.text(&token).to_string())
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::Return)?;

        let expr = self.parse_expr(0)?;

        self.expect(TokenType::Semicolon)?;

        Ok(Stmt::Return { expr })
    }

    /// Precedence climbing: folds every binary operator binding at least as tightly as `min_prec`
    pub(crate) fn parse_expr(&mut self, min_prec: i32) -> Result<Expr, ParseError> {
        trace!("parsing expression, min precedence {}", min_prec);

        let mut left = self.parse_factor()?;

        while let Some(op) = get_binop(self.peek()?.kind) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.advance()?;
            let right = self.parse_expr(prec + 1)?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance()?;

        match token.kind {
            TokenType::Constant => {
                let text = self.text(&token);

                match text.parse::<i32>() {
                    Ok(val) => Ok(Expr::Constant(val)),
                    Err(_) => Err(ParseError::InvalidConstant {
                        text: text.to_string(),
                        line: token.line,
                        col: token.col,
                    }),
                }
            }
            TokenType::Minus | TokenType::Tilde => {
                let op = match token.kind {
                    TokenType::Minus => UnaryOp::Negate,
                    _ => UnaryOp::Complement,
                };
                let expr = self.parse_factor()?;

                Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                })
            }
            TokenType::OpenParen => {
                let expr = self.parse_expr(0)?;
                self.expect(TokenType::CloseParen)?;

                Ok(expr)
            }
            found => Err(ParseError::ExpectedFactor {
                found,
                text: self.text(&token).to_string(),
                line: token.line,
                col: token.col,
            }),
        }
    }

    /// Checks if next token is of correct expected type
    fn expect(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        let token = self.advance()?;

        if token.kind == expected {
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                expected,
                found: token.kind,
                text: self.text(&token).to_string(),
                line: token.line,
                col: token.col,
            })
        }
    }

    /// Consume the lookahead token
    fn advance(&mut self) -> Result<Token, ParseError> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn peek(&mut self) -> Result<Token, ParseError> {
        match self.current {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.current = Some(token);
                Ok(token)
            }
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.lexer.source())
    }
}

fn get_binop(token: TokenType) -> Option<BinaryOp> {
    match token {
        TokenType::Plus => Some(BinaryOp::Add),
        TokenType::Minus => Some(BinaryOp::Subtract),
        TokenType::Star => Some(BinaryOp::Multiply),
        TokenType::Slash => Some(BinaryOp::Divide),
        TokenType::Percent => Some(BinaryOp::Remainder),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use lexer::*;

    use super::*;

    fn parse_expr(src: &str) -> Expr {
        Parser::new(Lexer::new(src)).parse_expr(0).unwrap()
    }

    fn constant(val: i32) -> Box<Expr> {
        Box::new(Expr::Constant(val))
    }

    #[test]
    fn simple_add() {
        assert_eq!(
            parse_expr("3 + 5"),
            Expr::Binary {
                op: BinaryOp::Add,
                left: constant(3),
                right: constant(5),
            }
        )
    }

    #[test]
    fn simple_mod() {
        assert_eq!(
            parse_expr("3 % 5"),
            Expr::Binary {
                op: BinaryOp::Remainder,
                left: constant(3),
                right: constant(5),
            }
        )
    }

    #[test]
    fn mul_binds_tighter_than_add() {
        assert_eq!(
            parse_expr("1+2*3"),
            Expr::Binary {
                op: BinaryOp::Add,
                left: constant(1),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Multiply,
                    left: constant(2),
                    right: constant(3),
                }),
            }
        )
    }

    #[test]
    fn sub_is_left_associative() {
        assert_eq!(
            parse_expr("1-2-3"),
            Expr::Binary {
                op: BinaryOp::Subtract,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Subtract,
                    left: constant(1),
                    right: constant(2),
                }),
                right: constant(3),
            }
        )
    }

    #[test]
    fn add_mul() {
        assert_eq!(
            parse_expr("3 + 5 + 6 * 2"),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    left: constant(3),
                    right: constant(5),
                }),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Multiply,
                    left: constant(6),
                    right: constant(2),
                }),
            }
        )
    }

    #[test]
    fn parens_reset_precedence() {
        assert_eq!(
            parse_expr("(1 + 2) * 3"),
            Expr::Binary {
                op: BinaryOp::Multiply,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    left: constant(1),
                    right: constant(2),
                }),
                right: constant(3),
            }
        )
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        assert_eq!(
            parse_expr("-2 + ~(-3)"),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Unary {
                    op: UnaryOp::Negate,
                    expr: constant(2),
                }),
                right: Box::new(Expr::Unary {
                    op: UnaryOp::Complement,
                    expr: Box::new(Expr::Unary {
                        op: UnaryOp::Negate,
                        expr: constant(3),
                    }),
                }),
            }
        )
    }

    #[test]
    fn full_program() {
        let src = "int main(void) {\n    return -2 + 3 * 4;\n}\n";
        let ast = Parser::new(Lexer::new(src)).parse().unwrap();

        assert_eq!(ast.func.ident, "main");
        let Stmt::Return { expr } = ast.func.body;
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn missing_expression() {
        let src = "int main(void){return ;}";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert!(matches!(
            err,
            ParseError::ExpectedFactor {
                found: TokenType::Semicolon,
                ..
            }
        ));
    }

    #[test]
    fn decrement_is_not_a_factor() {
        let src = "int main(void){return --2;}";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert!(matches!(
            err,
            ParseError::ExpectedFactor {
                found: TokenType::MinusMinus,
                ..
            }
        ));
    }

    #[test]
    fn missing_semicolon() {
        let src = "int main(void){return 2}";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenType::Semicolon,
                found: TokenType::CloseBrace,
                text: "}".to_string(),
                line: 1,
                col: 24,
            }
        );
    }

    #[test]
    fn trailing_tokens() {
        let src = "int main(void){return 2;} foo";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenType::Eof,
                found: TokenType::Identifier,
                ..
            }
        ));
    }

    #[test]
    fn constant_out_of_range() {
        let src = "int main(void){return 2147483648;}";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert!(matches!(err, ParseError::InvalidConstant { .. }));
    }

    #[test]
    fn lex_error_is_fatal() {
        let src = "int main(void){return 12ab;}";
        let err = Parser::new(Lexer::new(src)).parse().unwrap_err();

        assert!(matches!(err, ParseError::Lex(_)));
    }
}
