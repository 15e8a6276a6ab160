//! Recursive descent parser for infix expression strings.
//!
//! ## Grammar
//!
//! ```text
//! <expr>   ::= <term> { ("+" | "-") <term> }
//! <term>   ::= <unary> { ("*" | "/") <unary> }
//! <unary>  ::= ("+" | "-") <unary> | <power>
//! <power>  ::= <atom> [ "^" <unary> ]               // right associative
//! <atom>   ::= <number> | <ident> [ "(" <expr> { "," <expr> } ")" ] | "(" <expr> ")"
//! ```
//!
//! Identifiers become commutative symbols. `sin`, `cos`, `tan`, `exp`, `log`,
//! `abs` and `sqrt` are the built-in functions; any other identifier followed
//! by an argument list is an undefined function.
//!
//! ```
//! use geodesic_symbolic::{parse, Expr};
//!
//! let e = parse("r**2*sin(th)^2").unwrap();
//! assert_eq!(e.to_string(), "r^2*sin(th)^2");
//! ```

use crate::error::{Result, SymbolicError};
use crate::expr::Expr;
use crate::lexer::{tokenize, Token};
use crate::number::parse_rational;
use std::str::FromStr;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, position: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned()?;
        self.position += 1;
        Some(token)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.consume() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(SymbolicError::UnexpectedToken {
                found: token.to_string(),
                position: self.position - 1,
            }),
            None => Err(SymbolicError::UnexpectedEnd {
                expected: expected.to_string(),
            }),
        }
    }

    /// Parse a complete expression, rejecting trailing tokens.
    pub fn parse_complete(&mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(SymbolicError::UnexpectedToken {
                found: token.to_string(),
                position: self.position,
            }),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut terms = vec![self.parse_term()?];
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.consume();
                    terms.push(self.parse_term()?);
                }
                Some(Token::Minus) => {
                    self.consume();
                    terms.push(-self.parse_term()?);
                }
                _ => break,
            }
        }
        Ok(Expr::add(terms))
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut factors = vec![self.parse_unary()?];
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.consume();
                    factors.push(self.parse_unary()?);
                }
                Some(Token::Slash) => {
                    self.consume();
                    factors.push(Expr::pow(self.parse_unary()?, Expr::int(-1)));
                }
                _ => break,
            }
        }
        Ok(Expr::mul(factors))
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.consume();
            let exp = self.parse_unary()?;
            return Ok(Expr::pow(base, exp));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let position = self.position;
        match self.consume() {
            Some(Token::Number(text)) => parse_rational(&text)
                .map(Expr::Num)
                .ok_or(SymbolicError::InvalidNumber(text)),
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.consume();
                    let args = self.parse_args()?;
                    Ok(Expr::func(name, args))
                } else {
                    Ok(Expr::sym(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(SymbolicError::UnexpectedToken {
                found: token.to_string(),
                position,
            }),
            None => Err(SymbolicError::UnexpectedEnd {
                expected: "an operand".to_string(),
            }),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = vec![self.parse_expr()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.consume();
            args.push(self.parse_expr()?);
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }
}

/// Parse an infix expression string.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SymbolicError::UnexpectedEnd {
            expected: "an expression".to_string(),
        });
    }
    Parser::new(tokens).parse_complete()
}

impl FromStr for Expr {
    type Err = SymbolicError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::sym("x")
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(parse("1 + 2*3").unwrap(), Expr::int(7));
        assert_eq!(parse("2^3^2").unwrap(), Expr::int(512));
        assert_eq!(parse("-x^2").unwrap(), -Expr::pow(x(), Expr::int(2)));
        assert_eq!(parse("x^-1").unwrap(), Expr::pow(x(), Expr::int(-1)));
        assert_eq!(parse("8/4/2").unwrap(), Expr::one());
    }

    #[test]
    fn exact_literals() {
        assert_eq!(parse("1/2").unwrap(), Expr::half());
        assert_eq!(parse("0.25").unwrap(), Expr::rational(1, 4));
    }

    #[test]
    fn functions_and_undefined_functions() {
        assert_eq!(parse("sqrt(4)").unwrap(), Expr::int(2));
        assert_eq!(parse("sin(0)").unwrap(), Expr::zero());
        let g = parse("g_r_th(r, th)").unwrap();
        assert_eq!(g, Expr::Func("g_r_th".into(), vec![Expr::sym("r"), Expr::sym("th")]));
    }

    #[test]
    fn embedding_component() {
        let e: Expr = "r*sin(th)*cos(ph)".parse().unwrap();
        let expected = Expr::sym("r") * Expr::sin(Expr::sym("th")) * Expr::cos(Expr::sym("ph"));
        assert_eq!(e, expected);
    }

    #[test]
    fn reports_errors() {
        assert!(matches!(parse(""), Err(SymbolicError::UnexpectedEnd { .. })));
        assert!(matches!(parse("x +"), Err(SymbolicError::UnexpectedEnd { .. })));
        assert!(matches!(parse("(x"), Err(SymbolicError::UnexpectedEnd { .. })));
        assert!(matches!(parse("x y"), Err(SymbolicError::UnexpectedToken { position: 1, .. })));
        assert!(matches!(parse("1.2.3"), Err(SymbolicError::InvalidNumber(_))));
        assert!(matches!(parse("*x"), Err(SymbolicError::UnexpectedToken { position: 0, .. })));
    }
}
