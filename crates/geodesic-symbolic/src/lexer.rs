//! Tokenizer for infix expression strings.
//!
//! ```
//! use geodesic_symbolic::lexer::{tokenize, Token};
//!
//! let tokens = tokenize("r**2*sin(th)").unwrap();
//! assert_eq!(tokens[1], Token::Caret);
//! ```

use crate::error::{Result, SymbolicError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(String),
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ or **

    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.consume();
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.consume();
        }
        self.input[start..self.position].to_string()
    }

    /// Next token, `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let single = |t: Token| -> Result<Option<Token>> { Ok(Some(t)) };
        match ch {
            '+' => {
                self.consume();
                single(Token::Plus)
            }
            '-' => {
                self.consume();
                single(Token::Minus)
            }
            '*' => {
                self.consume();
                if self.peek() == Some('*') {
                    self.consume();
                    single(Token::Caret)
                } else {
                    single(Token::Star)
                }
            }
            '/' => {
                self.consume();
                single(Token::Slash)
            }
            '^' => {
                self.consume();
                single(Token::Caret)
            }
            '(' => {
                self.consume();
                single(Token::LParen)
            }
            ')' => {
                self.consume();
                single(Token::RParen)
            }
            ',' => {
                self.consume();
                single(Token::Comma)
            }
            c if c.is_ascii_digit() || c == '.' => {
                let text = self.read_while(|c| c.is_ascii_digit() || c == '.');
                single(Token::Number(text))
            }
            c if c.is_alphabetic() || c == '_' => {
                let text = self.read_while(|c| c.is_alphanumeric() || c == '_');
                single(Token::Ident(text))
            }
            other => Err(SymbolicError::UnexpectedToken {
                found: other.to_string(),
                position: self.position,
            }),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_operators_and_calls() {
        let tokens = tokenize("r*sin(th)^2 - 1/2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("r".into()),
                Token::Star,
                Token::Ident("sin".into()),
                Token::LParen,
                Token::Ident("th".into()),
                Token::RParen,
                Token::Caret,
                Token::Number("2".into()),
                Token::Minus,
                Token::Number("1".into()),
                Token::Slash,
                Token::Number("2".into()),
            ]
        );
    }

    #[test]
    fn double_star_is_power() {
        assert_eq!(tokenize("x**2").unwrap()[1], Token::Caret);
    }

    #[test]
    fn identifiers_keep_underscores_and_digits() {
        assert_eq!(tokenize("e_1 x2").unwrap(), vec![Token::Ident("e_1".into()), Token::Ident("x2".into())]);
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(matches!(
            tokenize("x # y"),
            Err(SymbolicError::UnexpectedToken { position: 2, .. })
        ));
    }
}
