use std::fmt::Display;

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    PrematureEndOfInput { expected: Expected },
    #[error("expected {expected}, got {got}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("could not parse {} as integer at {}..{}", .0.literal(), .0.start, .0.end)]
    InvalidInteger(Token),
    #[error("no prefix parse function for {0} found")]
    NoPrefixFunction(Token),
    #[error("illegal token {0}")]
    IllegalToken(Token),
    #[error("expression nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

impl ParseError {
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseError::UnexpectedToken { got, .. } => Some(got),
            ParseError::InvalidInteger(token)
            | ParseError::NoPrefixFunction(token)
            | ParseError::IllegalToken(token) => Some(token),
            ParseError::PrematureEndOfInput { .. } | ParseError::NestingTooDeep(_) => None,
        }
    }

    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Option<Token>) -> ParseError {
        Self::unexpected_other(Expected::Token(expected), got)
    }

    pub fn unexpected_other(expected: Expected, got: Option<Token>) -> ParseError {
        match got {
            Some(got) if matches!(got.kind, TokenKind::Illegal(_)) => {
                ParseError::IllegalToken(got)
            }
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => ParseError::PrematureEndOfInput { expected },
        }
    }
}
