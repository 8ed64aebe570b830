pub mod error;
pub mod expressions;
pub mod statements;

use log::debug;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::parse_statement;

pub struct Parser {
    pub iter: std::iter::Peekable<std::vec::IntoIter<Token>>,
    /// `{` consumed but not yet closed by the statement being parsed.
    pub(crate) open_braces: usize,
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let iter = tokens.into_iter().collect::<Vec<_>>().into_iter().peekable();
        Self {
            iter,
            open_braces: 0,
            depth: 0,
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    pub(crate) fn skip_semicolon(&mut self) {
        self.iter.next_if(|token| token.kind == TokenKind::SemiColon);
    }

    /// Parses every statement it can, collecting one error per statement that
    /// failed. After a failure, input is skipped up to the next `;` outside of
    /// any brace the failed statement opened.
    pub fn parse(&mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while self.iter.peek().is_some() {
            self.open_braces = 0;
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                    self.skip_semicolon();
                }
                Err(err) => {
                    debug!("recovering from parse error: {}", err);
                    self.recover(&err);
                    errors.push(err);
                }
            }
        }

        (Program { statements }, errors)
    }

    fn recover(&mut self, err: &ParseError) {
        let mut open = self.open_braces;
        match err.token().map(|token| &token.kind) {
            Some(TokenKind::SemiColon) if open == 0 => return,
            Some(TokenKind::LBrace) => open += 1,
            Some(TokenKind::RBrace) => open = open.saturating_sub(1),
            _ => {}
        }

        for token in self.iter.by_ref() {
            match token.kind {
                TokenKind::LBrace => open += 1,
                TokenKind::RBrace => open = open.saturating_sub(1),
                TokenKind::SemiColon if open == 0 => break,
                _ => {}
            }
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let (program, errors) = self.parse();
        if errors.is_empty() {
            Ok(program)
        } else {
            Err(errors)
        }
    }
}
