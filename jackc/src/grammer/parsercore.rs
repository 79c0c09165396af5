use super::ast::Ident;
use super::token::{Keyword, Symbol, Token, TokenKind};
use crate::error::SyntaxError;
use std::iter::Peekable;

pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    /// Line of the last consumed token
    line: usize,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Skip all invalid tokens
    fn skip(&mut self) {
        while let Some(token) = self.tokens.peek() {
            match &token.kind {
                TokenKind::Error(_) => self.tokens.next(),
                _ => break,
            };
        }
    }

    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip();
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.skip();
        let token = self.tokens.next();
        if let Some(token) = &token {
            self.line = token.line;
        }
        token
    }

    /// Next token, or an end-of-file error naming what was wanted
    pub fn next_or_eof(&mut self, expected: &str) -> Result<Token, SyntaxError> {
        self.next().ok_or_else(|| SyntaxError::UnexpectedEof {
            expected: expected.to_string(),
            line: self.line,
        })
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.peek().is_some_and(cond)
    }

    pub fn peek_keyword(&mut self, kw: Keyword) -> bool {
        self.check_if(|token| matches!(token.kind, TokenKind::Keyword(k) if k == kw))
    }

    pub fn peek_symbol(&mut self, sym: Symbol) -> bool {
        self.check_if(|token| matches!(token.kind, TokenKind::Symbol(s) if s == sym))
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<(), SyntaxError> {
        let token = self.next_or_eof(&format!("`{kw}`"))?;
        match token.kind {
            TokenKind::Keyword(k) if k == kw => Ok(()),
            _ => Err(SyntaxError::ExpectedKeyword {
                expected: kw,
                found: token,
            }),
        }
    }

    pub fn expect_keyword_choice(&mut self, kws: &[Keyword]) -> Result<Keyword, SyntaxError> {
        let token = self.next_or_eof("keyword")?;
        match token.kind {
            TokenKind::Keyword(k) if kws.contains(&k) => Ok(k),
            _ => Err(SyntaxError::ExpectedKeywordChoice {
                expected: kws.to_vec(),
                found: token,
            }),
        }
    }

    pub fn expect_symbol(&mut self, sym: Symbol) -> Result<(), SyntaxError> {
        let token = self.next_or_eof(&format!("`{sym}`"))?;
        match token.kind {
            TokenKind::Symbol(s) if s == sym => Ok(()),
            _ => Err(SyntaxError::ExpectedSymbol {
                expected: sym,
                found: token,
            }),
        }
    }

    pub fn expect_symbol_choice(&mut self, syms: &[Symbol]) -> Result<Symbol, SyntaxError> {
        let token = self.next_or_eof("symbol")?;
        match token.kind {
            TokenKind::Symbol(s) if syms.contains(&s) => Ok(s),
            _ => Err(SyntaxError::ExpectedSymbolChoice {
                expected: syms.to_vec(),
                found: token,
            }),
        }
    }

    pub fn parse_ident(&mut self) -> Result<Ident, SyntaxError> {
        let token = self.next_or_eof("identifier")?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(Ident::new(name, token.line)),
            _ => Err(SyntaxError::ExpectedIdentifier { found: token }),
        }
    }
}

/// Consume the trigger symbol and parse what follows it, if present
#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:expr, $following:expr) => {
        if $parser.peek_symbol($trigger) {
            $parser.expect_symbol($trigger)?;
            Some($following)
        } else {
            None
        }
    };
}

/// Parse repeated elements, consuming the terminal symbol
/// 3 args: { element } terminal (no delimiter)
/// 4 args: [ element { delimiter element } ] terminal (with delimiter)
#[macro_export]
macro_rules! repeat {
    // Without delimiter: { element } terminal
    ($parser:expr, $elem:expr, $terminal:expr) => {{
        let mut items = Vec::new();
        while !$parser.peek_symbol($terminal) {
            items.push($elem?);
        }
        $parser.expect_symbol($terminal)?;
        items
    }};

    // With delimiter: [ element { delimiter element } ] terminal
    ($parser:expr, $elem:expr, $delimiter:expr, $terminal:expr) => {{
        let mut items = Vec::new();
        if $parser.peek_symbol($terminal) {
            $parser.expect_symbol($terminal)?;
        } else {
            loop {
                items.push($elem?);
                if $parser.expect_symbol_choice(&[$delimiter, $terminal])? == $terminal {
                    break;
                }
            }
        }
        items
    }};
}
