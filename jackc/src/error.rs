use crate::grammer::ast::{Ident, Type};
use crate::grammer::token::{Keyword, Symbol, Token};
use crate::symbols::Sym;
use itertools::Itertools;
use std::fmt::Display;
use thiserror::Error;

/// Parse-time errors. The first one aborts the current file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("Expected keyword `{expected}`, got {found}")]
    ExpectedKeyword { expected: Keyword, found: Token },

    #[error("Expected one of {}, got {found}", choices(.expected))]
    ExpectedKeywordChoice { expected: Vec<Keyword>, found: Token },

    #[error("Expected symbol `{expected}`, got {found}")]
    ExpectedSymbol { expected: Symbol, found: Token },

    #[error("Expected one of {}, got {found}", choices(.expected))]
    ExpectedSymbolChoice { expected: Vec<Symbol>, found: Token },

    #[error("Expected type, got {found}")]
    ExpectedType { found: Token },

    #[error("Expected non-void type, got {found}")]
    ExpectedNonVoidType { found: Token },

    #[error("Expected identifier, got {found}")]
    ExpectedIdentifier { found: Token },

    #[error("Unexpected keyword {found}")]
    UnexpectedKeyword { found: Token },

    #[error("Unexpected symbol {found}")]
    UnexpectedSymbol { found: Token },

    #[error("Integer constant out of range, got {found}")]
    IntegerOverflow { found: Token },

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String, line: usize },

    #[error("Duplicate declaration of `{name}` (first declared on line {previous})")]
    Duplicate { name: Ident, previous: usize },
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::ExpectedKeyword { found, .. }
            | SyntaxError::ExpectedKeywordChoice { found, .. }
            | SyntaxError::ExpectedSymbol { found, .. }
            | SyntaxError::ExpectedSymbolChoice { found, .. }
            | SyntaxError::ExpectedType { found }
            | SyntaxError::ExpectedNonVoidType { found }
            | SyntaxError::ExpectedIdentifier { found }
            | SyntaxError::UnexpectedKeyword { found }
            | SyntaxError::UnexpectedSymbol { found }
            | SyntaxError::IntegerOverflow { found } => found.line,
            SyntaxError::UnexpectedEof { line, .. } => *line,
            SyntaxError::Duplicate { name, .. } => name.line,
        }
    }

    /// The offending token, if the error was raised on one
    pub fn token(&self) -> Option<&Token> {
        match self {
            SyntaxError::ExpectedKeyword { found, .. }
            | SyntaxError::ExpectedKeywordChoice { found, .. }
            | SyntaxError::ExpectedSymbol { found, .. }
            | SyntaxError::ExpectedSymbolChoice { found, .. }
            | SyntaxError::ExpectedType { found }
            | SyntaxError::ExpectedNonVoidType { found }
            | SyntaxError::ExpectedIdentifier { found }
            | SyntaxError::UnexpectedKeyword { found }
            | SyntaxError::UnexpectedSymbol { found }
            | SyntaxError::IntegerOverflow { found } => Some(found),
            SyntaxError::UnexpectedEof { .. } | SyntaxError::Duplicate { .. } => None,
        }
    }
}

/// Code generation errors. The first one abandons the current class.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenError {
    #[error("Expected variable, got {}", found_or_unknown(.ident, .found))]
    ExpectedVariable { ident: Ident, found: Option<Sym> },

    #[error("Expected call target, got {}", describe(.ident, .found))]
    ExpectedCallTarget { ident: Ident, found: Sym },

    #[error("Unknown identifier `{ident}`")]
    UnknownIdentifier { ident: Ident },

    #[error("Expected class type for `{ident}`, got {got}")]
    ExpectedClassType { ident: Ident, got: Type },
}

impl GenError {
    pub fn line(&self) -> usize {
        match self {
            GenError::ExpectedVariable { ident, .. }
            | GenError::ExpectedCallTarget { ident, .. }
            | GenError::UnknownIdentifier { ident }
            | GenError::ExpectedClassType { ident, .. } => ident.line,
        }
    }
}

/// Unified error type for the driver
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to read config: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Generated code failed verification at {0}:{1}: {2}")]
    Verify(String, usize, String),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Gen(#[from] GenError),
}

fn choices<T: Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("`{item}`")).join(", ")
}

fn describe(ident: &Ident, found: &Sym) -> String {
    found.describe(&ident.name)
}

fn found_or_unknown(ident: &Ident, found: &Option<Sym>) -> String {
    match found {
        Some(sym) => sym.describe(&ident.name),
        None => format!("unknown identifier `{}`", ident.name),
    }
}
