use std::fmt;
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line the token starts on
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Token { kind, line }
    }

    fn element(&self) -> &'static str {
        match self.kind {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::IntegerConstant(_) | TokenKind::IntegerOverflow(_) => "intConst",
            TokenKind::StringConstant(_) => "stringConst",
            TokenKind::Error(_) => "error",
        }
    }

    fn contents(&self) -> String {
        match &self.kind {
            TokenKind::Keyword(kw) => kw.to_string(),
            TokenKind::Symbol(sym) => sym.to_string(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::IntegerConstant(val) => val.to_string(),
            TokenKind::StringConstant(text) => text.clone(),
            TokenKind::IntegerOverflow(lexeme) | TokenKind::Error(lexeme) => lexeme.clone(),
        }
    }

    /// `<keyword> class </keyword>`
    pub fn to_xml(&self) -> String {
        let contents = self
            .contents()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;");
        format!("<{0}> {1} </{0}>", self.element(), contents)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.element(), self.contents())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier(String),
    IntegerConstant(u32),
    StringConstant(String),
    /// Digit run too large for `IntegerConstant`
    IntegerOverflow(String),

    // Special
    Error(String), // Unrecognized input, skipped by the parser
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LCurly,
    RCurly,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Period,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Ampersand,
    Pipe,
    LAngle,
    RAngle,
    Equal,
    Tilde,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::LCurly => "{",
            Symbol::RCurly => "}",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::LBracket => "[",
            Symbol::RBracket => "]",
            Symbol::Period => ".",
            Symbol::Comma => ",",
            Symbol::Semicolon => ";",
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Star => "*",
            Symbol::Slash => "/",
            Symbol::Ampersand => "&",
            Symbol::Pipe => "|",
            Symbol::LAngle => "<",
            Symbol::RAngle => ">",
            Symbol::Equal => "=",
            Symbol::Tilde => "~",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
