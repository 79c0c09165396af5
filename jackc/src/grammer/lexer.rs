use super::token::{Keyword, Symbol, Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Skip,
    Ident,
    Int,
    Text,
    LineComment,
    BlockComment,
}

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    mode: Mode,
    line: usize,
    // Line where the token in `accum` started
    start: usize,
    accum: String,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars().peekable(),
            mode: Mode::Skip,
            line: 1,
            start: 1,
            accum: String::new(),
            tokens: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Vec<Token> {
        while let Some(ch) = self.iter.next() {
            match self.mode {
                Mode::Skip => self.skip(ch),
                Mode::Ident => {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        self.accum.push(ch);
                    } else {
                        self.finish_word();
                        self.skip(ch);
                    }
                }
                Mode::Int => {
                    if ch.is_ascii_digit() {
                        self.accum.push(ch);
                    } else {
                        self.finish_int();
                        self.skip(ch);
                    }
                }
                Mode::Text => {
                    if ch == '"' {
                        let text = std::mem::take(&mut self.accum);
                        self.push(TokenKind::StringConstant(text));
                        self.mode = Mode::Skip;
                    } else {
                        self.accum.push(ch);
                    }
                }
                Mode::LineComment => {
                    if ch == '\n' {
                        self.mode = Mode::Skip;
                    }
                }
                Mode::BlockComment => {
                    if ch == '*' && self.iter.next_if_eq(&'/').is_some() {
                        self.mode = Mode::Skip;
                    }
                }
            }
            if ch == '\n' {
                self.line += 1;
            }
        }
        self.finish();
        self.tokens
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.start));
    }

    fn begin(&mut self, mode: Mode) {
        self.mode = mode;
        self.start = self.line;
    }

    /// Handle a character outside of any token.
    fn skip(&mut self, ch: char) {
        self.mode = Mode::Skip;
        self.start = self.line;

        // 0. Whitespace
        if ch.is_whitespace() {
            return;
        }

        // 1. Identifier or keyword
        if ch.is_ascii_alphabetic() || ch == '_' {
            self.begin(Mode::Ident);
            self.accum.push(ch);
            return;
        }

        // 2. Number literal
        if ch.is_ascii_digit() {
            self.begin(Mode::Int);
            self.accum.push(ch);
            return;
        }

        // 3. String literal
        if ch == '"' {
            self.begin(Mode::Text);
            return;
        }

        // 4. Comment
        if ch == '/' {
            if self.iter.next_if_eq(&'/').is_some() {
                self.begin(Mode::LineComment);
                return;
            }
            if self.iter.next_if_eq(&'*').is_some() {
                self.begin(Mode::BlockComment);
                return;
            }
        }

        // 5. Single character token
        if let Some(sym) = single_char_token(ch) {
            self.push(TokenKind::Symbol(sym));
            return;
        }

        // Error
        tracing::debug!(line = self.line, "unexpected character {ch:?}");
        self.push(TokenKind::Error(ch.to_string()));
    }

    fn finish_word(&mut self) {
        let word = std::mem::take(&mut self.accum);
        match word.parse::<Keyword>() {
            Ok(kw) => self.push(TokenKind::Keyword(kw)),
            Err(_) => self.push(TokenKind::Identifier(word)),
        }
    }

    fn finish_int(&mut self) {
        let lexeme = std::mem::take(&mut self.accum);
        match lexeme.parse::<u32>() {
            Ok(value) => self.push(TokenKind::IntegerConstant(value)),
            Err(_) => self.push(TokenKind::IntegerOverflow(lexeme)),
        }
    }

    /// Flush whatever the input ended in the middle of.
    fn finish(&mut self) {
        match self.mode {
            Mode::Ident => self.finish_word(),
            Mode::Int => self.finish_int(),
            Mode::Text => {
                let lexeme = format!("\"{}", std::mem::take(&mut self.accum));
                self.push(TokenKind::Error(lexeme));
            }
            Mode::BlockComment => self.push(TokenKind::Error("/*".to_string())),
            Mode::Skip | Mode::LineComment => {}
        }
        self.mode = Mode::Skip;
    }
}

fn single_char_token(ch: char) -> Option<Symbol> {
    match ch {
        '{' => Some(Symbol::LCurly),
        '}' => Some(Symbol::RCurly),
        '(' => Some(Symbol::LParen),
        ')' => Some(Symbol::RParen),
        '[' => Some(Symbol::LBracket),
        ']' => Some(Symbol::RBracket),
        '.' => Some(Symbol::Period),
        ',' => Some(Symbol::Comma),
        ';' => Some(Symbol::Semicolon),
        '+' => Some(Symbol::Plus),
        '-' => Some(Symbol::Minus),
        '*' => Some(Symbol::Star),
        '/' => Some(Symbol::Slash),
        '&' => Some(Symbol::Ampersand),
        '|' => Some(Symbol::Pipe),
        '<' => Some(Symbol::LAngle),
        '>' => Some(Symbol::RAngle),
        '=' => Some(Symbol::Equal),
        '~' => Some(Symbol::Tilde),
        _ => None,
    }
}
