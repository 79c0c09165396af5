use super::ast::*;
use super::parsercore::Parser;
use super::token::{Keyword, Symbol, Token, TokenKind};
use crate::error::SyntaxError;
use crate::symbols::{subroutine_scope, Context};
use crate::{optional, repeat};

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Parse every class in the token stream, registering each in `ctx` once complete
    pub fn parse(mut self, ctx: &mut Context) -> Result<Vec<ClassDecl>, SyntaxError> {
        let mut classes = Vec::new();
        while self.peek().is_some() {
            classes.push(self.parse_class(ctx)?);
        }
        Ok(classes)
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// class = "class" ident "{" { class-var-dec | subroutine-dec } "}"
    fn parse_class(&mut self, ctx: &mut Context) -> Result<ClassDecl, SyntaxError> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.parse_ident()?;
        self.expect_symbol(Symbol::LCurly)?;

        let mut vars = Vec::new();
        let mut subs = Vec::new();
        while !self.peek_symbol(Symbol::RCurly) {
            let kw = self.expect_keyword_choice(&[
                Keyword::Static,
                Keyword::Field,
                Keyword::Constructor,
                Keyword::Function,
                Keyword::Method,
            ])?;
            match kw {
                Keyword::Static => vars.push(self.parse_class_var_dec(true)?),
                Keyword::Field => vars.push(self.parse_class_var_dec(false)?),
                Keyword::Constructor => {
                    subs.push(self.parse_subroutine(SubroutineKind::Constructor)?)
                }
                Keyword::Function => subs.push(self.parse_subroutine(SubroutineKind::Function)?),
                Keyword::Method => subs.push(self.parse_subroutine(SubroutineKind::Method)?),
                _ => unreachable!("keyword choice returned {kw}"),
            }
        }
        self.expect_symbol(Symbol::RCurly)?;

        let scope = ctx.class_scope(&name, &vars, &subs)?;
        ctx.declare_class(&name)?;
        tracing::debug!(
            "parsed class {} ({} vars, {} subroutines)",
            name.name,
            vars.len(),
            subs.len()
        );
        Ok(ClassDecl {
            name,
            vars,
            subs,
            scope,
        })
    }

    /// class-var-dec = ( "static" | "field" ) type ident { "," ident } ";"
    fn parse_class_var_dec(&mut self, is_static: bool) -> Result<ClassVarDecl, SyntaxError> {
        let ty = self.parse_type(false)?;
        let names = self.parse_names()?;
        Ok(ClassVarDecl {
            is_static,
            ty,
            names,
        })
    }

    /// var-dec = "var" type ident { "," ident } ";"
    fn parse_var_dec(&mut self) -> Result<VarDecl, SyntaxError> {
        self.expect_keyword(Keyword::Var)?;
        let ty = self.parse_type(false)?;
        let names = self.parse_names()?;
        Ok(VarDecl { ty, names })
    }

    /// ident { "," ident } ";"
    fn parse_names(&mut self) -> Result<Vec<Ident>, SyntaxError> {
        let mut names = vec![self.parse_ident()?];
        while self.expect_symbol_choice(&[Symbol::Comma, Symbol::Semicolon])? == Symbol::Comma {
            names.push(self.parse_ident()?);
        }
        Ok(names)
    }

    /// param = type ident
    fn parse_param(&mut self) -> Result<VarDecl, SyntaxError> {
        let ty = self.parse_type(false)?;
        let name = self.parse_ident()?;
        Ok(VarDecl {
            ty,
            names: vec![name],
        })
    }

    /// type = "int" | "char" | "boolean" | ident  (and "void" for return types)
    fn parse_type(&mut self, allow_void: bool) -> Result<Type, SyntaxError> {
        let token = self.next_or_eof("type")?;
        match token.kind {
            TokenKind::Keyword(Keyword::Int) => Ok(Type::Primitive(Primitive::Int)),
            TokenKind::Keyword(Keyword::Char) => Ok(Type::Primitive(Primitive::Char)),
            TokenKind::Keyword(Keyword::Boolean) => Ok(Type::Primitive(Primitive::Boolean)),
            TokenKind::Keyword(Keyword::Void) if allow_void => Ok(Type::Primitive(Primitive::Void)),
            TokenKind::Keyword(Keyword::Void) => {
                Err(SyntaxError::ExpectedNonVoidType { found: token })
            }
            TokenKind::Identifier(name) => Ok(Type::Class(name)),
            _ => Err(SyntaxError::ExpectedType { found: token }),
        }
    }

    /// subroutine-dec = kind type ident "(" [ param { "," param } ] ")"
    ///                  "{" { var-dec } { stmt } "}"
    fn parse_subroutine(&mut self, kind: SubroutineKind) -> Result<SubroutineDecl, SyntaxError> {
        let ret = self.parse_type(true)?;
        let name = self.parse_ident()?;
        self.expect_symbol(Symbol::LParen)?;
        let params = repeat!(self, self.parse_param(), Symbol::Comma, Symbol::RParen);

        self.expect_symbol(Symbol::LCurly)?;
        let mut locals = Vec::new();
        while self.peek_keyword(Keyword::Var) {
            locals.push(self.parse_var_dec()?);
        }
        let body = repeat!(self, self.parse_stmt(), Symbol::RCurly);

        let scope = subroutine_scope(kind, &name, &params, &locals)?;
        tracing::debug!("parsed {kind} {} ({} statements)", name.name, body.len());
        Ok(SubroutineDecl {
            kind,
            ret,
            name,
            params,
            locals,
            body,
            scope,
        })
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    /// block = "{" { stmt } "}"
    fn parse_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect_symbol(Symbol::LCurly)?;
        Ok(repeat!(self, self.parse_stmt(), Symbol::RCurly))
    }

    /// "(" expr ")"
    fn parse_condition(&mut self) -> Result<Expr, SyntaxError> {
        self.expect_symbol(Symbol::LParen)?;
        let cond = self.parse_expr()?;
        self.expect_symbol(Symbol::RParen)?;
        Ok(cond)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let kw = self.expect_keyword_choice(&[
            Keyword::If,
            Keyword::While,
            Keyword::Let,
            Keyword::Do,
            Keyword::Return,
        ])?;
        let line = self.line();
        let stmt = match kw {
            // "if" "(" expr ")" block [ "else" block ]
            Keyword::If => {
                let cond = self.parse_condition()?;
                let then = self.parse_block()?;
                let otherwise = if self.peek_keyword(Keyword::Else) {
                    self.expect_keyword(Keyword::Else)?;
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Stmt::If {
                    line,
                    cond,
                    then,
                    otherwise,
                }
            }

            // "while" "(" expr ")" block
            Keyword::While => {
                let cond = self.parse_condition()?;
                let body = self.parse_block()?;
                Stmt::While { line, cond, body }
            }

            // "let" ident [ "[" expr "]" ] "=" expr ";"
            Keyword::Let => {
                let name = self.parse_ident()?;
                let target = match optional!(self, Symbol::LBracket, self.parse_expr()?) {
                    Some(index) => {
                        self.expect_symbol(Symbol::RBracket)?;
                        Target::Index(name, Box::new(index))
                    }
                    None => Target::Var(name),
                };
                self.expect_symbol(Symbol::Equal)?;
                let value = self.parse_expr()?;
                self.expect_symbol(Symbol::Semicolon)?;
                Stmt::Let(target, value)
            }

            // "do" call ";"
            Keyword::Do => {
                let first = self.parse_ident()?;
                let call = self.parse_call(first)?;
                self.expect_symbol(Symbol::Semicolon)?;
                Stmt::Do(call)
            }

            // "return" [ expr ] ";"
            Keyword::Return => {
                let value = if self.peek_symbol(Symbol::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect_symbol(Symbol::Semicolon)?;
                Stmt::Return(value)
            }

            _ => unreachable!("keyword choice returned {kw}"),
        };
        tracing::trace!(line, "parsed statement {kw}");
        Ok(stmt)
    }

    /// call = [ ident "." ] ident "(" [ expr { "," expr } ] ")"
    /// The first identifier has already been consumed.
    fn parse_call(&mut self, first: Ident) -> Result<Call, SyntaxError> {
        let (target, name) = match optional!(self, Symbol::Period, self.parse_ident()?) {
            Some(name) => (Some(first), name),
            None => (None, first),
        };
        self.expect_symbol(Symbol::LParen)?;
        let args = repeat!(self, self.parse_expr(), Symbol::Comma, Symbol::RParen);
        Ok(Call { target, name, args })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// expr = term { op term }  (no precedence, left to right)
    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_term()?;
        while let Some(op) = self.peek_binary_op() {
            self.next();
            let rhs = self.parse_term()?;
            lhs = Expr::BinOp(Box::new(lhs), op, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn peek_binary_op(&mut self) -> Option<BinaryOp> {
        let TokenKind::Symbol(sym) = self.peek()?.kind else {
            return None;
        };
        match sym {
            Symbol::Plus => Some(BinaryOp::Add),
            Symbol::Minus => Some(BinaryOp::Sub),
            Symbol::Star => Some(BinaryOp::Mul),
            Symbol::Slash => Some(BinaryOp::Div),
            Symbol::Ampersand => Some(BinaryOp::And),
            Symbol::Pipe => Some(BinaryOp::Or),
            Symbol::LAngle => Some(BinaryOp::Lt),
            Symbol::RAngle => Some(BinaryOp::Gt),
            Symbol::Equal => Some(BinaryOp::Eq),
            _ => None,
        }
    }

    /// term = int-const | string-const | keyword-const | ident | ident "[" expr "]"
    ///      | call | "(" expr ")" | unary-op term
    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.next_or_eof("term")?;
        match token.kind {
            TokenKind::IntegerConstant(val) => Ok(Expr::IntConst(val)),
            TokenKind::IntegerOverflow(_) => Err(SyntaxError::IntegerOverflow { found: token }),
            TokenKind::StringConstant(text) => Ok(Expr::StringConst(text)),

            TokenKind::Keyword(Keyword::True) => Ok(Expr::BoolConst(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::BoolConst(false)),
            TokenKind::Keyword(Keyword::Null) => Ok(Expr::NullConst),
            TokenKind::Keyword(Keyword::This) => Ok(Expr::ThisConst),
            TokenKind::Keyword(_) => Err(SyntaxError::UnexpectedKeyword { found: token }),

            TokenKind::Symbol(Symbol::Minus) => {
                let operand = self.parse_term()?;
                Ok(Expr::UnOp(UnaryOp::Neg, Box::new(operand)))
            }
            TokenKind::Symbol(Symbol::Tilde) => {
                let operand = self.parse_term()?;
                Ok(Expr::UnOp(UnaryOp::Not, Box::new(operand)))
            }
            TokenKind::Symbol(Symbol::LParen) => {
                let expr = self.parse_expr()?;
                self.expect_symbol(Symbol::RParen)?;
                Ok(expr)
            }
            TokenKind::Symbol(_) => Err(SyntaxError::UnexpectedSymbol { found: token }),

            TokenKind::Identifier(name) => {
                let ident = Ident::new(name, token.line);
                if self.peek_symbol(Symbol::Period) || self.peek_symbol(Symbol::LParen) {
                    Ok(Expr::Call(self.parse_call(ident)?))
                } else if let Some(index) = optional!(self, Symbol::LBracket, self.parse_expr()?) {
                    self.expect_symbol(Symbol::RBracket)?;
                    Ok(Expr::ArrayIndex(ident, Box::new(index)))
                } else {
                    Ok(Expr::VarRef(ident))
                }
            }

            // Skipped by the parser core, never returned
            TokenKind::Error(_) => Err(SyntaxError::UnexpectedSymbol { found: token }),
        }
    }
}
