use super::{Labeler, ALLOC, DIVIDE, MULTIPLY, STRING_APPEND, STRING_NEW};
use crate::error::GenError;
use crate::grammer::ast::{
    BinaryOp, Call, ClassDecl, Expr, Ident, Stmt, SubroutineDecl, SubroutineKind, Target, Type,
    UnaryOp,
};
use crate::symbols::{Chain, Storage, Sym};
use arch::{Inst, Segment};
use itertools::chain;

pub struct FuncCompiler<'a, 'l> {
    scope: Chain<'a>,
    class: &'a ClassDecl,
    sub: &'a SubroutineDecl,
    labels: &'l mut Labeler,
}

impl<'a, 'l> FuncCompiler<'a, 'l> {
    pub fn new(
        class_scope: &'a Chain<'a>,
        class: &'a ClassDecl,
        sub: &'a SubroutineDecl,
        labels: &'l mut Labeler,
    ) -> Self {
        Self {
            scope: class_scope.child(&sub.scope),
            class,
            sub,
            labels,
        }
    }

    pub fn compile(mut self) -> Result<Vec<Inst>, GenError> {
        let name = format!("{}.{}", self.class.name.name, self.sub.name.name);
        let nlocals = self.sub.scope.count(Storage::Local);
        let mut insts = vec![Inst::FUNCTION(name, nlocals)];

        insts.extend(self.prologue());
        for stmt in &self.sub.body {
            insts.extend(self.compile_stmt(stmt)?);
        }
        if !matches!(self.sub.body.last(), Some(Stmt::Return(_))) {
            insts.extend(self.compile_return(None)?);
        }
        Ok(insts)
    }

    fn prologue(&self) -> Vec<Inst> {
        match self.sub.kind {
            SubroutineKind::Constructor => {
                let nfields = self.class.scope.count(Storage::Field);
                vec![
                    Inst::PUSH(Segment::CONSTANT, nfields),
                    Inst::CALL(ALLOC.to_string(), 1),
                    Inst::POP(Segment::POINTER, 0),
                ]
            }
            SubroutineKind::Method => vec![
                Inst::PUSH(Segment::ARGUMENT, 0),
                Inst::POP(Segment::POINTER, 0),
            ],
            SubroutineKind::Function => vec![],
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn compile_stmt(&mut self, stmt: &'a Stmt) -> Result<Vec<Inst>, GenError> {
        match stmt {
            Stmt::Let(Target::Var(ident), value) => {
                let value_insts = self.compile_expr(value)?;
                let (seg, idx) = self.variable(ident)?;
                Ok(chain!(value_insts, vec![Inst::POP(seg, idx)]).collect())
            }

            Stmt::Let(Target::Index(base, index), value) => {
                let addr_insts = self.compile_address(base, index)?;
                let value_insts = self.compile_expr(value)?;
                Ok(chain!(
                    addr_insts,
                    value_insts,
                    vec![
                        Inst::POP(Segment::TEMP, 0),
                        Inst::POP(Segment::POINTER, 1),
                        Inst::PUSH(Segment::TEMP, 0),
                        Inst::POP(Segment::THAT, 0),
                    ]
                )
                .collect())
            }

            Stmt::If {
                line,
                cond,
                then,
                otherwise,
            } => {
                let (then_label, end_label) = self.labels.if_labels(*line);
                let cond_insts = self.compile_expr(cond)?;
                let then_insts = self.compile_block(then)?;
                let else_insts = match otherwise {
                    Some(stmts) => self.compile_block(stmts)?,
                    None => vec![],
                };
                Ok(chain!(
                    cond_insts,
                    vec![Inst::IFGOTO(then_label.clone())],
                    else_insts,
                    vec![Inst::GOTO(end_label.clone()), Inst::LABEL(then_label)],
                    then_insts,
                    vec![Inst::LABEL(end_label)]
                )
                .collect())
            }

            Stmt::While { line, cond, body } => {
                let (head_label, exit_label) = self.labels.while_labels(*line);
                let cond_insts = self.compile_expr(cond)?;
                let body_insts = self.compile_block(body)?;
                Ok(chain!(
                    vec![Inst::LABEL(head_label.clone())],
                    cond_insts,
                    vec![Inst::NOT, Inst::IFGOTO(exit_label.clone())],
                    body_insts,
                    vec![Inst::GOTO(head_label), Inst::LABEL(exit_label)]
                )
                .collect())
            }

            // Every call leaves a value; a `do` throws it away
            Stmt::Do(call) => {
                let call_insts = self.compile_call(call)?;
                Ok(chain!(call_insts, vec![Inst::POP(Segment::TEMP, 0)]).collect())
            }

            Stmt::Return(value) => self.compile_return(value.as_ref()),
        }
    }

    fn compile_block(&mut self, stmts: &'a [Stmt]) -> Result<Vec<Inst>, GenError> {
        let mut insts = Vec::new();
        for stmt in stmts {
            insts.extend(self.compile_stmt(stmt)?);
        }
        Ok(insts)
    }

    fn compile_return(&mut self, value: Option<&'a Expr>) -> Result<Vec<Inst>, GenError> {
        let value_insts = match (value, self.sub.kind) {
            (Some(expr), _) => self.compile_expr(expr)?,
            (None, SubroutineKind::Constructor) => vec![Inst::PUSH(Segment::POINTER, 0)],
            (None, _) => vec![Inst::PUSH(Segment::CONSTANT, 0)],
        };
        Ok(chain!(value_insts, vec![Inst::RETURN]).collect())
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn compile_expr(&mut self, expr: &'a Expr) -> Result<Vec<Inst>, GenError> {
        match expr {
            Expr::IntConst(val) => Ok(vec![Inst::PUSH(Segment::CONSTANT, *val)]),

            Expr::StringConst(text) => {
                let mut insts = vec![
                    Inst::PUSH(Segment::CONSTANT, text.chars().count() as u32),
                    Inst::CALL(STRING_NEW.to_string(), 1),
                ];
                for ch in text.chars() {
                    insts.push(Inst::PUSH(Segment::CONSTANT, ch as u32));
                    insts.push(Inst::CALL(STRING_APPEND.to_string(), 2));
                }
                Ok(insts)
            }

            Expr::BoolConst(true) => Ok(vec![Inst::PUSH(Segment::CONSTANT, 1), Inst::NEG]),
            Expr::BoolConst(false) | Expr::NullConst => Ok(vec![Inst::PUSH(Segment::CONSTANT, 0)]),
            Expr::ThisConst => Ok(vec![Inst::PUSH(Segment::POINTER, 0)]),

            Expr::VarRef(ident) => {
                let (seg, idx) = self.variable(ident)?;
                Ok(vec![Inst::PUSH(seg, idx)])
            }

            Expr::ArrayIndex(base, index) => {
                let addr_insts = self.compile_address(base, index)?;
                Ok(chain!(
                    addr_insts,
                    vec![Inst::POP(Segment::POINTER, 1), Inst::PUSH(Segment::THAT, 0)]
                )
                .collect())
            }

            Expr::BinOp(lhs, op, rhs) => {
                let lhs_insts = self.compile_expr(lhs)?;
                let rhs_insts = self.compile_expr(rhs)?;
                let op_inst = match op {
                    BinaryOp::Add => Inst::ADD,
                    BinaryOp::Sub => Inst::SUB,
                    BinaryOp::And => Inst::AND,
                    BinaryOp::Or => Inst::OR,
                    BinaryOp::Lt => Inst::LT,
                    BinaryOp::Gt => Inst::GT,
                    BinaryOp::Eq => Inst::EQ,
                    BinaryOp::Mul => Inst::CALL(MULTIPLY.to_string(), 2),
                    BinaryOp::Div => Inst::CALL(DIVIDE.to_string(), 2),
                };
                Ok(chain!(lhs_insts, rhs_insts, vec![op_inst]).collect())
            }

            Expr::UnOp(op, operand) => {
                let operand_insts = self.compile_expr(operand)?;
                let op_inst = match op {
                    UnaryOp::Neg => Inst::NEG,
                    UnaryOp::Not => Inst::NOT,
                };
                Ok(chain!(operand_insts, vec![op_inst]).collect())
            }

            Expr::Call(call) => self.compile_call(call),
        }
    }

    /// base + index, left on the stack
    fn compile_address(&mut self, base: &'a Ident, index: &'a Expr) -> Result<Vec<Inst>, GenError> {
        let (seg, idx) = self.variable(base)?;
        let index_insts = self.compile_expr(index)?;
        Ok(chain!(vec![Inst::PUSH(seg, idx)], index_insts, vec![Inst::ADD]).collect())
    }

    fn compile_call(&mut self, call: &'a Call) -> Result<Vec<Inst>, GenError> {
        // Receiver (if any) and the class the callee belongs to
        let (receiver_insts, class_name) = match &call.target {
            None => (
                vec![Inst::PUSH(Segment::POINTER, 0)],
                self.class.name.name.as_str(),
            ),
            Some(target) => match self.scope.lookup(&target.name) {
                Some(Sym::Var {
                    ty,
                    storage,
                    index,
                }) => match ty {
                    Type::Class(class_name) => (
                        vec![Inst::PUSH(storage.segment(), *index)],
                        class_name.as_str(),
                    ),
                    Type::Primitive(_) => {
                        return Err(GenError::ExpectedClassType {
                            ident: target.clone(),
                            got: ty.clone(),
                        })
                    }
                },
                Some(Sym::Class { .. }) => (vec![], target.name.as_str()),
                Some(sym @ Sym::Subroutine(_)) => {
                    return Err(GenError::ExpectedCallTarget {
                        ident: target.clone(),
                        found: sym.clone(),
                    })
                }
                None => {
                    return Err(GenError::UnknownIdentifier {
                        ident: target.clone(),
                    })
                }
            },
        };

        let nargs = call.args.len() as u32 + receiver_insts.len() as u32;
        let mut insts = receiver_insts;
        for arg in &call.args {
            insts.extend(self.compile_expr(arg)?);
        }
        insts.push(Inst::CALL(format!("{}.{}", class_name, call.name.name), nargs));
        Ok(insts)
    }

    /// Segment and index of a name that must be a variable
    fn variable(&self, ident: &Ident) -> Result<(Segment, u32), GenError> {
        match self.scope.lookup(&ident.name) {
            Some(Sym::Var { storage, index, .. }) => Ok((storage.segment(), *index)),
            found => Err(GenError::ExpectedVariable {
                ident: ident.clone(),
                found: found.cloned(),
            }),
        }
    }
}
