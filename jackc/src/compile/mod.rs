pub mod func;

use crate::config::LabelScheme;
use crate::error::{Error, GenError};
use crate::grammer::ast::ClassDecl;
use crate::symbols::{Chain, Scope};
use arch::Inst;
use std::fmt;

pub const ALLOC: &str = "Memory.alloc";
pub const MULTIPLY: &str = "Math.multiply";
pub const DIVIDE: &str = "Math.divide";
pub const STRING_NEW: &str = "String.new";
pub const STRING_APPEND: &str = "String.appendChar";

/// Generated code of one class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code(pub Vec<Inst>);

impl Code {
    /// Read the text form back through the instruction parser
    pub fn verify(&self, class: &str) -> Result<(), Error> {
        let text = self.to_string();
        match arch::parse_program(&text) {
            Ok(insts) if insts == self.0 => Ok(()),
            Ok(_) => Err(Error::Verify(
                class.to_string(),
                0,
                "text form reads back differently".to_string(),
            )),
            Err((line, msg)) => Err(Error::Verify(class.to_string(), line, msg)),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.0 {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}

/// Labels for one class
#[derive(Debug, Clone)]
pub struct Labeler {
    scheme: LabelScheme,
    next_if: usize,
    next_while: usize,
}

impl Labeler {
    pub fn new(scheme: LabelScheme) -> Self {
        Labeler {
            scheme,
            next_if: 0,
            next_while: 0,
        }
    }

    /// (then-branch label, end label)
    pub fn if_labels(&mut self, line: usize) -> (String, String) {
        match self.scheme {
            LabelScheme::Counter => {
                let n = self.next_if;
                self.next_if += 1;
                (format!("IF_TRUE{n}"), format!("IF_END{n}"))
            }
            LabelScheme::Line => (format!("IF{line}"), format!("FI{line}")),
        }
    }

    /// (loop head label, exit label)
    pub fn while_labels(&mut self, line: usize) -> (String, String) {
        match self.scheme {
            LabelScheme::Counter => {
                let n = self.next_while;
                self.next_while += 1;
                (format!("WHILE_EXP{n}"), format!("WHILE_END{n}"))
            }
            LabelScheme::Line => (format!("WHILE{line}"), format!("ELIHW{line}")),
        }
    }
}

/// Generate every subroutine of `class`, in declaration order
pub fn class2code(
    global: &Scope,
    class: &ClassDecl,
    scheme: LabelScheme,
) -> Result<Code, GenError> {
    let root = Chain::root(global);
    let chain = root.child(&class.scope);
    let mut labels = Labeler::new(scheme);
    let mut insts = Vec::new();
    for sub in &class.subs {
        let compiler = func::FuncCompiler::new(&chain, class, sub, &mut labels);
        insts.extend(compiler.compile()?);
    }
    tracing::debug!("generated {} instructions for class {}", insts.len(), class.scope.name());
    Ok(Code(insts))
}
