use super::scope::{Scope, Storage, Sym};
use crate::error::SyntaxError;
use crate::grammer::ast::{ClassVarDecl, Ident, SubroutineDecl, SubroutineKind, VarDecl};

/// Library classes callable without compiling their source
pub const RUNTIME_CLASSES: [&str; 8] = [
    "Array", "Keyboard", "Math", "Memory", "Output", "Screen", "String", "Sys",
];

/// State shared by every class compiled in one run
#[derive(Debug, Clone)]
pub struct Context {
    pub global: Scope,
    next_static: u32,
}

impl Context {
    pub fn new<S: AsRef<str>>(runtime: &[S]) -> Self {
        let mut global = Scope::new("global");
        for name in runtime {
            global.replace(&Ident::new(name.as_ref(), 0), Sym::Class { runtime: true });
        }
        Context {
            global,
            next_static: 0,
        }
    }

    pub fn next_static(&self) -> u32 {
        self.next_static
    }

    /// Register a fully parsed class. Source classes may shadow runtime ones.
    pub fn declare_class(&mut self, name: &Ident) -> Result<(), SyntaxError> {
        match self.global.get(&name.name) {
            Some(Sym::Class { runtime: true }) => {
                tracing::debug!("class {} replaces runtime class", name.name);
                self.global.replace(name, Sym::Class { runtime: false });
                Ok(())
            }
            _ => self.global.insert(name, Sym::Class { runtime: false }),
        }
    }

    /// Class variables in source order, then subroutine names.
    /// Statics are numbered across the whole run.
    pub fn class_scope(
        &mut self,
        name: &Ident,
        vars: &[ClassVarDecl],
        subs: &[SubroutineDecl],
    ) -> Result<Scope, SyntaxError> {
        let mut scope = Scope::new(&name.name);
        let mut next_static = self.next_static;
        let mut next_field = 0;
        for var in vars {
            if var.is_static {
                next_static = scope.add_declarations(Storage::Static, [var], next_static)?;
            } else {
                next_field = scope.add_declarations(Storage::Field, [var], next_field)?;
            }
        }
        for sub in subs {
            scope.insert(&sub.name, Sym::Subroutine(sub.kind))?;
        }
        self.next_static = next_static;
        Ok(scope)
    }
}

/// Arguments then locals. A method's arguments start at 1, after the receiver.
pub fn subroutine_scope(
    kind: SubroutineKind,
    name: &Ident,
    params: &[VarDecl],
    locals: &[VarDecl],
) -> Result<Scope, SyntaxError> {
    let mut scope = Scope::new(&name.name);
    let offset = match kind {
        SubroutineKind::Method => 1,
        SubroutineKind::Constructor | SubroutineKind::Function => 0,
    };
    scope.add_declarations(Storage::Argument, params, offset)?;
    scope.add_declarations(Storage::Local, locals, 0)?;
    Ok(scope)
}
