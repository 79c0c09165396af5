use crate::error::SyntaxError;
use crate::grammer::ast::{Declaration, Ident, SubroutineKind, Type};
use arch::Segment;
use indexmap::IndexMap;

/// Where a variable lives at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Static,
    Field,
    Argument,
    Local,
}

impl Storage {
    pub fn segment(self) -> Segment {
        match self {
            Storage::Static => Segment::STATIC,
            Storage::Field => Segment::THIS,
            Storage::Argument => Segment::ARGUMENT,
            Storage::Local => Segment::LOCAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sym {
    Var {
        ty: Type,
        storage: Storage,
        index: u32,
    },
    Subroutine(SubroutineKind),
    /// `runtime` classes come from configuration, not from source
    Class { runtime: bool },
}

impl Sym {
    /// `field int x`, `method draw`, `class Main`
    pub fn describe(&self, name: &str) -> String {
        match self {
            Sym::Var { ty, storage, .. } => {
                let storage = match storage {
                    Storage::Static => "static",
                    Storage::Field => "field",
                    Storage::Argument => "argument",
                    Storage::Local => "local",
                };
                format!("{storage} {ty} {name}")
            }
            Sym::Subroutine(kind) => format!("{kind} {name}"),
            Sym::Class { .. } => format!("class {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    sym: Sym,
    line: usize,
}

/// One level of name bindings, kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    name: String,
    entries: IndexMap<String, Entry>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Scope {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Sym> {
        self.entries.get(name).map(|entry| &entry.sym)
    }

    pub fn insert(&mut self, ident: &Ident, sym: Sym) -> Result<(), SyntaxError> {
        if let Some(prev) = self.entries.get(&ident.name) {
            return Err(SyntaxError::Duplicate {
                name: ident.clone(),
                previous: prev.line,
            });
        }
        self.entries.insert(
            ident.name.clone(),
            Entry {
                sym,
                line: ident.line,
            },
        );
        Ok(())
    }

    /// Overwrite a binding regardless of what was there
    pub fn replace(&mut self, ident: &Ident, sym: Sym) {
        self.entries.insert(
            ident.name.clone(),
            Entry {
                sym,
                line: ident.line,
            },
        );
    }

    /// Bind every name of every declaration with consecutive indices starting at `start`.
    /// Returns the next free index.
    pub fn add_declarations<'d, D, It>(
        &mut self,
        storage: Storage,
        decls: It,
        start: u32,
    ) -> Result<u32, SyntaxError>
    where
        D: Declaration + 'd,
        It: IntoIterator<Item = &'d D>,
    {
        let mut index = start;
        for decl in decls {
            for name in decl.names() {
                let sym = Sym::Var {
                    ty: decl.ty().clone(),
                    storage,
                    index,
                };
                self.insert(name, sym)?;
                index += 1;
            }
        }
        Ok(index)
    }

    /// Number of variables bound with the given storage
    pub fn count(&self, storage: Storage) -> u32 {
        self.entries
            .values()
            .filter(|entry| matches!(entry.sym, Sym::Var { storage: s, .. } if s == storage))
            .count() as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sym)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.sym))
    }
}

/// Innermost-first view over nested scopes
#[derive(Debug, Clone, Copy)]
pub struct Chain<'a> {
    scope: &'a Scope,
    parent: Option<&'a Chain<'a>>,
}

impl<'a> Chain<'a> {
    pub fn root(scope: &'a Scope) -> Self {
        Chain {
            scope,
            parent: None,
        }
    }

    pub fn child<'b>(&'b self, scope: &'b Scope) -> Chain<'b> {
        Chain {
            scope,
            parent: Some(self),
        }
    }

    /// Innermost binding of `name`, walking outwards
    pub fn lookup(&self, name: &str) -> Option<&'a Sym> {
        match self.scope.get(name) {
            Some(sym) => Some(sym),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }
}
