mod context;
mod scope;

pub use context::{subroutine_scope, Context, RUNTIME_CLASSES};
pub use scope::{Chain, Scope, Storage, Sym};
