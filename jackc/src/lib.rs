pub mod compile;
pub mod config;
pub mod error;
pub mod grammer;
pub mod pipeline;
pub mod symbols;
pub mod util;

pub use compile::Code;
pub use config::{Config, LabelScheme};
pub use error::{Error, GenError, SyntaxError};
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;
pub use pipeline::{compile_str, generate, parse, run, tokenize, Outcome, Source};
pub use symbols::Context;
