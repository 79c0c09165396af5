use crate::compile::{class2code, Code};
use crate::config::{Config, LabelScheme};
use crate::error::{Error, GenError, SyntaxError};
use crate::grammer::ast::ClassDecl;
use crate::grammer::lexer::Lexer;
use crate::grammer::parsercore::Parser;
use crate::grammer::token::{Token, TokenKind};
use crate::symbols::Context;
use std::path::PathBuf;

pub fn tokenize(code: &str) -> Vec<Token> {
    Lexer::new(code).parse()
}

pub fn parse(ctx: &mut Context, tokens: Vec<Token>) -> Result<Vec<ClassDecl>, SyntaxError> {
    Parser::new(tokens.into_iter()).parse(ctx)
}

pub fn generate(ctx: &Context, class: &ClassDecl, scheme: LabelScheme) -> Result<Code, GenError> {
    class2code(&ctx.global, class, scheme)
}

/// Compile a single source in a fresh context, failing on the first error
pub fn compile_str(code: &str, config: &Config) -> Result<Vec<(String, Code)>, Error> {
    let mut ctx = Context::new(&config.runtime_classes);
    let classes = parse(&mut ctx, tokenize(code))?;
    let mut codes = Vec::new();
    for class in &classes {
        let code = generate(&ctx, class, config.labels)?;
        codes.push((class.name.name.clone(), code));
    }
    Ok(codes)
}

pub struct Source {
    pub path: PathBuf,
    pub text: String,
}

/// One source file after tokenizing and parsing
pub struct Unit {
    pub path: PathBuf,
    pub tokens: Vec<Token>,
    pub classes: Result<Vec<String>, SyntaxError>,
}

impl Unit {
    /// Characters the tokenizer could not place
    pub fn rejected(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens.iter().filter_map(|token| match &token.kind {
            TokenKind::Error(lexeme) => Some((token.line, lexeme.as_str())),
            _ => None,
        })
    }
}

/// One class after code generation
pub struct Compiled {
    pub path: PathBuf,
    pub class: String,
    pub code: Result<Code, GenError>,
}

pub struct Outcome {
    pub units: Vec<Unit>,
    pub compiled: Vec<Compiled>,
}

impl Outcome {
    pub fn failed(&self) -> bool {
        self.units.iter().any(|unit| unit.classes.is_err())
            || self.compiled.iter().any(|class| class.code.is_err())
    }

    /// Generated classes whose text form does not read back, with the reason
    pub fn verify(&self) -> Vec<(&str, Error)> {
        self.compiled
            .iter()
            .filter_map(|compiled| match &compiled.code {
                Ok(code) => code
                    .verify(&compiled.class)
                    .err()
                    .map(|e| (compiled.class.as_str(), e)),
                Err(_) => None,
            })
            .collect()
    }
}

/// Parse every source into one context, then generate every class.
/// A syntax error drops its file; a generation error drops its class.
pub fn run(sources: &[Source], config: &Config) -> Outcome {
    let mut ctx = Context::new(&config.runtime_classes);
    let mut units = Vec::new();
    let mut parsed = Vec::new();

    for source in sources {
        let tokens = tokenize(&source.text);
        let classes = match parse(&mut ctx, tokens.clone()) {
            Ok(classes) => {
                let names = classes.iter().map(|c| c.name.name.clone()).collect();
                parsed.extend(classes.into_iter().map(|c| (source.path.clone(), c)));
                Ok(names)
            }
            Err(e) => {
                tracing::debug!("{}: {}", source.path.display(), e);
                Err(e)
            }
        };
        units.push(Unit {
            path: source.path.clone(),
            tokens,
            classes,
        });
    }

    let compiled = parsed
        .into_iter()
        .map(|(path, class)| Compiled {
            code: generate(&ctx, &class, config.labels),
            class: class.name.name,
            path,
        })
        .collect();

    Outcome { units, compiled }
}
