use jackc::grammer::ast::{
    BinaryOp, Call, ClassDecl, Expr, Ident, Primitive, Stmt, SubroutineKind, Target, Type, UnaryOp,
};
use jackc::grammer::token::{Keyword, Symbol, TokenKind};
use jackc::symbols::Sym;
use jackc::{parse, tokenize, Context, SyntaxError};

fn parse_src(ctx: &mut Context, code: &str) -> Result<Vec<ClassDecl>, SyntaxError> {
    let result = parse(ctx, tokenize(code));
    match &result {
        Ok(classes) => {
            for class in classes {
                println!("{:#?}", class.subs.iter().map(|s| &s.body).collect::<Vec<_>>());
            }
        }
        Err(e) => println!("{}: {}", e.line(), e),
    }
    result
}

fn accept(code: &str) -> Vec<ClassDecl> {
    let mut ctx = Context::new::<&str>(&[]);
    parse_src(&mut ctx, code).unwrap()
}

fn reject(code: &str) -> SyntaxError {
    let mut ctx = Context::new::<&str>(&[]);
    parse_src(&mut ctx, code).unwrap_err()
}

/// Body of the first subroutine of a single class
fn body(code: &str) -> Vec<Stmt> {
    accept(code).remove(0).subs.remove(0).body
}

fn id(name: &str, line: usize) -> Ident {
    Ident::new(name, line)
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            accept($code);
        }
    };
}

case!(empty_class, "class A {}");
case!(two_classes, "class A {} class B {}");
case!(function_no_params, "class A { function void f() { return; } }");
case!(
    method_params,
    "class A { method int f(int a, char b, Foo c) { return a; } }"
);
case!(
    nested_control,
    "class A { function void f() { while (true) { if (x) { let y = 1; } else { do g(); } } return; } }"
);
case!(
    array_write,
    "class A { function void f() { let a[i + 1] = a[i]; return; } }"
);
case!(
    keyword_constants,
    "class A { method A f() { let x = null; let y = this; let z = false; return this; } }"
);

#[test]
fn class_shape() {
    let classes = accept(
        "class Point {
            field int x, y;
            static int count;
            field Point next;
            constructor Point new(int ax, int ay) { let x = ax; let y = ay; return this; }
            method int getX() { return x; }
            function int total() { return count; }
        }",
    );
    assert_eq!(classes.len(), 1);
    let class = &classes[0];
    assert_eq!(class.name, id("Point", 1));

    let fields = class.vars.iter().filter(|v| !v.is_static).map(|v| v.names.len()).sum::<usize>();
    let statics = class.vars.iter().filter(|v| v.is_static).map(|v| v.names.len()).sum::<usize>();
    assert_eq!((fields, statics, class.subs.len()), (3, 1, 3));

    let kinds = class.subs.iter().map(|s| s.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            SubroutineKind::Constructor,
            SubroutineKind::Method,
            SubroutineKind::Function
        ]
    );
    assert_eq!(class.subs[0].ret, Type::Class("Point".to_string()));
    assert_eq!(class.subs[0].params.len(), 2);
    assert_eq!(class.subs[1].ret, Type::Primitive(Primitive::Int));
}

#[test]
fn locals_and_statements() {
    let classes = accept(
        "class A {
            function void f() {
                var int i, j;
                var Array a;
                let i = 0;
                do Output.printInt(i);
                return;
            }
        }",
    );
    let sub = &classes[0].subs[0];
    assert_eq!(sub.locals.len(), 2);
    assert_eq!(sub.locals[0].names, vec![id("i", 3), id("j", 3)]);
    assert_eq!(sub.body.len(), 3);
    assert_eq!(
        sub.body[1],
        Stmt::Do(Call {
            target: Some(id("Output", 6)),
            name: id("printInt", 6),
            args: vec![Expr::VarRef(id("i", 6))],
        })
    );
    assert_eq!(sub.body[2], Stmt::Return(None));
}

#[test]
fn no_operator_precedence() {
    let stmts = body("class A { function int f() { return 1 + 2 * 3; } }");
    let expected = Expr::BinOp(
        Box::new(Expr::BinOp(
            Box::new(Expr::IntConst(1)),
            BinaryOp::Add,
            Box::new(Expr::IntConst(2)),
        )),
        BinaryOp::Mul,
        Box::new(Expr::IntConst(3)),
    );
    assert_eq!(stmts, vec![Stmt::Return(Some(expected))]);
}

#[test]
fn parentheses_and_unary() {
    let stmts = body("class A { function int f() { return -(1 - ~x); } }");
    let expected = Expr::UnOp(
        UnaryOp::Neg,
        Box::new(Expr::BinOp(
            Box::new(Expr::IntConst(1)),
            BinaryOp::Sub,
            Box::new(Expr::UnOp(UnaryOp::Not, Box::new(Expr::VarRef(id("x", 1))))),
        )),
    );
    assert_eq!(stmts, vec![Stmt::Return(Some(expected))]);
}

#[test]
fn term_forms() {
    let stmts = body(
        "class A { function void f() {
            let a = b[2];
            let a = g(1, \"s\");
            let a = p.q();
            let c[0] = true;
        } }",
    );
    assert_eq!(
        stmts,
        vec![
            Stmt::Let(
                Target::Var(id("a", 2)),
                Expr::ArrayIndex(id("b", 2), Box::new(Expr::IntConst(2)))
            ),
            Stmt::Let(
                Target::Var(id("a", 3)),
                Expr::Call(Call {
                    target: None,
                    name: id("g", 3),
                    args: vec![Expr::IntConst(1), Expr::StringConst("s".to_string())],
                })
            ),
            Stmt::Let(
                Target::Var(id("a", 4)),
                Expr::Call(Call {
                    target: Some(id("p", 4)),
                    name: id("q", 4),
                    args: vec![],
                })
            ),
            Stmt::Let(
                Target::Index(id("c", 5), Box::new(Expr::IntConst(0))),
                Expr::BoolConst(true)
            ),
        ]
    );
}

#[test]
fn if_and_while_record_their_line() {
    let stmts = body(
        "class A { function void f() {
            if (x) { }
            else { }
            while (y) { }
        } }",
    );
    assert!(matches!(
        &stmts[0],
        Stmt::If { line: 2, otherwise: Some(_), .. }
    ));
    assert!(matches!(&stmts[1], Stmt::While { line: 4, .. }));
}

#[test]
fn error_tokens_are_skipped() {
    let stmts = body("class A { function void f() { let x = 1 $ ; return; } }");
    assert_eq!(stmts.len(), 2);
}

#[test]
fn missing_semicolon_reports_line() {
    let err = reject(
        "class A {
            function void f() {
                let x = 1
                return;
            }
        }",
    );
    match &err {
        SyntaxError::ExpectedSymbolChoice { found, .. } | SyntaxError::ExpectedSymbol { found, .. } => {
            assert_eq!(found.kind, TokenKind::Keyword(Keyword::Return));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.line(), 4);
}

#[test]
fn missing_semicolon_after_var_names() {
    let err = reject("class A { field int x y; }");
    assert!(matches!(
        err,
        SyntaxError::ExpectedSymbolChoice { ref expected, .. }
            if *expected == vec![Symbol::Comma, Symbol::Semicolon]
    ));
}

#[test]
fn class_keyword_required() {
    let err = reject("klass A {}");
    assert!(matches!(
        err,
        SyntaxError::ExpectedKeyword {
            expected: Keyword::Class,
            ..
        }
    ));
}

#[test]
fn symbol_errors_name_the_symbol() {
    let err = reject("class A }");
    assert!(matches!(
        err,
        SyntaxError::ExpectedSymbol {
            expected: Symbol::LCurly,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Expected symbol `{`, got symbol:}");

    let err = reject("class A { field int x y; }");
    assert!(matches!(err, SyntaxError::ExpectedSymbolChoice { .. }));
    assert!(err.to_string().starts_with("Expected one of `,`, `;`"));
}

#[test]
fn oversized_integer_is_rejected() {
    let err = reject("class A { function int f() {\n return 99999999999; } }");
    match err {
        SyntaxError::IntegerOverflow { ref found } => {
            assert_eq!(found.kind, TokenKind::IntegerOverflow("99999999999".to_string()));
            assert_eq!(found.line, 2);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn class_member_choice() {
    let err = reject("class A { var int x; }");
    assert!(matches!(err, SyntaxError::ExpectedKeywordChoice { .. }));
    assert!(err.to_string().contains("`static`"));
}

#[test]
fn void_only_as_return_type() {
    let err = reject("class A { field void x; }");
    assert!(matches!(err, SyntaxError::ExpectedNonVoidType { .. }));
    let err = reject("class A { function void f(void a) { return; } }");
    assert!(matches!(err, SyntaxError::ExpectedNonVoidType { .. }));
}

#[test]
fn type_required() {
    let err = reject("class A { static 3 x; }");
    assert!(matches!(err, SyntaxError::ExpectedType { .. }));
}

#[test]
fn identifier_required() {
    let err = reject("class while {}");
    assert!(matches!(err, SyntaxError::ExpectedIdentifier { .. }));
}

#[test]
fn unexpected_keyword_and_symbol_in_term() {
    let err = reject("class A { function void f() { let x = while; } }");
    assert!(matches!(err, SyntaxError::UnexpectedKeyword { .. }));
    let err = reject("class A { function void f() { let x = ); } }");
    assert!(matches!(err, SyntaxError::UnexpectedSymbol { .. }));
}

#[test]
fn end_of_file() {
    let err = reject("class A {\n function void f() {\n let x = 1;");
    assert!(matches!(err, SyntaxError::UnexpectedEof { line: 3, .. }));
    let err = reject("class");
    assert!(matches!(err, SyntaxError::UnexpectedEof { .. }));
}

#[test]
fn duplicate_names() {
    let err = reject("class A {\n field int x;\n static char x;\n}");
    assert!(matches!(
        err,
        SyntaxError::Duplicate { ref name, previous: 2 } if name.line == 3
    ));
    let err = reject("class A { function void f(int a) { var int a; return; } }");
    assert!(matches!(err, SyntaxError::Duplicate { .. }));
    let err = reject("class A { field int f; method void f() { return; } }");
    assert!(matches!(err, SyntaxError::Duplicate { .. }));
}

#[test]
fn class_registered_only_when_complete() {
    let mut ctx = Context::new::<&str>(&[]);
    parse_src(&mut ctx, "class Good {}").unwrap();
    parse_src(&mut ctx, "class Bad { field int; }").unwrap_err();
    assert_eq!(ctx.global.get("Good"), Some(&Sym::Class { runtime: false }));
    assert_eq!(ctx.global.get("Bad"), None);
}

#[test]
fn duplicate_class_across_sources() {
    let mut ctx = Context::new::<&str>(&[]);
    parse_src(&mut ctx, "class A {}").unwrap();
    let err = parse_src(&mut ctx, "class A {}").unwrap_err();
    assert!(matches!(err, SyntaxError::Duplicate { .. }));
}

#[test]
fn source_class_replaces_runtime_class() {
    let mut ctx = Context::new(&["Math"]);
    assert_eq!(ctx.global.get("Math"), Some(&Sym::Class { runtime: true }));
    parse_src(&mut ctx, "class Math {}").unwrap();
    assert_eq!(ctx.global.get("Math"), Some(&Sym::Class { runtime: false }));
}
