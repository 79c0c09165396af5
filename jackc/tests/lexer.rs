use jackc::grammer::token::{Keyword, Symbol, TokenKind};
use jackc::tokenize;
use quickcheck::quickcheck;

fn case(code: &str, expects: Vec<TokenKind>) {
    let tokens = tokenize(code);

    println!(" {code}");
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:>3} {:?}", idx, token.line, token.kind);
    }

    let kinds = tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>();
    assert_eq!(kinds, expects);
}

fn kw(kw: Keyword) -> TokenKind {
    TokenKind::Keyword(kw)
}

fn sym(sym: Symbol) -> TokenKind {
    TokenKind::Symbol(sym)
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

#[test]
fn let_statement() {
    case(
        "let x = 1;",
        vec![
            kw(Keyword::Let),
            ident("x"),
            sym(Symbol::Equal),
            TokenKind::IntegerConstant(1),
            sym(Symbol::Semicolon),
        ],
    );
}

#[test]
fn no_space_between_tokens() {
    case(
        "do Output.printInt(a[i]+2);",
        vec![
            kw(Keyword::Do),
            ident("Output"),
            sym(Symbol::Period),
            ident("printInt"),
            sym(Symbol::LParen),
            ident("a"),
            sym(Symbol::LBracket),
            ident("i"),
            sym(Symbol::RBracket),
            sym(Symbol::Plus),
            TokenKind::IntegerConstant(2),
            sym(Symbol::RParen),
            sym(Symbol::Semicolon),
        ],
    );
}

#[test]
fn keyword_prefix_is_identifier() {
    case(
        "classy _var var1 while",
        vec![ident("classy"), ident("_var"), ident("var1"), kw(Keyword::While)],
    );
}

#[test]
fn string_keeps_spaces_and_comment_markers() {
    case(
        "\"a // b /* c */\" x",
        vec![
            TokenKind::StringConstant("a // b /* c */".to_string()),
            ident("x"),
        ],
    );
}

#[test]
fn comments_are_dropped() {
    case(
        "// line\nclass /* block\n spanning */ Main /** doc */ { }",
        vec![
            kw(Keyword::Class),
            ident("Main"),
            sym(Symbol::LCurly),
            sym(Symbol::RCurly),
        ],
    );
}

#[test]
fn slash_alone_is_division() {
    case(
        "a/b",
        vec![ident("a"), sym(Symbol::Slash), ident("b")],
    );
}

#[test]
fn number_then_identifier() {
    case(
        "12ab",
        vec![TokenKind::IntegerConstant(12), ident("ab")],
    );
}

#[test]
fn unknown_characters_become_error_tokens() {
    case(
        "let x = 1 # 2;",
        vec![
            kw(Keyword::Let),
            ident("x"),
            sym(Symbol::Equal),
            TokenKind::IntegerConstant(1),
            TokenKind::Error("#".to_string()),
            TokenKind::IntegerConstant(2),
            sym(Symbol::Semicolon),
        ],
    );
}

#[test]
fn overflowing_integer_keeps_its_digits() {
    case(
        "4294967295 4294967296",
        vec![
            TokenKind::IntegerConstant(4294967295),
            TokenKind::IntegerOverflow("4294967296".to_string()),
        ],
    );
}

#[test]
fn unterminated_string_and_comment() {
    case("x \"abc", vec![ident("x"), TokenKind::Error("\"abc".to_string())]);
    case("x /* abc", vec![ident("x"), TokenKind::Error("/*".to_string())]);
}

#[test]
fn empty_and_blank_input() {
    case("", vec![]);
    case(" \t\r\n\n  ", vec![]);
}

#[test]
fn lines_are_counted() {
    let tokens = tokenize("class\nMain\n/* one\ntwo */ {\n\"s\"\n}");
    let lines = tokens.iter().map(|t| t.line).collect::<Vec<_>>();
    assert_eq!(lines, vec![1, 2, 4, 5, 6]);
}

#[test]
fn xml_form() {
    let tokens = tokenize("if (x < \"a&b\") {}");
    let xml = tokens.iter().map(|t| t.to_xml()).collect::<Vec<_>>();
    assert_eq!(
        xml,
        vec![
            "<keyword> if </keyword>",
            "<symbol> ( </symbol>",
            "<identifier> x </identifier>",
            "<symbol> &lt; </symbol>",
            "<stringConst> a&amp;b </stringConst>",
            "<symbol> ) </symbol>",
            "<symbol> { </symbol>",
            "<symbol> } </symbol>",
        ]
    );
}

#[test]
fn braces_print_as_themselves() {
    assert_eq!(Symbol::LCurly.to_string(), "{");
    assert_eq!(Symbol::RCurly.to_string(), "}");

    let xml = tokenize("{ 99999999999 }")
        .iter()
        .map(|t| t.to_xml())
        .collect::<Vec<_>>();
    assert_eq!(
        xml,
        vec![
            "<symbol> { </symbol>",
            "<intConst> 99999999999 </intConst>",
            "<symbol> } </symbol>",
        ]
    );
}

quickcheck! {
    fn never_panics_and_lines_ascend(code: String) -> bool {
        let tokens = tokenize(&code);
        let max_line = code.matches('\n').count() + 1;
        tokens.windows(2).all(|w| w[0].line <= w[1].line)
            && tokens.iter().all(|t| t.line >= 1 && t.line <= max_line)
    }

    fn letter_runs_are_one_token(words: Vec<u8>) -> bool {
        let word: String = words.iter().map(|b| (b'a' + b % 26) as char).collect();
        let tokens = tokenize(&word);
        if word.is_empty() {
            tokens.is_empty()
        } else {
            tokens.len() == 1
                && matches!(&tokens[0].kind, TokenKind::Identifier(_) | TokenKind::Keyword(_))
        }
    }
}
