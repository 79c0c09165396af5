use crate::compile::Code;
use crate::grammer::token::Token;
use arch::Inst;
use color_print::cformat;

/// Token dump, one element per line inside `<tokens>`
pub fn tokens_xml(tokens: &[Token]) -> String {
    let mut xml = String::from("<tokens>\n");
    for token in tokens {
        xml.push_str(&token.to_xml());
        xml.push('\n');
    }
    xml.push_str("</tokens>\n");
    xml
}

/// Colored listing of one class, functions separated by a rule
pub fn codeprint(class: &str, code: &Code) {
    println!("{}", cformat!("<bold>+-[{}]</>{}", class, "-".repeat(60)));
    for (idx, inst) in code.0.iter().enumerate() {
        if matches!(inst, Inst::FUNCTION(..)) && idx != 0 {
            println!("|");
        }
        let indent = match inst {
            Inst::FUNCTION(..) | Inst::LABEL(_) => "",
            _ => "    ",
        };
        println!("| {:>5} {}{}", idx, indent, inst.cformat());
    }
}
