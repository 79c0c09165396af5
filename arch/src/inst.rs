use crate::seg::Segment;
use color_print::cformat;
use std::fmt;

/// One line of stack-machine code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    PUSH(Segment, u32),
    POP(Segment, u32),

    ADD,
    SUB,
    NEG,
    EQ,
    GT,
    LT,
    AND,
    OR,
    NOT,

    LABEL(String),
    GOTO(String),
    IFGOTO(String),

    CALL(String, u32),
    FUNCTION(String, u32),
    RETURN,
}

impl Inst {
    pub fn parse(line: &str) -> Result<Self, String> {
        let code = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let words = code.split_whitespace().collect::<Vec<_>>();
        let Some((op, args)) = words.split_first() else {
            return Err("Empty line".to_string());
        };

        // Get argument by index and check the count
        // Example: arg!(0) -> &str
        macro_rules! arg {
            ($index:expr) => {
                args.get($index)
                    .copied()
                    .ok_or(format!("Missing argument for `{op}`"))?
            };
        }
        macro_rules! nargs {
            ($n:expr) => {
                if args.len() != $n {
                    return Err(format!(
                        "`{op}` takes {} argument(s), got {}",
                        $n,
                        args.len()
                    ));
                }
            };
        }

        let inst = match *op {
            "push" | "pop" => {
                nargs!(2);
                let seg = Segment::parse(arg!(0))?;
                let idx = parse_index(arg!(1))?;
                if let Some(cap) = seg.capacity() {
                    if idx >= cap {
                        return Err(format!("Index {idx} out of range for segment {seg}"));
                    }
                }
                if *op == "push" {
                    Inst::PUSH(seg, idx)
                } else if seg.is_writable() {
                    Inst::POP(seg, idx)
                } else {
                    return Err(format!("Cannot pop to segment {seg}"));
                }
            }
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" | "return" => {
                nargs!(0);
                match *op {
                    "add" => Inst::ADD,
                    "sub" => Inst::SUB,
                    "neg" => Inst::NEG,
                    "eq" => Inst::EQ,
                    "gt" => Inst::GT,
                    "lt" => Inst::LT,
                    "and" => Inst::AND,
                    "or" => Inst::OR,
                    "not" => Inst::NOT,
                    _ => Inst::RETURN,
                }
            }
            "label" | "goto" | "if-goto" => {
                nargs!(1);
                let label = parse_symbol(arg!(0))?;
                match *op {
                    "label" => Inst::LABEL(label),
                    "goto" => Inst::GOTO(label),
                    _ => Inst::IFGOTO(label),
                }
            }
            "call" | "function" => {
                nargs!(2);
                let name = parse_symbol(arg!(0))?;
                let count = parse_index(arg!(1))?;
                if *op == "call" {
                    Inst::CALL(name, count)
                } else {
                    Inst::FUNCTION(name, count)
                }
            }
            _ => return Err(format!("Undefined Op: {op}")),
        };
        Ok(inst)
    }

    pub fn cformat(&self) -> String {
        macro_rules! op {
            ($name:expr) => {
                cformat!("<r>{:<9}</>", $name)
            };
        }
        macro_rules! seg {
            ($name:expr, $seg:expr, $idx:expr) => {
                cformat!("<r>{:<9}</><b>{:<8}</> <y>{}</>", $name, $seg, $idx)
            };
        }
        macro_rules! sym {
            ($name:expr, $sym:expr) => {
                cformat!("<r>{:<9}</><g>{}</>", $name, $sym)
            };
            ($name:expr, $sym:expr, $n:expr) => {
                cformat!("<r>{:<9}</><g>{}</> <y>{}</>", $name, $sym, $n)
            };
        }

        match self {
            Inst::PUSH(seg, idx) => seg!("push", seg, idx),
            Inst::POP(seg, idx) => seg!("pop", seg, idx),
            Inst::ADD => op!("add"),
            Inst::SUB => op!("sub"),
            Inst::NEG => op!("neg"),
            Inst::EQ => op!("eq"),
            Inst::GT => op!("gt"),
            Inst::LT => op!("lt"),
            Inst::AND => op!("and"),
            Inst::OR => op!("or"),
            Inst::NOT => op!("not"),
            Inst::LABEL(label) => cformat!("<m>{}:</>", label),
            Inst::GOTO(label) => sym!("goto", label),
            Inst::IFGOTO(label) => sym!("if-goto", label),
            Inst::CALL(name, n) => sym!("call", name, n),
            Inst::FUNCTION(name, n) => cformat!("<c,s>function {} {}</>", name, n),
            Inst::RETURN => op!("return"),
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::PUSH(seg, idx) => write!(f, "push {} {}", seg, idx),
            Inst::POP(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Inst::ADD => write!(f, "add"),
            Inst::SUB => write!(f, "sub"),
            Inst::NEG => write!(f, "neg"),
            Inst::EQ => write!(f, "eq"),
            Inst::GT => write!(f, "gt"),
            Inst::LT => write!(f, "lt"),
            Inst::AND => write!(f, "and"),
            Inst::OR => write!(f, "or"),
            Inst::NOT => write!(f, "not"),
            Inst::LABEL(label) => write!(f, "label {}", label),
            Inst::GOTO(label) => write!(f, "goto {}", label),
            Inst::IFGOTO(label) => write!(f, "if-goto {}", label),
            Inst::CALL(name, n) => write!(f, "call {} {}", name, n),
            Inst::FUNCTION(name, n) => write!(f, "function {} {}", name, n),
            Inst::RETURN => write!(f, "return"),
        }
    }
}

/// Parse a whole program, skipping blank and comment-only lines.
/// On failure returns the 1-based line number with the message.
pub fn parse_program(text: &str) -> Result<Vec<Inst>, (usize, String)> {
    let mut insts = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let code = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        if code.trim().is_empty() {
            continue;
        }
        insts.push(Inst::parse(code).map_err(|msg| (idx + 1, msg))?);
    }
    Ok(insts)
}

fn parse_index(s: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Cannot parse `{s}` as index"))
}

// Symbols: letters, digits, `_`, `.`, `:`, `$`, not starting with a digit
fn parse_symbol(s: &str) -> Result<String, String> {
    let valid = s
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '$'));
    if valid {
        Ok(s.to_string())
    } else {
        Err(format!("Invalid symbol: `{s}`"))
    }
}
