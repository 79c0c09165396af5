use color_print::cformat;

#[derive(Debug)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    fn head(&self) -> String {
        match self {
            Msg::Error(msg) => cformat!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cformat!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cformat!("<green,bold>note</>: {}", msg),
        }
    }

    /// Print with location and the offending source line
    pub fn print(&self, info: (&str, usize, &str)) {
        let (file, line, raw) = info;
        eprintln!("{}", self.head());
        eprintln!("{}", cformat!("     <blue>--></> <underline>{}:{}</>", file, line));
        eprintln!("{}", cformat!("      <blue>|</>"));
        eprintln!("{}", cformat!(" <blue>{:>4} |</> {}", line, raw));
        eprintln!("{}", cformat!("      <blue>|</>"));
    }

    /// Print without source context
    pub fn print_plain(&self) {
        eprintln!("{}", self.head());
    }
}
