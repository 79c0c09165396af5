use strum::{Display, EnumString};

/// Addressable memory segments of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Segment {
    CONSTANT,
    ARGUMENT,
    LOCAL,
    STATIC,
    THIS,
    THAT,
    POINTER,
    TEMP,
}

impl Segment {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(seg) => Ok(seg),
            Err(_) => Err(format!("Unknown segment: {s}")),
        }
    }

    /// `pointer` has two slots (this / that), `temp` has eight.
    pub fn capacity(&self) -> Option<u32> {
        match self {
            Segment::POINTER => Some(2),
            Segment::TEMP => Some(8),
            _ => None,
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Segment::CONSTANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_is_lowercase() {
        assert_eq!(Segment::POINTER.to_string(), "pointer");
        assert_eq!(Segment::parse("temp"), Ok(Segment::TEMP));
        assert!(Segment::parse("heap").is_err());
    }
}
