pub mod inst;
pub mod seg;

pub use inst::{parse_program, Inst};
pub use seg::Segment;
