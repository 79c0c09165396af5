pub mod display;
pub mod msg;
