mod common;
mod duration;
mod exposition;
mod number;
mod result;
mod string;

pub use duration::parse_duration;
pub use exposition::{parse, Parser};
