mod encoder;
mod value;
mod writer;

pub use encoder::{Encoder, ExpositionEncoder};
pub use value::format_value;
pub use writer::{LineWriter, Writer};
