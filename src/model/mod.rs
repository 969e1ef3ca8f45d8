mod entry;
mod labels;
mod sample;

pub use entry::*;
pub use labels::*;
pub use sample::*;

pub type MetricName = String;

pub type SampleValue = f64;

// Unix timestamp in milliseconds.
pub type Timestamp = i64;
