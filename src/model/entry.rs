use std::fmt;

use super::sample::Sample;
use super::MetricName;
use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Untyped,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
            MetricType::Untyped => "untyped",
        }
    }
}

impl std::convert::TryFrom<&str> for MetricType {
    type Error = Error;

    fn try_from(kind: &str) -> Result<Self> {
        match kind {
            "counter" => Ok(MetricType::Counter),
            "gauge" => Ok(MetricType::Gauge),
            "histogram" => Ok(MetricType::Histogram),
            "summary" => Ok(MetricType::Summary),
            "untyped" => Ok(MetricType::Untyped),
            _ => Err(Error::parse(format!("unknown metric type \"{}\"", kind))),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `# TYPE` and `# HELP` lines. Passed through untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Metadata {
    Type { metric: MetricName, kind: MetricType },
    // Text is stored as written, escape sequences included.
    Help { metric: MetricName, text: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Metadata(Metadata),
    Sample(Sample),
}
