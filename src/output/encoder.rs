use super::value::format_value;
use crate::error::Result;
use crate::model::{Entry, LabelSet, Metadata, Sample};

pub trait Encoder {
    fn encode(&self, entry: &Entry) -> Result<Vec<u8>>;
}

/// Renders entries back into the text exposition format, one line per entry
/// and without the trailing newline.
#[derive(Default)]
pub struct ExpositionEncoder {}

impl ExpositionEncoder {
    pub fn new() -> Self {
        Self {}
    }

    fn encode_metadata(&self, metadata: &Metadata) -> String {
        match metadata {
            Metadata::Type { metric, kind } => format!("# TYPE {} {}", metric, kind),
            Metadata::Help { metric, text } if text.is_empty() => format!("# HELP {}", metric),
            Metadata::Help { metric, text } => format!("# HELP {} {}", metric, text),
        }
    }

    fn encode_sample(&self, sample: &Sample) -> String {
        let mut line = String::from(sample.name());
        encode_labels(&mut line, sample.labels());

        line.push(' ');
        line.push_str(&format_value(sample.value()));

        if let Some(ts) = sample.timestamp() {
            line.push(' ');
            line.push_str(&ts.to_string());
        }
        line
    }
}

impl Encoder for ExpositionEncoder {
    fn encode(&self, entry: &Entry) -> Result<Vec<u8>> {
        let line = match entry {
            Entry::Metadata(metadata) => self.encode_metadata(metadata),
            Entry::Sample(sample) => self.encode_sample(sample),
        };
        Ok(line.into_bytes())
    }
}

fn encode_labels(buf: &mut String, labels: &LabelSet) {
    if labels.is_empty() {
        return;
    }

    buf.push('{');
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        buf.push_str(label.name());
        buf.push_str("=\"");
        escape_label_value(buf, label.value());
        buf.push('"');
    }
    buf.push('}');
}

fn escape_label_value(buf: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => buf.push_str("\\\\"),
            '"' => buf.push_str("\\\""),
            '\n' => buf.push_str("\\n"),
            c => buf.push(c),
        }
    }
}
