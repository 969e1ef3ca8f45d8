use super::labels::LabelSet;
use super::{MetricName, SampleValue, Timestamp};

/// One series observation from an exposition payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    name: MetricName,
    labels: LabelSet,
    value: SampleValue,
    timestamp: Option<Timestamp>,
}

impl Sample {
    pub fn new(
        name: MetricName,
        labels: LabelSet,
        value: SampleValue,
        timestamp: Option<Timestamp>,
    ) -> Self {
        Self {
            name,
            labels,
            value,
            timestamp,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    #[inline]
    pub fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }

    #[inline]
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name)
    }
}
