use super::context::EnrichmentContext;
use crate::model::{Label, Sample};

/// Attaches the identity labels of one request to its samples.
pub struct Injector {
    labels: Vec<Label>,
}

impl Injector {
    pub fn new(context: &EnrichmentContext) -> Self {
        Self {
            labels: context.labels(),
        }
    }

    pub fn inject(&self, mut sample: Sample) -> Sample {
        sample.labels_mut().merge(&self.labels);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::LabelSet;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs.iter().map(|(n, v)| Label::new(*n, *v)).collect()
    }

    #[test]
    fn test_inject() -> Result<()> {
        let ctx = EnrichmentContext::new("prod-1")?
            .with_source_address("10.0.0.5")
            .with_country_code("DE");
        let injector = Injector::new(&ctx);

        #[rustfmt::skip]
        let tests = [
            (
                labels(&[]),
                labels(&[("cluster_id", "prod-1"), ("country_code", "DE"), ("source_ip", "10.0.0.5")]),
            ),
            (
                labels(&[("zone", "a"), ("app", "web")]),
                labels(&[
                    ("app", "web"), ("cluster_id", "prod-1"), ("country_code", "DE"),
                    ("source_ip", "10.0.0.5"), ("zone", "a"),
                ]),
            ),
            (
                labels(&[("source_ip", "1.2.3.4"), ("cluster_id", "spoofed"), ("job", "x")]),
                labels(&[
                    ("cluster_id", "prod-1"), ("country_code", "DE"),
                    ("job", "x"), ("source_ip", "10.0.0.5"),
                ]),
            ),
        ];

        for (input, expected) in tests.iter().cloned() {
            let sample = Sample::new("up".to_owned(), input, 1.0, Some(7));
            let sample = injector.inject(sample);
            assert_eq!(sample.labels(), &expected);
            assert_eq!(sample.name(), "up");
            assert_eq!(sample.timestamp(), Some(7));
        }
        Ok(())
    }
}
