use super::context::EnrichmentContext;
use super::injector::Injector;
use crate::error::Result;
use crate::model::Entry;
use crate::output::{Encoder, ExpositionEncoder, LineWriter, Writer};
use crate::parser::parse;

// body -> Parser -> Entry -> (Injector) -> Encoder -> Writer -> body
//        producer                          consumer

/// Parses `body`, tags every sample with the context labels and renders the
/// result back into exposition text.
///
/// Metadata lines are passed through unchanged. The first malformed line
/// aborts the whole run and nothing is returned but the error.
pub fn enrich(body: &[u8], context: &EnrichmentContext) -> Result<Vec<u8>> {
    let injector = Injector::new(context);
    let mut consumer = Consumer::new(
        LineWriter::new(Vec::with_capacity(body.len())),
        Box::new(ExpositionEncoder::new()),
    );

    let (mut samples, mut metadata) = (0usize, 0usize);
    for entry in parse(body)? {
        let entry = match entry? {
            Entry::Sample(sample) => {
                samples += 1;
                Entry::Sample(injector.inject(sample))
            }
            Entry::Metadata(meta) => {
                metadata += 1;
                Entry::Metadata(meta)
            }
        };
        consumer.write(&entry)?;
    }

    tracing::info!(
        cluster_id = context.cluster_id(),
        source_ip = context.source_address().unwrap_or_default(),
        country_code = context.country_code().unwrap_or_default(),
        samples,
        metadata,
        "enriched metrics"
    );

    Ok(consumer.into_inner())
}

struct Consumer {
    writer: LineWriter<Vec<u8>>,
    encoder: Box<dyn Encoder>,
}

impl Consumer {
    fn new(writer: LineWriter<Vec<u8>>, encoder: Box<dyn Encoder>) -> Self {
        Self { writer, encoder }
    }

    fn write(&mut self, entry: &Entry) -> Result<()> {
        let buf = self.encoder.encode(entry)?;

        self.writer
            .write(&buf)
            .map_err(|e| ("writer failed", e))?;

        Ok(())
    }

    fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn context() -> EnrichmentContext {
        EnrichmentContext::new("prod-1")
            .unwrap()
            .with_source_address("10.0.0.5")
            .with_country_code("DE")
    }

    fn run(input: &str, ctx: &EnrichmentContext) -> Result<String> {
        enrich(input.as_bytes(), ctx).map(|buf| String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_enrich() -> Result<()> {
        let input = "\
# HELP http_requests_total Total requests.\n\
# TYPE http_requests_total counter\n\
http_requests_total{method=\"GET\",code=\"200\"} 1027 1395066363000\n\
# a comment that goes away\n\
\n\
up 1\n";
        let expected = "\
# HELP http_requests_total Total requests.\n\
# TYPE http_requests_total counter\n\
http_requests_total{cluster_id=\"prod-1\",code=\"200\",country_code=\"DE\",method=\"GET\",source_ip=\"10.0.0.5\"} 1027 1395066363000\n\
up{cluster_id=\"prod-1\",country_code=\"DE\",source_ip=\"10.0.0.5\"} 1\n";

        assert_eq!(run(input, &context())?, expected);
        Ok(())
    }

    #[test]
    fn test_enrich_cluster_only() -> Result<()> {
        let ctx = EnrichmentContext::new("c")?;
        assert_eq!(
            run("go_goroutines{cluster_id=\"x\"} 1e6\n", &ctx)?,
            "go_goroutines{cluster_id=\"c\"} 1e+06\n"
        );
        Ok(())
    }

    #[test]
    fn test_enrich_empty_body() -> Result<()> {
        assert_eq!(run("", &context())?, "");
        assert_eq!(run("# just a comment\n\n", &context())?, "");
        Ok(())
    }

    #[test]
    fn test_enriched_output_parses_back() -> Result<()> {
        let input = "\
a{x=\"1\",cluster_id=\"evil\"} 1\n\
b{country_code=\"XX\",y=\"2\",z=\"3\"} 2 100\n\
c 3\n";
        let output = enrich(input.as_bytes(), &context())?;

        let original: Vec<Entry> = parse(input.as_bytes())?.collect::<Result<_>>()?;
        let enriched: Vec<Entry> = parse(&output)?.collect::<Result<_>>()?;
        assert_eq!(original.len(), enriched.len());

        for (before, after) in original.iter().zip(enriched.iter()) {
            let (before, after) = match (before, after) {
                (Entry::Sample(b), Entry::Sample(a)) => (b, a),
                other => panic!("unexpected entries {:?}", other),
            };
            assert_eq!(before.name(), after.name());
            assert!(after.labels().is_sorted());

            for injected in context().labels() {
                let count = after
                    .labels()
                    .iter()
                    .filter(|l| l.name() == injected.name())
                    .count();
                assert_eq!(count, 1, "{} in {:?}", injected.name(), after);
                assert_eq!(after.label(injected.name()), Some(injected.value()));
            }

            for label in before.labels() {
                if context().labels().iter().all(|i| i.name() != label.name()) {
                    assert!(after.labels().iter().any(|l| l == label), "{:?} lost", label);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_enrich_rejects_repeated_label_names() {
        #[rustfmt::skip]
        let tests = [
            ("m{a=\"1\",a=\"2\"} 1\n", "1:9: duplicate label \"a\""),
            ("up 1\nm{job=\"x\",le=\"1\",job=\"x\"} 1\n", "2:18: duplicate label \"job\""),
        ];

        for (input, message) in &tests {
            match run(input, &context()) {
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::Parse);
                    assert_eq!(e.message(), *message);
                }
                Ok(out) => panic!("expected an error, got {}", out),
            }
        }
    }

    #[test]
    fn test_enrich_fails_as_a_whole() {
        let input = "up 1\nup 2\nup{job=\"x\" 3\n";
        match run(input, &context()) {
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::Parse);
                assert!(e.message().starts_with("3:12: "), "got {}", e);
            }
            Ok(out) => panic!("expected an error, got {}", out),
        }
    }
}
