use std::net::IpAddr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::geo::{canonical_ip, CountryResolver, UNKNOWN_COUNTRY};
use crate::model::Label;

pub const CLUSTER_ID_LABEL: &str = "cluster_id";
pub const SOURCE_IP_LABEL: &str = "source_ip";
pub const COUNTRY_CODE_LABEL: &str = "country_code";

/// Identity of a single push request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnrichmentContext {
    cluster_id: String,
    source_address: Option<String>,
    country_code: Option<String>,
}

impl EnrichmentContext {
    pub fn new<S: Into<String>>(cluster_id: S) -> Result<Self> {
        let cluster_id = cluster_id.into();
        if cluster_id.is_empty() {
            return Err(Error::validation("cluster id must not be empty"));
        }

        Ok(Self {
            cluster_id,
            source_address: None,
            country_code: None,
        })
    }

    pub fn with_source_address<S: Into<String>>(mut self, address: S) -> Self {
        self.source_address = Some(address.into());
        self
    }

    pub fn with_country_code<S: Into<String>>(mut self, code: S) -> Self {
        self.country_code = Some(code.into());
        self
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn source_address(&self) -> Option<&str> {
        self.source_address.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// Labels to attach to every sample. Empty fields are left out.
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = vec![Label::new(CLUSTER_ID_LABEL, self.cluster_id.as_str())];

        let optional = [
            (SOURCE_IP_LABEL, &self.source_address),
            (COUNTRY_CODE_LABEL, &self.country_code),
        ];
        for (name, value) in optional.iter() {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                labels.push(Label::new(*name, value));
            }
        }
        labels
    }
}

/// Which of the optional identity labels get injected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Enrichment {
    pub source_ip: bool,
    pub country_code: bool,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            source_ip: true,
            country_code: true,
        }
    }
}

/// Turns the request identity (cluster id and peer address) into an
/// [`EnrichmentContext`].
#[derive(Clone)]
pub struct ContextBuilder {
    enrichment: Enrichment,
    resolver: Option<Arc<dyn CountryResolver>>,
}

impl ContextBuilder {
    pub fn new(enrichment: Enrichment, resolver: Option<Arc<dyn CountryResolver>>) -> Self {
        Self {
            enrichment,
            resolver,
        }
    }

    pub fn build(&self, cluster_id: &str, source: Option<IpAddr>) -> Result<EnrichmentContext> {
        let mut context = EnrichmentContext::new(cluster_id)?;
        let address = source.map(|ip| canonical_ip(ip).to_string());

        if self.enrichment.source_ip {
            if let Some(address) = &address {
                context = context.with_source_address(address.as_str());
            }
        }

        if self.enrichment.country_code {
            let code = match (&self.resolver, &address) {
                (Some(resolver), Some(address)) => resolver.country_code(address),
                _ => String::from(UNKNOWN_COUNTRY),
            };
            context = context.with_country_code(code);
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct StaticResolver(&'static str);

    impl CountryResolver for StaticResolver {
        fn country_code(&self, address: &str) -> String {
            match address {
                "192.0.2.7" => String::from(self.0),
                _ => String::from(UNKNOWN_COUNTRY),
            }
        }
    }

    fn label_pairs(context: &EnrichmentContext) -> Vec<(String, String)> {
        context
            .labels()
            .iter()
            .map(|l| (l.name().to_owned(), l.value().to_owned()))
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_cluster_id() {
        match EnrichmentContext::new("") {
            Err(e) => assert_eq!(e.kind(), ErrorKind::Validation),
            Ok(ctx) => panic!("expected an error, got {:?}", ctx),
        }
    }

    #[test]
    fn test_context_labels() -> Result<()> {
        let ctx = EnrichmentContext::new("prod-1")?;
        assert_eq!(label_pairs(&ctx), pairs(&[("cluster_id", "prod-1")]));

        let ctx = EnrichmentContext::new("prod-1")?
            .with_source_address("10.0.0.5")
            .with_country_code("DE");
        assert_eq!(
            label_pairs(&ctx),
            pairs(&[
                ("cluster_id", "prod-1"),
                ("source_ip", "10.0.0.5"),
                ("country_code", "DE"),
            ])
        );

        let ctx = EnrichmentContext::new("prod-1")?
            .with_source_address("")
            .with_country_code("US");
        assert_eq!(
            label_pairs(&ctx),
            pairs(&[("cluster_id", "prod-1"), ("country_code", "US")])
        );
        Ok(())
    }

    #[test]
    fn test_builder() -> Result<()> {
        let resolver: Arc<dyn CountryResolver> = Arc::new(StaticResolver("NL"));
        let mapped: IpAddr = "::ffff:192.0.2.7".parse().unwrap();

        #[rustfmt::skip]
        let tests = [
            (Enrichment::default(), Some(resolver.clone()), Some(mapped), Some("192.0.2.7"), Some("NL")),
            (Enrichment::default(), Some(resolver.clone()), None, None, Some("unknown")),
            (Enrichment::default(), None, Some(mapped), Some("192.0.2.7"), Some("unknown")),
            (
                Enrichment { source_ip: false, country_code: true },
                Some(resolver.clone()), Some(mapped), None, Some("NL"),
            ),
            (
                Enrichment { source_ip: true, country_code: false },
                Some(resolver.clone()), Some(mapped), Some("192.0.2.7"), None,
            ),
        ];

        for (enrichment, resolver, source, address, country) in tests.iter().cloned() {
            let ctx = ContextBuilder::new(enrichment, resolver).build("c1", source)?;
            assert_eq!(ctx.cluster_id(), "c1");
            assert_eq!(ctx.source_address(), address, "with {:?}", enrichment);
            assert_eq!(ctx.country_code(), country, "with {:?}", enrichment);
        }

        assert!(ContextBuilder::new(Enrichment::default(), None)
            .build("", Some(mapped))
            .is_err());
        Ok(())
    }
}
