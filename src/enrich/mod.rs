//! Identity labels and the parse, inject and serialize pipeline.

mod context;
mod injector;
mod pipeline;

pub use context::{
    ContextBuilder, Enrichment, EnrichmentContext, CLUSTER_ID_LABEL, COUNTRY_CODE_LABEL,
    SOURCE_IP_LABEL,
};
pub use injector::Injector;
pub use pipeline::enrich;
