use std::sync::Arc;

use structopt::StructOpt;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use metrelay::cliopt::CliOpt;
use metrelay::enrich::ContextBuilder;
use metrelay::forward::HttpForwarder;
use metrelay::geo::{CountryResolver, MmdbResolver};
use metrelay::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("metrelay=info".parse()?))
        .init();

    let opt = CliOpt::from_args();
    let enrichment = opt.enrichment();

    let resolver: Option<Arc<dyn CountryResolver>> = if enrichment.country_code {
        Some(Arc::new(MmdbResolver::open(&opt.geoip_db)?))
    } else {
        None
    };

    let forwarder = HttpForwarder::new(&opt.forward_url, opt.forward_timeout)?;
    tracing::info!(url = %forwarder.url(), "forwarding metrics");

    let app = server::router(
        AppState {
            contexts: ContextBuilder::new(enrichment, resolver),
            forwarder: Arc::new(forwarder),
        },
        opt.request_timeout,
        opt.max_body_size,
    );

    let listener = TcpListener::bind(opt.listen_addr).await?;
    tracing::info!(addr = %opt.listen_addr, ?enrichment, "listening");

    server::serve(listener, app).await?;
    Ok(())
}
