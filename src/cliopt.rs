use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use crate::enrich::Enrichment;
use crate::error::Result;
use crate::parser::parse_duration;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "metrelay",
    about = "Tags pushed metrics with cluster identity labels and forwards them"
)]
pub struct CliOpt {
    /// MaxMind country database used to resolve the sender's country.
    #[structopt(long = "geoip-db", default_value = "/GeoLite2-Country.mmdb")]
    pub geoip_db: PathBuf,

    #[structopt(
        long = "forward-url",
        default_value = "http://vminsert-cozy-telemetry:8480/insert/0/prometheus/api/v1/import/prometheus"
    )]
    pub forward_url: String,

    /// Either `host:port` or `:port`.
    #[structopt(long = "listen-addr", default_value = "0.0.0.0:8081", parse(try_from_str = parse_listen_addr))]
    pub listen_addr: SocketAddr,

    #[structopt(long = "request-timeout", default_value = "10s", parse(try_from_str = parse_duration))]
    pub request_timeout: Duration,

    #[structopt(long = "forward-timeout", parse(try_from_str = parse_duration))]
    pub forward_timeout: Option<Duration>,

    /// Largest accepted request body, in bytes.
    #[structopt(long = "max-body-size", default_value = "67108864")]
    pub max_body_size: usize,

    #[structopt(long = "skip-source-ip")]
    pub skip_source_ip: bool,

    /// Don't inject country_code. The GeoIP database is not opened either.
    #[structopt(long = "skip-country-code")]
    pub skip_country_code: bool,
}

impl CliOpt {
    pub fn enrichment(&self) -> Enrichment {
        Enrichment {
            source_ip: !self.skip_source_ip,
            country_code: !self.skip_country_code,
        }
    }
}

fn parse_listen_addr(s: &str) -> Result<SocketAddr> {
    let addr = match s.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => s.to_owned(),
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| (format!("invalid listen address \"{}\"", s), e).into())
}
