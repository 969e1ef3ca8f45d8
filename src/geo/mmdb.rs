use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;

use super::{canonical_ip, CountryResolver, UNKNOWN_COUNTRY};
use crate::error::Result;

// Only the part of a GeoLite2/GeoIP2 Country record that is needed.
#[derive(Deserialize, Debug)]
struct CountryRecord {
    country: Option<CountryInfo>,
}

#[derive(Deserialize, Debug)]
struct CountryInfo {
    iso_code: Option<String>,
}

/// [`CountryResolver`] backed by a MaxMind country database loaded in memory.
pub struct MmdbResolver {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl MmdbResolver {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = maxminddb::Reader::open_readfile(path).map_err(|e| {
            (
                format!("failed to open GeoIP database {}", path.display()),
                e,
            )
        })?;

        tracing::info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "loaded GeoIP database"
        );
        Ok(Self { reader })
    }

    fn lookup(&self, ip: IpAddr) -> Option<String> {
        match self.reader.lookup::<CountryRecord>(ip) {
            Ok(record) => record.country?.iso_code.filter(|code| !code.is_empty()),
            Err(e) => {
                tracing::debug!(%ip, error = %e, "country lookup failed");
                None
            }
        }
    }
}

impl CountryResolver for MmdbResolver {
    fn country_code(&self, address: &str) -> String {
        resolve_country(address, |ip| self.lookup(ip))
    }
}

fn resolve_country<F>(address: &str, lookup: F) -> String
where
    F: FnOnce(IpAddr) -> Option<String>,
{
    let ip = match address.parse::<IpAddr>() {
        Ok(ip) => canonical_ip(ip),
        Err(_) => {
            tracing::debug!(address, "not an IP address");
            return String::from(UNKNOWN_COUNTRY);
        }
    };

    lookup(ip).unwrap_or_else(|| String::from(UNKNOWN_COUNTRY))
}
