//! Country lookup for the sender's address.

mod mmdb;

use std::net::IpAddr;

pub use mmdb::MmdbResolver;

/// Country code reported when no better answer exists.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Maps an address to an ISO 3166-1 alpha-2 country code.
///
/// Implementations never fail: a malformed address, a missing record or a
/// failed lookup all yield [`UNKNOWN_COUNTRY`].
pub trait CountryResolver: Send + Sync {
    fn country_code(&self, address: &str) -> String;
}

/// Reports IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) in their IPv4 form.
pub fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}
