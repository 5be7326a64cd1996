//! Runtime configuration from environment variables.
//!
//! | Variable        | Default | Meaning |
//! |-----------------|---------|---------|
//! | `PORT`          | `8080`  | `9000`, `:9000` or `127.0.0.1:9000` |
//! | `MAX_REDIRECTS` | `10`    | Upstream redirects followed per request; `0` relays the 3xx |
//!
//! Log verbosity is read separately by the binary from `RUST_LOG`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Listen address and outbound client policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub max_redirects: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Config {
    /// Reads `PORT` and `MAX_REDIRECTS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. Unset or empty values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.addr = parse_addr(port.trim())
                .ok_or(ConfigError::InvalidPort(port))?;
        }

        if let Some(hops) = lookup("MAX_REDIRECTS").filter(|v| !v.trim().is_empty()) {
            config.max_redirects = hops.trim().parse()
                .map_err(|_| ConfigError::InvalidMaxRedirects(hops))?;
        }

        Ok(config)
    }
}

fn parse_addr(value: &str) -> Option<SocketAddr> {
    let any = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    if let Ok(port) = value.parse::<u16>() {
        return Some(SocketAddr::new(any, port));
    }
    if let Some(port) = value.strip_prefix(':') {
        return port.parse().ok().map(|port| SocketAddr::new(any, port));
    }
    value.parse().ok()
}
