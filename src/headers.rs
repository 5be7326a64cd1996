//! Header copying and the CORS overlay.
//!
//! Both directions copy headers the same lossy way: one value per name, the
//! first one seen. A request carrying `Accept: a` and `Accept: b` reaches the
//! upstream as `Accept: a`; the same holds for upstream response headers
//! relayed to the caller.

use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    HOST,
};
use http::{HeaderMap, HeaderName, HeaderValue};

/// Copies the first value of every header in `src` into `dst`, replacing
/// whatever `dst` held for that name.
pub fn collapse_into(src: &HeaderMap, dst: &mut HeaderMap) {
    for name in src.keys() {
        if let Some(value) = src.get(name) {
            dst.insert(name.clone(), value.clone());
        }
    }
}

/// The header map sent upstream: inbound headers collapsed to one value each,
/// minus `Host`, which must name the upstream rather than this proxy.
pub fn outbound(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.keys_len());
    collapse_into(inbound, &mut headers);
    // The outbound client derives Host from the target URL.
    headers.remove(HOST);
    headers
}

/// The CORS values echoed back to the caller, captured from the inbound
/// request before its headers are handed to the outbound client.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl Cors {
    /// Mirrors `Access-Control-Request-Method` and `-Headers`; absent headers
    /// become empty values.
    pub fn from_request(headers: &HeaderMap) -> Self {
        let echo = |name: HeaderName| headers.get(name).cloned().unwrap_or_else(|| HeaderValue::from_static(""));
        Self {
            allow_methods: echo(ACCESS_CONTROL_REQUEST_METHOD),
            allow_headers: echo(ACCESS_CONTROL_REQUEST_HEADERS),
        }
    }

    /// Sets the four `Access-Control-Allow-*` headers, overwriting any value
    /// the upstream sent.
    pub fn apply(self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods);
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers);
    }
}
