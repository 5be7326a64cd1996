//! Upstream target resolution.
//!
//! The caller names the upstream in the request path itself:
//!
//! ```text
//! GET /http://example.com/foo?a=b
//!      └──────────────────┘ └─┘
//!        path minus "/"     raw query
//! ```
//!
//! The path is percent-decoded first, so a browser that encodes the whole
//! target (`/http%3A%2F%2Fexample.com%2Ffoo`) reaches the same upstream.
//! Only the first `/` is framing. Everything after it is taken literally, so
//! a path such as `//example.com` resolves to `/example.com?`, which is not
//! an absolute URL and fails at send time.

use std::str::Utf8Error;

use http::Uri;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// The request path decoded to bytes that are not UTF-8.
#[derive(Debug, Error)]
#[error("invalid target path")]
pub struct TargetError(#[from] Utf8Error);

/// Builds the target URL string: the decoded path without its leading `/`,
/// then `?` and the raw query (already percent-encoded, passed through
/// untouched).
///
/// The result is not validated as a URL here. The outbound client rejects
/// anything that is not an absolute `http`/`https` URL, which the handler
/// turns into a 400, as it does a [`TargetError`].
pub fn resolve(uri: &Uri) -> Result<String, TargetError> {
    let path = percent_decode_str(uri.path()).decode_utf8()?;
    let rest = path.strip_prefix('/').unwrap_or(&path);
    let query = uri.query().unwrap_or("");

    let mut target = String::with_capacity(rest.len() + 1 + query.len());
    target.push_str(rest);
    target.push('?');
    target.push_str(query);
    Ok(target)
}
