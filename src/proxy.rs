//! The forwarding handler.
//!
//! One inbound request becomes one outbound request to the URL named in the
//! path; the upstream response comes back with the CORS overlay applied.
//!
//! ```text
//! caller ──▶ GET /http://upstream/foo?a=b ──▶ Proxy::handle
//!                                               │ target::resolve (percent-decoded)
//!                                               │ headers::outbound
//!                                               ▼
//!                                     reqwest ──▶ GET http://upstream/foo?a=b
//!                                               │
//!            status + headers + CORS ◀──────────┘ headers::collapse_into
//!            body stream             ◀─────────── response::relay
//! ```
//!
//! The handler keeps nothing between calls. The only shared piece is the
//! outbound client, whose connection pool is internally synchronised.

use futures_util::TryStreamExt;
use http::{Request, Response};
use http_body_util::BodyDataStream;
use hyper::body::{Body as _, Incoming};
use reqwest::redirect::Policy;
use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::headers::{self, Cors};
use crate::response::{self, ProxyBody};
use crate::target;

/// The CORS forwarding handler. Cheap to clone; clones share one client.
#[derive(Clone, Debug)]
pub struct Proxy {
    client: reqwest::Client,
}

impl Proxy {
    /// Builds the shared outbound client.
    ///
    /// Redirects are followed up to `config.max_redirects` hops; `0` turns
    /// following off so the upstream 3xx reaches the caller. A redirect that
    /// would need the already-streamed body replayed (307/308) is relayed
    /// instead of followed. Everything else is the client default, including
    /// `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY` from the environment.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let redirect = match config.max_redirects {
            0 => Policy::none(),
            hops => Policy::limited(hops),
        };

        let client = reqwest::Client::builder()
            .redirect(redirect)
            .build()?;

        Ok(Self { client })
    }

    /// Forwards `req` to the target in its path and relays the answer.
    ///
    /// Never fails: anything that goes wrong before an upstream response
    /// arrives becomes a `400 Bad Request` with the error text as its body.
    /// Upstream statuses, 4xx and 5xx included, are relayed untouched.
    pub async fn handle(&self, req: Request<Incoming>) -> Response<ProxyBody> {
        let (parts, body) = req.into_parts();
        let target = match target::resolve(&parts.uri) {
            Ok(target) => target,
            Err(e) => {
                debug!(method = %parts.method, path = parts.uri.path(), error = %e, "undecodable target");
                return response::bad_request(&e);
            }
        };
        let cors = Cors::from_request(&parts.headers);

        let mut outbound = self.client
            .request(parts.method.clone(), target.as_str())
            .headers(headers::outbound(&parts.headers));

        // A body-less request stays body-less instead of turning into an
        // empty chunked upload.
        if !body.is_end_stream() {
            let chunks = BodyDataStream::new(body).map_err(response::BoxError::from);
            outbound = outbound.body(reqwest::Body::wrap_stream(chunks));
        }

        let upstream = match outbound.send().await {
            Ok(upstream) => upstream,
            Err(e) => {
                debug!(method = %parts.method, url = %target, error = %e, "forward failed");
                return response::bad_request(&e);
            }
        };

        let status = upstream.status();
        debug!(method = %parts.method, url = %target, status = status.as_u16(), "relaying upstream response");

        let mut headers = http::HeaderMap::with_capacity(upstream.headers().keys_len() + 4);
        headers::collapse_into(upstream.headers(), &mut headers);
        cors.apply(&mut headers);

        let mut response = Response::new(response::relay(upstream));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
