//! Outgoing response body and the two response shapes the proxy produces.
//!
//! Every response is either a relay of the upstream one or a plain-text
//! `400 Bad Request`. Both carry the same boxed body type so the server's
//! service has a single concrete return type.

use bytes::Bytes;
use futures_util::TryStreamExt;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Frame;

/// Error carried by a response body stream.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The body type of every response the proxy writes.
///
/// Unsync because the upstream byte stream is only ever polled from the
/// connection task that owns it.
pub type ProxyBody = UnsyncBoxBody<Bytes, BoxError>;

/// Prefix of every forwarding-failure body.
pub const BAD_REQUEST_PREFIX: &str = "Bad request: ";

/// `400 Bad Request` with `Bad request:  <error>` as a text body.
///
/// The prefix and the error are joined by a space, so the body carries two
/// spaces after the colon. The error is rendered with its whole cause chain.
pub fn bad_request(err: &dyn std::error::Error) -> Response<ProxyBody> {
    let text = format!("{BAD_REQUEST_PREFIX} {}\n", describe(err));
    let body = Full::new(Bytes::from(text))
        .map_err(|never| match never {})
        .boxed_unsync();

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::BAD_REQUEST;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// `outer: cause: root cause`, skipping causes the outer text already spells
/// out.
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Wraps the upstream response body for streaming back to the caller.
///
/// Chunks are forwarded as they arrive, never buffered as a whole. Dropping
/// the returned body, whether after the last chunk or because the caller
/// went away, drops the upstream response and closes its connection.
pub fn relay(upstream: reqwest::Response) -> ProxyBody {
    let chunks = upstream
        .bytes_stream()
        .map_ok(Frame::data)
        .map_err(BoxError::from);

    StreamBody::new(chunks).boxed_unsync()
}
