//! Shared utilities for the integration tests: a programmable upstream and a
//! relay running on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use cors_relay::{Config, Proxy, Server};
use http::{HeaderMap, Method, Request, Response, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// What the upstream saw of one forwarded request.
#[derive(Debug)]
pub struct Seen {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A running upstream. Every request it receives is reported on `seen`.
pub struct Upstream {
    pub addr: SocketAddr,
    seen: mpsc::UnboundedReceiver<Seen>,
}

impl Upstream {
    /// `http://<addr><path>`, ready to be appended to a relay URL.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// The next request the upstream received.
    pub async fn next(&mut self) -> Seen {
        tokio::time::timeout(Duration::from_secs(5), self.seen.recv())
            .await
            .expect("upstream saw no request in time")
            .expect("upstream stopped")
    }

    /// Whether any request reached the upstream.
    pub fn saw_nothing(&mut self) -> bool {
        self.seen.try_recv().is_err()
    }
}

/// Start an HTTP/1.1 upstream whose response is computed by `respond`.
pub async fn spawn_upstream<F>(respond: F) -> Upstream
where
    F: Fn(&Seen) -> Response<Full<Bytes>> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);
    let (tx, seen) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            let tx = tx.clone();

            tokio::spawn(async move {
                let svc = service_fn(move |req: Request<Incoming>| {
                    let respond = Arc::clone(&respond);
                    let tx = tx.clone();
                    async move {
                        let (parts, body) = req.into_parts();
                        let body = body.collect().await?.to_bytes();
                        let seen = Seen {
                            method: parts.method,
                            uri: parts.uri,
                            headers: parts.headers,
                            body,
                        };
                        let response = respond(&seen);
                        let _ = tx.send(seen);
                        Ok::<_, hyper::Error>(response)
                    }
                });

                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    Upstream { addr, seen }
}

/// Start an upstream that answers every request with `200 OK` and `body`.
pub async fn spawn_text_upstream(body: &'static str) -> Upstream {
    spawn_upstream(move |_| Response::new(Full::new(Bytes::from_static(body.as_bytes())))).await
}

/// A relay served on an ephemeral port until [`Relay::stop`].
pub struct Relay {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), cors_relay::Error>>,
}

impl Relay {
    /// The relay URL that forwards to `target`.
    pub fn url(&self, target: &str) -> String {
        format!("http://{}/{}", self.addr, target)
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("relay did not shut down in time")
            .expect("relay task panicked")
            .expect("relay returned an error");
    }
}

pub async fn spawn_relay() -> Relay {
    spawn_relay_with(Config::default()).await
}

pub async fn spawn_relay_with(config: Config) -> Relay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = Server::from_listener(listener);
    let addr = server.local_addr().unwrap();
    let proxy = Proxy::new(&config).unwrap();
    let (shutdown, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server.serve_with_shutdown(proxy, async move {
        let _ = rx.await;
    }));

    Relay { addr, shutdown, handle }
}

/// A caller that talks to the relay directly and never follows redirects
/// itself, so what it sees is exactly what the relay wrote.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
