//! cors-relay binary.
//!
//! Run with:
//!   PORT=8080 RUST_LOG=cors_relay=debug cargo run
//!
//! Try:
//!   curl -i http://localhost:8080/https://httpbin.org/get?a=b
//!   curl -i -X POST http://localhost:8080/https://httpbin.org/post -d 'bar'

use cors_relay::{Config, Proxy, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), cors_relay::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cors_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        addr = %config.addr,
        max_redirects = config.max_redirects,
        "configuration loaded"
    );

    let proxy = Proxy::new(&config)?;
    Server::bind(config.addr).await?.serve(proxy).await
}
