//! # cors-relay
//!
//! A forwarding proxy that makes any HTTP endpoint callable from a browser.
//! The caller puts the upstream URL in the path; the proxy forwards the
//! request there and hands the response back with permissive CORS headers.
//!
//! ```text
//! fetch("http://localhost:8080/https://api.example.com/v1/items?page=2")
//!        └──── relay ────────┘ └──────────── upstream ───────────────┘
//! ```
//!
//! ## The contract
//!
//! - Method, headers and body go upstream as received. Repeated headers are
//!   collapsed to their first value, in both directions.
//! - Status, headers and body come back as the upstream sent them, plus
//!   `Access-Control-Allow-Origin: *`, `Access-Control-Allow-Credentials:
//!   true`, and `Access-Control-Allow-Methods` / `-Headers` echoing the
//!   preflight request.
//! - Anything that stops the request from reaching an upstream (a path that
//!   is not an absolute URL, DNS failure, refused connection) is a
//!   `400 Bad Request` with the error as plain text.
//!
//! It is an open relay. It checks nothing about where requests go.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cors_relay::{Config, Proxy, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cors_relay::Error> {
//!     let config = Config::from_env()?;
//!     let proxy = Proxy::new(&config)?;
//!     Server::bind(config.addr).await?.serve(proxy).await
//! }
//! ```

mod config;
mod error;
mod proxy;
mod server;

pub mod headers;
pub mod response;
pub mod target;

pub use config::Config;
pub use error::{ConfigError, Error};
pub use proxy::Proxy;
pub use server::Server;
