//! Unified error type.

use thiserror::Error;

/// The error type returned by cors-relay's fallible operations.
///
/// Forwarding failures are expressed as `400 Bad Request` responses, not as
/// `Error`s. This type surfaces infrastructure failures: reading the
/// configuration, building the outbound client, binding to a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("client: {0}")]
    Client(#[from] reqwest::Error),
}

/// An environment variable held a value that could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT `{0}`: expected `8080`, `:8080` or `host:8080`")]
    InvalidPort(String),

    #[error("invalid MAX_REDIRECTS `{0}`: expected a non-negative integer")]
    InvalidMaxRedirects(String),
}
