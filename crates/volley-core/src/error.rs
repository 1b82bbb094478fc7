//! Error types for the dispatch engine.
//!
//! `RequestError` is the only runtime failure and never escapes a worker: it
//! rides inside an `Outcome`. `PlanError` and `TemplateError` are raised at
//! construction time, before any request is sent.

use thiserror::Error;

/// Failure of one request execution (connection, timeout, non-2xx status).
#[derive(Debug, Error)]
pub enum RequestError {
    /// Curl reported an error (timeout, connection refused, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Failure reported by a non-curl transport.
    #[error("transport: {0}")]
    Transport(String),
}

/// Invalid dispatcher construction arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    /// The output channel is pre-sized to the request count, so it must fit in memory.
    #[error("request count {0} is too large for this platform")]
    CountTooLarge(u64),
}

/// Invalid request template input.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("unknown HTTP method {0:?}")]
    UnknownMethod(String),
    #[error("invalid header {0:?} (expected \"Name: value\")")]
    InvalidHeader(String),
}
