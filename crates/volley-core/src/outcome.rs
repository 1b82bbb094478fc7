//! Result of one executed request, plus failure classification for reports.

use std::fmt;
use std::time::Duration;

use crate::error::RequestError;

/// Successful response descriptor.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u32,
    /// Headers of the final response (after redirects), in arrival order.
    pub headers: Vec<(String, String)>,
    /// Body bytes; empty unless the transport captures bodies.
    pub body: Vec<u8>,
    /// Number of body bytes received, whether captured or not.
    pub body_len: u64,
}

impl Response {
    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One executed request. Outcomes arrive in no particular order.
#[derive(Debug)]
pub struct Outcome {
    /// 1-based claim number the worker won for this request.
    pub claim: u64,
    /// Wall time spent in the transport call.
    pub elapsed: Duration,
    pub result: Result<Response, RequestError>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// HTTP status if one was received (success or non-2xx failure).
    pub fn status(&self) -> Option<u32> {
        match &self.result {
            Ok(resp) => Some(resp.status),
            Err(RequestError::Http(code)) => Some(*code),
            Err(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.result.as_ref().err().map(classify)
    }
}

/// Coarse failure category for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    /// Operation timed out (connect or total).
    Timeout,
    /// Network-level failure (refused, reset, DNS).
    Connection,
    /// Non-2xx response.
    Http(u32),
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Connection => f.write_str("connection"),
            FailureKind::Http(code) => write!(f, "http {}", code),
            FailureKind::Other => f.write_str("other"),
        }
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connection;
    }
    FailureKind::Other
}

pub fn classify(e: &RequestError) -> FailureKind {
    match e {
        RequestError::Curl(ce) => classify_curl_error(ce),
        RequestError::Http(code) => FailureKind::Http(*code),
        RequestError::Transport(_) => FailureKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(result: Result<Response, RequestError>) -> Outcome {
        Outcome {
            claim: 1,
            elapsed: Duration::from_millis(3),
            result,
        }
    }

    #[test]
    fn success_reports_status_and_no_failure_kind() {
        let o = outcome(Ok(Response {
            status: 204,
            ..Response::default()
        }));
        assert!(o.is_success());
        assert_eq!(o.status(), Some(204));
        assert!(o.failure_kind().is_none());
    }

    #[test]
    fn http_failure_keeps_status() {
        let o = outcome(Err(RequestError::Http(503)));
        assert!(!o.is_success());
        assert_eq!(o.status(), Some(503));
        assert_eq!(o.failure_kind(), Some(FailureKind::Http(503)));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let o = outcome(Err(RequestError::Transport("reset".into())));
        assert_eq!(o.status(), None);
        assert_eq!(o.failure_kind(), Some(FailureKind::Other));
    }

    #[test]
    fn curl_timeout_and_connect_classified() {
        // CURLE_OPERATION_TIMEDOUT = 28, CURLE_COULDNT_CONNECT = 7
        assert_eq!(
            classify_curl_error(&curl::Error::new(28)),
            FailureKind::Timeout
        );
        assert_eq!(
            classify_curl_error(&curl::Error::new(7)),
            FailureKind::Connection
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = Response {
            status: 200,
            headers: vec![("Content-Type".into(), "text/plain".into())],
            ..Response::default()
        };
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("etag"), None);
    }
}
