//! Request execution: the one collaborator the dispatcher calls per claim.
//!
//! The dispatcher treats a `Transport` as an opaque synchronous call. The
//! production implementation drives libcurl through the `curl` crate with one
//! reusable easy handle per worker thread, so each worker keeps its own
//! connection alive across claims.

use std::cell::RefCell;
use std::str;
use std::sync::Arc;
use std::time::Duration;

use curl::easy::{Easy, List};

use crate::config::VolleyConfig;
use crate::error::RequestError;
use crate::outcome::Response;
use crate::request::{Method, RequestTemplate};

/// Performs one request described by a template.
///
/// Implementations are shared by every worker, hence `Send + Sync`. A non-2xx
/// response is reported as `RequestError::Http`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &RequestTemplate) -> Result<Response, RequestError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &RequestTemplate) -> Result<Response, RequestError> {
        (**self).execute(request)
    }
}

/// Knobs for `CurlTransport`. Defaults match `VolleyConfig::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Hard limit for the whole transfer.
    pub timeout: Duration,
    pub follow_redirects: bool,
    /// Keep response bodies in `Response::body` (otherwise only counted).
    pub capture_body: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            capture_body: false,
        }
    }
}

impl TransportOptions {
    pub fn from_config(cfg: &VolleyConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            follow_redirects: cfg.follow_redirects,
            capture_body: cfg.capture_body,
        }
    }
}

/// Formats a header for curl's list. curl drops `Name:` with an empty value
/// (that form removes an internal header), so empty values use `Name;`.
fn header_line(name: &str, value: &str) -> String {
    let (name, value) = (name.trim(), value.trim());
    if value.is_empty() {
        format!("{};", name)
    } else {
        format!("{}: {}", name, value)
    }
}

thread_local! {
    static HANDLE: RefCell<Easy> = RefCell::new(Easy::new());
}

/// libcurl-backed transport.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn perform(&self, easy: &mut Easy, request: &RequestTemplate) -> Result<Response, RequestError> {
        easy.url(request.url().as_str())?;
        match (request.method(), request.body_bytes()) {
            (Method::Head, _) => easy.nobody(true)?,
            (Method::Get, None) => easy.get(true)?,
            (Method::Post, None) => {
                easy.post(true)?;
                easy.post_field_size(0)?;
            }
            (method, body) => {
                if let Some(body) = body {
                    easy.post_fields_copy(body)?;
                }
                easy.custom_request(method.as_str())?;
            }
        }
        easy.follow_location(self.options.follow_redirects)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        if !request.headers().is_empty() {
            let mut list = List::new();
            for (k, v) in request.headers() {
                list.append(&header_line(k, v))?;
            }
            easy.http_headers(list)?;
        }

        let capture = self.options.capture_body;
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let mut body_len = 0u64;
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    let line = line.trim_end();
                    // A new status line starts a new response (redirect, 100-continue).
                    if line.starts_with("HTTP/") {
                        headers.clear();
                    } else if let Some((name, value)) = line.split_once(':') {
                        headers.push((name.trim().to_string(), value.trim().to_string()));
                    }
                }
                true
            })?;
            transfer.write_function(|data| {
                body_len += data.len() as u64;
                if capture {
                    body.extend_from_slice(data);
                }
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(RequestError::Http(status));
        }

        Ok(Response {
            status,
            headers,
            body,
            body_len,
        })
    }
}

impl Transport for CurlTransport {
    fn execute(&self, request: &RequestTemplate) -> Result<Response, RequestError> {
        HANDLE.with(|cell| {
            let mut easy = cell.borrow_mut();
            // Clears options from the previous claim but keeps the connection cache.
            easy.reset();
            self.perform(&mut easy, request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let cfg = VolleyConfig {
            connect_timeout_secs: 2,
            timeout_secs: 9,
            follow_redirects: false,
            capture_body: true,
            ..VolleyConfig::default()
        };
        let opts = TransportOptions::from_config(&cfg);
        assert_eq!(opts.connect_timeout, Duration::from_secs(2));
        assert_eq!(opts.timeout, Duration::from_secs(9));
        assert!(!opts.follow_redirects);
        assert!(opts.capture_body);
    }

    #[test]
    fn defaults_match_config_defaults() {
        assert_eq!(
            TransportOptions::default(),
            TransportOptions::from_config(&VolleyConfig::default())
        );
        assert!(!TransportOptions::default().capture_body);
    }

    #[test]
    fn empty_header_value_uses_semicolon_form() {
        assert_eq!(header_line("X-Empty", ""), "X-Empty;");
        assert_eq!(header_line(" X-Empty ", "   "), "X-Empty;");
        assert_eq!(header_line("Accept", " */* "), "Accept: */*");
    }

    #[test]
    fn unreachable_host_is_a_connection_failure() {
        // Port 1 on loopback is essentially never listening.
        let transport = CurlTransport::new(TransportOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(2),
            ..TransportOptions::default()
        });
        let request = RequestTemplate::get("http://127.0.0.1:1/").unwrap();
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, RequestError::Curl(_)), "got {:?}", err);
    }
}
