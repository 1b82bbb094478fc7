//! The fixed request every worker sends.
//!
//! A `RequestTemplate` is built once, then shared read-only by all workers for
//! the whole run. There is no per-dispatch templating.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::TemplateError;

/// HTTP methods the transport knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            "OPTIONS" => Method::Options,
            _ => return Err(TemplateError::UnknownMethod(s.to_string())),
        };
        Ok(method)
    }
}

/// Method, URL, headers and body of the request issued by every worker.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestTemplate {
    /// Validates `url` and builds a template with no headers and no body.
    /// Only `http` and `https` URLs are accepted.
    pub fn new(method: Method, url: &str) -> Result<Self, TemplateError> {
        let url = Url::parse(url.trim())?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TemplateError::UnsupportedScheme(other.to_string())),
        }
        Ok(Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Shorthand for a GET template.
    pub fn get(url: &str) -> Result<Self, TemplateError> {
        Self::new(Method::Get, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Parse a `Name: value` header string (curl-style `-H` argument).
pub fn parse_header(line: &str) -> Result<(String, String), TemplateError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| TemplateError::InvalidHeader(line.to_string()))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(TemplateError::InvalidHeader(line.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
