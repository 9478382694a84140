//! HTTP/1.1 request framing and decoding using the [`httparse`] crate.

use bytes::Bytes;
use thiserror::Error;

use super::{Headers, Method};

/// Largest request (head plus body) a connection will buffer (8 MiB).
pub const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Errors that can occur while framing or decoding a request.
///
/// [`RequestError::Incomplete`] only means more bytes are needed; every other
/// variant is a malformed request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete — more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("request target must start with '/', got {target:?}")]
    InvalidTarget { target: String },

    #[error("invalid Content-Length header: {value:?}")]
    InvalidContentLength { value: String },

    #[error("request exceeds maximum allowed size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
}

impl RequestError {
    /// Returns `true` when the error only signals that the buffer is short.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete)
    }
}

/// A fully decoded HTTP/1.x request.
///
/// # Examples
///
/// ```
/// use tcp_http::http::{Method, Request};
///
/// let raw = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
/// let (request, consumed) = Request::parse(raw).unwrap();
///
/// assert_eq!(request.method(), &Method::Post);
/// assert_eq!(request.path(), "/files/a.txt");
/// assert_eq!(request.protocol(), "HTTP/1.1");
/// assert_eq!(&request.body()[..], b"hello");
/// assert_eq!(consumed, raw.len());
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    protocol: String,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers we support per request.
    const MAX_HEADERS: usize = 128;

    /// Parses one request from the front of `buf`.
    ///
    /// Returns the decoded `Request` and the number of bytes it occupied:
    /// the header block through its terminating empty line plus
    /// `Content-Length` body bytes. Anything after that belongs to the next
    /// request. A missing `Content-Length` means the body is empty.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the header block or the body has not fully arrived.
    /// - [`RequestError::Parse`] — the request line or a header line is malformed.
    /// - [`RequestError::MissingField`] — method, path or version is absent.
    /// - [`RequestError::InvalidTarget`] — the request target is not origin-form.
    /// - [`RequestError::InvalidContentLength`] — `Content-Length` is not a number, or
    ///   repeated `Content-Length` headers disagree.
    /// - [`RequestError::TooLarge`] — the declared request exceeds [`MAX_REQUEST_SIZE`].
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw_req = httparse::Request::new(&mut headers);

        let body_offset = match raw_req.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method: Method = match raw_req.method {
            Some(m) => m.parse().unwrap_or_else(|never| match never {}),
            None => return Err(RequestError::MissingField { field: "method" }),
        };

        let path = raw_req
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        if !path.starts_with('/') {
            return Err(RequestError::InvalidTarget {
                target: path.to_owned(),
            });
        }

        let version = raw_req
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw_req.headers.len());
        for header in raw_req.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        let content_length = content_length(raw_req.headers)?;

        let total = body_offset
            .checked_add(content_length)
            .filter(|total| *total <= MAX_REQUEST_SIZE)
            .ok_or(RequestError::TooLarge {
                max_bytes: MAX_REQUEST_SIZE,
            })?;
        if buf.len() < total {
            return Err(RequestError::Incomplete);
        }

        let body = strip_nul_bytes(&buf[body_offset..total]);

        Ok((
            Self {
                method,
                path: path.to_owned(),
                protocol: format!("HTTP/1.{version}"),
                headers: header_map,
                body,
            },
            total,
        ))
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw request target, e.g. `/echo/abc`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the protocol token from the request line, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` if the client asked for the connection to be closed.
    pub fn wants_close(&self) -> bool {
        self.headers
            .get_ignore_case("Connection")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("close"))
    }
}

// Every `Content-Length` header, whatever its casing, must carry the same value.
fn content_length(headers: &[httparse::Header<'_>]) -> Result<usize, RequestError> {
    let mut length = None;
    for header in headers
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case("Content-Length"))
    {
        let text = String::from_utf8_lossy(header.value);
        let invalid = || RequestError::InvalidContentLength {
            value: text.trim().to_owned(),
        };
        let value = text.trim().parse::<usize>().map_err(|_| invalid())?;
        match length {
            Some(previous) if previous != value => return Err(invalid()),
            _ => length = Some(value),
        }
    }
    Ok(length.unwrap_or(0))
}

// Zero bytes are padding left by fixed-size client buffers; none survive decoding.
fn strip_nul_bytes(body: &[u8]) -> Bytes {
    if !body.contains(&0) {
        return Bytes::copy_from_slice(body);
    }
    body.iter().copied().filter(|&b| b != 0).collect::<Vec<u8>>().into()
}
