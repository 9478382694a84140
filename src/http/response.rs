//! HTTP/1.1 response builder and encoder.
//!
//! A [`Response`] is serialized in full into one buffer before anything
//! touches the socket, so a reply is never half-written.

use std::io;

use bytes::{BufMut, BytesMut};
use thiserror::Error;

use super::{ContentEncoding, StatusCode};

/// Errors produced while encoding a response.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to compress response body: {0}")]
    Compression(#[source] io::Error),
}

/// An HTTP response, ready to be encoded and sent.
///
/// # Examples
///
/// ```
/// use tcp_http::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .content_type("text/plain")
///     .body("abc");
///
/// let bytes = response.into_bytes().unwrap();
/// assert_eq!(
///     &bytes[..],
///     &b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc"[..]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    protocol: String,
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
    encoding: Option<ContentEncoding>,
}

impl Response {
    /// Default `Content-Type` for responses that never set one.
    pub const DEFAULT_CONTENT_TYPE: &'static str = "text/plain";

    /// Creates an `HTTP/1.1` response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            protocol: "HTTP/1.1".to_owned(),
            status,
            content_type: Self::DEFAULT_CONTENT_TYPE.to_owned(),
            body: Vec::new(),
            encoding: None,
        }
    }

    /// Sets the protocol token written at the start of the status line.
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Sets the `Content-Type` header value.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Sets the response body from raw bytes.
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Marks the body to be encoded with `encoding` when serialized.
    #[must_use]
    pub fn encoding(mut self, encoding: Option<ContentEncoding>) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the `Content-Type` value.
    pub fn mime(&self) -> &str {
        &self.content_type
    }

    /// Returns the unencoded body.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    /// Returns the content coding the body will be sent with, if any.
    pub fn content_encoding(&self) -> Option<ContentEncoding> {
        self.encoding
    }

    /// Serializes the response into a `BytesMut` buffer in wire format.
    ///
    /// Header order is fixed: `Content-Encoding` (only when set),
    /// `Content-Type`, `Content-Length`, `Connection: close`. The
    /// `Content-Length` counts the bytes actually sent, i.e. the compressed
    /// body when an encoding is set.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Compression`] if the body cannot be encoded.
    /// No partial buffer is produced in that case.
    pub fn into_bytes(self) -> Result<BytesMut, EncodeError> {
        let body = match self.encoding {
            Some(encoding) => encoding
                .encode(&self.body)
                .map_err(EncodeError::Compression)?,
            None => self.body,
        };

        let mut buf = BytesMut::with_capacity(160 + body.len());

        buf.put(format!("{} {}\r\n", self.protocol, self.status).as_bytes());
        if let Some(encoding) = self.encoding {
            buf.put(format!("Content-Encoding: {encoding}\r\n").as_bytes());
        }
        buf.put(format!("Content-Type: {}\r\n", self.content_type).as_bytes());
        buf.put(format!("Content-Length: {}\r\n", body.len()).as_bytes());
        buf.put(&b"Connection: close\r\n"[..]);

        // Header/body separator
        buf.put(&b"\r\n"[..]);
        buf.put(body.as_slice());

        Ok(buf)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn empty_ok_response() {
        let s = to_string(Response::new(StatusCode::Ok).into_bytes().unwrap());
        assert_eq!(
            s,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn protocol_is_echoed() {
        let r = Response::new(StatusCode::NotFound).protocol("HTTP/1.0");
        let s = to_string(r.into_bytes().unwrap());
        assert!(s.starts_with("HTTP/1.0 404 Not Found\r\n"));
    }

    #[test]
    fn binary_body_length() {
        let r = Response::new(StatusCode::Ok)
            .content_type("application/octet-stream")
            .body_bytes(vec![0u8, 159, 146, 150]);
        let bytes = r.into_bytes().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Content-Type: application/octet-stream\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(bytes.ends_with(&[0u8, 159, 146, 150]));
    }

    #[test]
    fn gzip_header_order_and_length() {
        let r = Response::new(StatusCode::Ok)
            .body("hello hello hello")
            .encoding(Some(ContentEncoding::Gzip));
        let bytes = r.into_bytes().unwrap();

        let split = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .unwrap();
        let head = std::str::from_utf8(&bytes[..split]).unwrap();
        let body = &bytes[split + 4..];

        let lines: Vec<&str> = head.split("\r\n").collect();
        assert_eq!(lines[0], "HTTP/1.1 200 OK");
        assert_eq!(lines[1], "Content-Encoding: gzip");
        assert_eq!(lines[2], "Content-Type: text/plain");
        assert_eq!(lines[3], format!("Content-Length: {}", body.len()));
        assert_eq!(lines[4], "Connection: close");

        let mut decoded = String::new();
        GzDecoder::new(body).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "hello hello hello");
    }
}
