//! Response body content encodings.

use std::fmt;
use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

/// A content coding the server can apply to a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    /// Picks the coding to use for a response given the request's
    /// `Accept-Encoding` header value, if any.
    ///
    /// The header is searched for the token `gzip` anywhere in its value, so
    /// both `gzip` and `deflate, gzip, br` select gzip.
    ///
    /// # Examples
    ///
    /// ```
    /// use tcp_http::http::ContentEncoding;
    ///
    /// assert_eq!(ContentEncoding::negotiate(Some("br, gzip")), Some(ContentEncoding::Gzip));
    /// assert_eq!(ContentEncoding::negotiate(Some("invalid-encoding")), None);
    /// assert_eq!(ContentEncoding::negotiate(None), None);
    /// ```
    pub fn negotiate(accept_encoding: Option<&str>) -> Option<Self> {
        accept_encoding
            .filter(|value| value.contains("gzip"))
            .map(|_| Self::Gzip)
    }

    /// Returns the `Content-Encoding` header value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
        }
    }

    /// Encodes `body` with this coding.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the encoder fails.
    pub fn encode(self, body: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(body)?;
                encoder.finish()
            }
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn negotiate_substring_match() {
        assert_eq!(
            ContentEncoding::negotiate(Some("gzip")),
            Some(ContentEncoding::Gzip)
        );
        assert_eq!(
            ContentEncoding::negotiate(Some("encoding-1, gzip, encoding-2")),
            Some(ContentEncoding::Gzip)
        );
        assert_eq!(ContentEncoding::negotiate(Some("deflate")), None);
    }

    #[test]
    fn gzip_decodes_back_to_input() {
        let compressed = ContentEncoding::Gzip.encode(b"abc").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "abc");
    }
}
