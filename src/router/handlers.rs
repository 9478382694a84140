//! The server's built-in route handlers.

use tracing::warn;

use crate::context::Context;
use crate::http::ContentEncoding;
use crate::{Response, StatusCode};

const TEXT_PLAIN: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

/// `/` — empty `200 OK`.
pub async fn root(_ctx: Context) -> Response {
    Response::new(StatusCode::Ok)
}

/// `/echo/:value` — returns the path parameter verbatim, gzip-encoded when the
/// client's `Accept-Encoding` mentions gzip.
pub async fn echo(ctx: Context) -> Response {
    let encoding = ContentEncoding::negotiate(ctx.request().headers().get("Accept-Encoding"));
    Response::new(StatusCode::Ok)
        .content_type(TEXT_PLAIN)
        .body(ctx.param("value").to_owned())
        .encoding(encoding)
}

/// `/user-agent` — returns the full `User-Agent` header value.
pub async fn user_agent(ctx: Context) -> Response {
    let agent = ctx
        .request()
        .headers()
        .get("User-Agent")
        .unwrap_or_default()
        .to_owned();
    Response::new(StatusCode::Ok)
        .content_type(TEXT_PLAIN)
        .body(agent)
}

/// `GET /files/:name` — file contents, or `404` on any read failure.
pub async fn read_file(ctx: Context) -> Response {
    let name = ctx.param("name");
    match ctx.files().read(name).await {
        Ok(contents) => Response::new(StatusCode::Ok)
            .content_type(OCTET_STREAM)
            .body_bytes(contents),
        Err(e) => {
            warn!(file = %name, error = %e, "file read failed");
            Response::new(StatusCode::NotFound)
        }
    }
}

/// `POST /files/:name` — stores the request body, `201` on success, `500` otherwise.
pub async fn write_file(ctx: Context) -> Response {
    let name = ctx.param("name");
    match ctx.files().write(name, ctx.request().body()).await {
        Ok(()) => Response::new(StatusCode::Created),
        Err(e) => {
            warn!(file = %name, error = %e, "file write failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Request;
    use crate::context::Parameters;
    use crate::storage::StaticFiles;

    fn scratch_dir() -> std::path::PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "tcp-http-handlers-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ctx(raw: &[u8], param: Option<(&str, &str)>, files: StaticFiles) -> Context {
        let (request, _) = Request::parse(raw).unwrap();
        let mut params = Parameters::new();
        if let Some((k, v)) = param {
            params.insert(k, v);
        }
        Context::new(request, params, Arc::new(files))
    }

    #[tokio::test]
    async fn echo_plain() {
        let c = ctx(
            b"GET /echo/abc HTTP/1.1\r\n\r\n",
            Some(("value", "abc")),
            StaticFiles::unconfigured(),
        );
        let res = echo(c).await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.mime(), "text/plain");
        assert_eq!(res.payload(), b"abc");
        assert_eq!(res.content_encoding(), None);
    }

    #[tokio::test]
    async fn echo_gzip() {
        let c = ctx(
            b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: deflate, gzip\r\n\r\n",
            Some(("value", "abc")),
            StaticFiles::unconfigured(),
        );
        let res = echo(c).await;
        assert_eq!(res.content_encoding(), Some(ContentEncoding::Gzip));
        assert_eq!(res.payload(), b"abc");
    }

    #[tokio::test]
    async fn echo_unknown_encoding() {
        let c = ctx(
            b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: invalid-encoding\r\n\r\n",
            Some(("value", "abc")),
            StaticFiles::unconfigured(),
        );
        assert_eq!(echo(c).await.content_encoding(), None);
    }

    #[tokio::test]
    async fn user_agent_full_value() {
        let c = ctx(
            b"GET /user-agent HTTP/1.1\r\nUser-Agent: test-client/1.0\r\n\r\n",
            None,
            StaticFiles::unconfigured(),
        );
        let res = user_agent(c).await;
        assert_eq!(res.payload(), b"test-client/1.0");
        assert_eq!(res.mime(), "text/plain");
    }

    #[tokio::test]
    async fn user_agent_missing_header() {
        let c = ctx(
            b"GET /user-agent HTTP/1.1\r\n\r\n",
            None,
            StaticFiles::unconfigured(),
        );
        let res = user_agent(c).await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert!(res.payload().is_empty());
    }

    #[tokio::test]
    async fn write_then_read_file() {
        let dir = scratch_dir();
        let c = ctx(
            b"POST /files/foo.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
            Some(("name", "foo.txt")),
            StaticFiles::new(&dir),
        );
        assert_eq!(write_file(c).await.status(), StatusCode::Created);

        let c = ctx(
            b"GET /files/foo.txt HTTP/1.1\r\n\r\n",
            Some(("name", "foo.txt")),
            StaticFiles::new(&dir),
        );
        let res = read_file(c).await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.mime(), "application/octet-stream");
        assert_eq!(res.payload(), b"hello");
    }

    #[tokio::test]
    async fn read_missing_file_is_404() {
        let c = ctx(
            b"GET /files/nope HTTP/1.1\r\n\r\n",
            Some(("name", "nope")),
            StaticFiles::new(scratch_dir()),
        );
        let res = read_file(c).await;
        assert_eq!(res.status(), StatusCode::NotFound);
        assert!(res.payload().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_500() {
        let c = ctx(
            b"POST /files/a HTTP/1.1\r\nContent-Length: 1\r\n\r\nx",
            Some(("name", "a")),
            StaticFiles::unconfigured(),
        );
        assert_eq!(
            write_file(c).await.status(),
            StatusCode::InternalServerError
        );
    }
}
