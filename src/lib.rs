//! # tcp_http
//!
//! A small HTTP/1.1 server written directly on top of Tokio TCP sockets.
//!
//! It serves a fixed route table: `/`, `/echo/<value>` (optionally gzip
//! encoded), `/user-agent`, and `GET`/`POST` on `/files/<name>` backed by a
//! static-file directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcp_http::server::Server;
//! use tcp_http::storage::StaticFiles;
//! use tcp_http::Router;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:4221").await?;
//!     server.run(Router::builtin(StaticFiles::new("/tmp/files"))).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod http;
pub mod router;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
