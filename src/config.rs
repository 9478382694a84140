//! Server configuration from command-line flags and environment.
//!
//! ```bash
//! tcp-http --directory /tmp/files
//! TCP_HTTP_DIRECTORY=/tmp/files tcp-http --port 8080
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::storage::StaticFiles;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Parser)]
#[command(name = "tcp-http")]
#[command(about = "A small HTTP/1.1 server on raw TCP sockets")]
#[command(version)]
pub struct ServerConfig {
    /// Directory served and written by the /files/<name> routes
    #[arg(long, env = "TCP_HTTP_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0", env = "TCP_HTTP_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 4221, env = "TCP_HTTP_PORT")]
    pub port: u16,
}

impl ServerConfig {
    /// Address to bind, as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The static-file store for the configured directory.
    pub fn static_files(&self) -> StaticFiles {
        match &self.directory {
            Some(dir) => StaticFiles::new(dir),
            None => StaticFiles::unconfigured(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            directory: None,
            host: "0.0.0.0".to_string(),
            port: 4221,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address() {
        assert_eq!(ServerConfig::default().address(), "0.0.0.0:4221");
    }

    #[test]
    fn parse_directory_flag() {
        let config =
            ServerConfig::try_parse_from(["tcp-http", "--directory", "/tmp/files"]).unwrap();
        assert_eq!(config.directory, Some(PathBuf::from("/tmp/files")));
        assert_eq!(
            config.static_files().root(),
            Some(std::path::Path::new("/tmp/files"))
        );
    }

    #[test]
    fn parse_port_override() {
        let config = ServerConfig::try_parse_from(["tcp-http", "-p", "8080"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn missing_directory_is_unconfigured() {
        let config = ServerConfig::default();
        assert!(config.static_files().root().is_none());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(ServerConfig::try_parse_from(["tcp-http", "--port", "99999"]).is_err());
    }
}
