//! Process configuration from command-line flags and environment variables.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::ServerError;

/// Which `TodoStore` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// SQLite database file at `--database-path`.
    Sqlite,
    /// Volatile in-process store; data is lost on exit.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Runtime settings. Every flag can also be set through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "HTTP service for managing todo items")]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "TODO_STORAGE", value_enum, default_value_t = StorageKind::Sqlite)]
    pub storage: StorageKind,

    /// SQLite database file, created on first start.
    #[arg(long, env = "DATABASE_PATH", default_value = "data/todo.db")]
    pub database_path: PathBuf,

    /// `tracing` filter directives, e.g. `info,todo_core=debug`.
    #[arg(long, env = "TODO_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "TODO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    /// Resolves `host:port` to the first matching socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        let invalid = |source| ServerError::BindAddress {
            addr: addr.clone(),
            source,
        };
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(invalid)?
            .next()
            .ok_or_else(|| {
                invalid(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "host resolved to no addresses",
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["todo-server"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = parse(&[
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--storage",
            "memory",
            "--database-path",
            "/tmp/todos.db",
            "--log-filter",
            "debug",
            "--log-format",
            "json",
        ]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.database_path, PathBuf::from("/tmp/todos.db"));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_storage_is_rejected() {
        let result = Config::try_parse_from(["todo-server", "--storage", "postgres"]);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let result = Config::try_parse_from(["todo-server", "--port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn bind_addr_resolves_ip_literal() {
        let config = parse(&["--host", "127.0.0.1", "--port", "4321"]);
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:4321".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let config = parse(&["--host", "not a host", "--port", "4321"]);
        assert!(matches!(
            config.bind_addr(),
            Err(ServerError::BindAddress { .. })
        ));
    }
}
