use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use log::warn;
use tokio::net::lookup_host;

use crate::errors::WikiError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

/// Application configuration and constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<title>.txt` file per page
    pub data_dir: PathBuf,
    /// Directory searched for `view.html` and `edit.html`
    pub template_dir: PathBuf,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            template_dir: PathBuf::from("templates"),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        data_dir: PathBuf,
        template_dir: PathBuf,
        port: Option<u16>,
        host: Option<String>,
    ) -> Self {
        Self {
            data_dir,
            template_dir,
            port: port.unwrap_or(DEFAULT_PORT),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        }
    }

    /// Read `WIKI_DATA_DIR`, `WIKI_TEMPLATE_DIR`, `WIKI_HOST` and `WIKI_PORT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();
        let port = lookup("WIKI_PORT").and_then(|raw| match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("Ignoring invalid WIKI_PORT '{}', using {}", raw, DEFAULT_PORT);
                None
            }
        });

        Self::with_custom(
            lookup("WIKI_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            lookup("WIKI_TEMPLATE_DIR").map(PathBuf::from).unwrap_or(defaults.template_dir),
            port,
            lookup("WIKI_HOST"),
        )
    }

    /// Resolve `host:port` to the address to bind. Host names are looked up;
    /// a host that does not resolve is an error rather than a wider bind.
    pub async fn socket_addr(&self) -> Result<SocketAddr, WikiError> {
        let mut addrs = lookup_host((self.host.as_str(), self.port)).await.map_err(|e| {
            warn!("Could not resolve host '{}': {}", self.host, e);
            WikiError::Io(e)
        })?;
        addrs.next().ok_or_else(|| {
            WikiError::Io(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("host '{}' resolved to no addresses", self.host),
            ))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
