//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `EMPLOYEE_BACKEND_*` environment variables and
//! configuration files. Unset values fall back to the defaults exposed by the
//! accessors.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
/// Default request payload ceiling for design uploads (4 MiB).
pub const DEFAULT_MAX_DESIGN_BYTES: usize = 4 * 1024 * 1024;

fn default_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EMPLOYEE_BACKEND")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Directory holding bundled designs and logos.
    pub assets_dir: Option<PathBuf>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Largest accepted request body, in bytes.
    pub max_design_bytes: Option<usize>,
}

impl ServerSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Assets directory, defaulting to the crate's bundled `assets/`.
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir.clone().unwrap_or_else(default_assets_dir)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    pub fn max_design_bytes(&self) -> usize {
        self.max_design_bytes.unwrap_or(DEFAULT_MAX_DESIGN_BYTES)
    }
}
