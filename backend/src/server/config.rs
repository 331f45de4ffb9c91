//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::outbound::assets::FsReportAssets;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) assets: FsReportAssets,
    pub(crate) max_design_bytes: usize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, assets: FsReportAssets, max_design_bytes: usize) -> Self {
        Self {
            bind_addr,
            assets,
            max_design_bytes,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server keeps employees and templates in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
