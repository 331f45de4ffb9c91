//! Builders wiring repositories, domain services and adapters into
//! [`HttpState`].

use std::sync::Arc;

use tracing::warn;

use backend::domain::ports::{EmployeeRepository, ReportTemplateRepository};
use backend::domain::{
    EmployeeReportService, EmployeeService, ReportDesignService, ReportTemplateService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::assets::FsReportAssets;
use backend::outbound::memory::{InMemoryEmployeeRepository, InMemoryReportTemplateRepository};
use backend::outbound::persistence::{DieselEmployeeRepository, DieselReportTemplateRepository};
use backend::outbound::rendering::PdfReportRenderer;

use super::ServerConfig;

/// Wire the domain services over the given repositories.
fn wire_services<E, T>(employees: Arc<E>, templates: Arc<T>, assets: FsReportAssets) -> HttpState
where
    E: EmployeeRepository + 'static,
    T: ReportTemplateRepository + 'static,
{
    let assets = Arc::new(assets);
    let designs = Arc::new(ReportDesignService::new(
        Arc::clone(&templates),
        Arc::clone(&assets),
    ));
    let exports = EmployeeReportService::new(
        Arc::clone(&employees),
        Arc::clone(&designs),
        assets,
        Arc::new(PdfReportRenderer::new()),
    );

    HttpState::new(
        Arc::new(EmployeeService::new(employees)),
        Arc::new(ReportTemplateService::new(templates)),
        designs,
        Arc::new(exports),
    )
}

/// Build the HTTP state, using Diesel repositories when a pool is configured
/// and in-memory repositories otherwise.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let assets = config.assets.clone();
    match &config.db_pool {
        Some(pool) => wire_services(
            Arc::new(DieselEmployeeRepository::new(pool.clone())),
            Arc::new(DieselReportTemplateRepository::new(pool.clone())),
            assets,
        ),
        None => {
            warn!("no database configured; employees and templates are kept in memory");
            wire_services(
                Arc::new(InMemoryEmployeeRepository::new()),
                Arc::new(InMemoryReportTemplateRepository::new()),
                assets,
            )
        }
    }
}
