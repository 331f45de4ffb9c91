//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};

use crate::domain::ports::{
    MockEmployeeDirectory, MockReportDesigns, MockReportExports, MockReportTemplates,
};
use crate::inbound::http::{configure_api, error::json_error_handler, state::HttpState};

/// Mocked driving ports; set expectations before calling [`init_app`].
#[derive(Default)]
pub struct TestPorts {
    pub employees: MockEmployeeDirectory,
    pub templates: MockReportTemplates,
    pub designs: MockReportDesigns,
    pub exports: MockReportExports,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.employees),
            Arc::new(self.templates),
            Arc::new(self.designs),
            Arc::new(self.exports),
        )
    }
}

/// Initialise the `/api` scope over mocked ports.
pub async fn init_app(
    ports: TestPorts,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(web::scope("/api").configure(configure_api)),
    )
    .await
}
