//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP endpoint together with the schema
//! wrappers from [`crate::inbound::http::schemas`], so domain types stay free
//! of utoipa derives. Swagger UI serves the document in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    EmployeeDraftSchema, EmployeeSchema, ErrorCodeSchema, ErrorSchema, ReportTemplateSchema,
};
use crate::inbound::http::templates::TemplateRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee backend API",
        description = "Employee records, report design templates and PDF report rendering."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::employees::preview_live,
        crate::inbound::http::templates::list_templates,
        crate::inbound::http::templates::templates_by_type,
        crate::inbound::http::templates::active_template,
        crate::inbound::http::templates::save_template,
        crate::inbound::http::templates::delete_template,
        crate::inbound::http::reports::download_employee_report,
        crate::inbound::http::reports::employee_report_design,
        crate::inbound::http::reports::save_employee_report_design,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EmployeeSchema,
        EmployeeDraftSchema,
        ReportTemplateSchema,
        TemplateRequest,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "employees", description = "Employee records and live design previews"),
        (name = "templates", description = "Stored report designs and activation"),
        (name = "reports", description = "Rendered employee reports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
