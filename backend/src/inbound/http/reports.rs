//! Employee report API handlers.
//!
//! ```text
//! GET  /api/reports/employees/pdf
//! GET  /api/reports/employees/preview
//! POST /api/reports/employees/design  <raw design text>
//! ```

use actix_web::http::header::DispositionType;
use actix_web::{HttpResponse, get, post, web};

use crate::domain::ReportType;
use crate::inbound::http::ApiResult;
use crate::inbound::http::employees::pdf_response;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Download the employee report rendered with the stored design.
#[utoipa::path(
    get,
    path = "/api/reports/employees/pdf",
    responses(
        (status = 200, description = "Employee report", content_type = "application/pdf", body = Vec<u8>),
        (status = 500, description = "Stored design failed to render", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "downloadEmployeeReport"
)]
#[get("/reports/employees/pdf")]
pub async fn download_employee_report(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let pdf = state.exports.export_employee_report().await?;
    Ok(pdf_response(
        pdf,
        DispositionType::Attachment,
        "employee_report.pdf",
    ))
}

/// Return the stored employee report design.
#[utoipa::path(
    get,
    path = "/api/reports/employees/preview",
    responses(
        (status = 200, description = "Design document", content_type = "text/xml", body = String),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "getEmployeeReportDesign"
)]
#[get("/reports/employees/preview")]
pub async fn employee_report_design(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let design = state
        .designs
        .resolve(&ReportType::employee_report())
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/xml; charset=utf-8")
        .body(design))
}

/// Replace the stored employee report design.
#[utoipa::path(
    post,
    path = "/api/reports/employees/design",
    request_body(content = String, content_type = "text/plain", description = "Design document"),
    responses(
        (status = 200, description = "Design saved", content_type = "text/plain", body = String),
        (status = 400, description = "Blank design", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "saveEmployeeReportDesign"
)]
#[post("/reports/employees/design")]
pub async fn save_employee_report_design(
    state: web::Data<HttpState>,
    design: String,
) -> ApiResult<HttpResponse> {
    state
        .designs
        .save(&ReportType::employee_report(), design)
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Design saved successfully"))
}
