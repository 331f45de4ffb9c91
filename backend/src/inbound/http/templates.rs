//! Report template API handlers.
//!
//! ```text
//! GET    /api/templates
//! GET    /api/templates/type/{reportType}
//! GET    /api/templates/active/{reportType}
//! POST   /api/templates {"name":"...","jrxmlContent":"...","reportType":"employee_report","active":true}
//! DELETE /api/templates/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, ReportTemplate, ReportType, TemplateDraft, TemplateId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ReportTemplateSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/templates`.
///
/// Omit `id` to create a template; supply it to update one.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[schema(example = "Quarterly layout")]
    pub name: String,
    pub jrxml_content: String,
    #[schema(example = "employee_report")]
    pub report_type: String,
    /// Defaults to `true`.
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
    pub description: Option<String>,
}

fn default_active() -> bool {
    true
}

pub(crate) fn parse_report_type(raw: String) -> Result<ReportType, Error> {
    ReportType::new(raw.clone()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "reportType", "value": raw }))
    })
}

impl TryFrom<TemplateRequest> for TemplateDraft {
    type Error = Error;

    fn try_from(value: TemplateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.map(TemplateId::new),
            name: value.name,
            content: value.jrxml_content,
            report_type: parse_report_type(value.report_type)?,
            active: value.active,
            description: value.description,
        })
    }
}

/// List every stored template.
#[utoipa::path(
    get,
    path = "/api/templates",
    responses(
        (status = 200, description = "Templates", body = [ReportTemplateSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "listTemplates"
)]
#[get("/templates")]
pub async fn list_templates(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReportTemplate>>> {
    Ok(web::Json(state.templates.list_templates().await?))
}

/// List the templates of one report type.
#[utoipa::path(
    get,
    path = "/api/templates/type/{reportType}",
    params(("reportType" = String, Path, description = "Report type key")),
    responses(
        (status = 200, description = "Templates", body = [ReportTemplateSchema]),
        (status = 400, description = "Invalid report type", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "listTemplatesByType"
)]
#[get("/templates/type/{report_type}")]
pub async fn templates_by_type(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReportTemplate>>> {
    let report_type = parse_report_type(path.into_inner())?;
    Ok(web::Json(state.templates.templates_by_type(&report_type).await?))
}

/// Fetch the active template of a report type.
#[utoipa::path(
    get,
    path = "/api/templates/active/{reportType}",
    params(("reportType" = String, Path, description = "Report type key")),
    responses(
        (status = 200, description = "Active template", body = ReportTemplateSchema),
        (status = 404, description = "No active template", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "getActiveTemplate"
)]
#[get("/templates/active/{report_type}")]
pub async fn active_template(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReportTemplate>> {
    let report_type = parse_report_type(path.into_inner())?;
    state
        .templates
        .active_template(&report_type)
        .await?
        .map(web::Json)
        .ok_or_else(|| {
            Error::not_found(format!("no active template for {report_type}"))
                .with_details(json!({ "reportType": report_type.as_ref() }))
        })
}

/// Create or update a template; an active template deactivates its siblings.
#[utoipa::path(
    post,
    path = "/api/templates",
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Saved template", body = ReportTemplateSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown template id", body = ErrorSchema),
        (status = 409, description = "Concurrent activation", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "saveTemplate"
)]
#[post("/templates")]
pub async fn save_template(
    state: web::Data<HttpState>,
    payload: web::Json<TemplateRequest>,
) -> ApiResult<web::Json<ReportTemplate>> {
    let draft = TemplateDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.templates.save_template(draft).await?))
}

/// Delete a template. Unknown ids succeed.
#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    params(("id" = i64, Path, description = "Template identifier")),
    responses((status = 204, description = "Template removed")),
    tags = ["templates"],
    operation_id = "deleteTemplate"
)]
#[delete("/templates/{id}")]
pub async fn delete_template(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .templates
        .delete_template(TemplateId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
