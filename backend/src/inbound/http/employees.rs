//! Employee API handlers.
//!
//! ```text
//! GET    /api/employees
//! GET    /api/employees/{id}
//! POST   /api/employees {"name":"Ada","address":"...","phone":"...","gender":"..."}
//! PUT    /api/employees/{id}
//! DELETE /api/employees/{id}
//! POST   /api/employees/preview-live?source=sample  <raw design text>
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::{Employee, EmployeeDraft, EmployeeId, PreviewSource};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{EmployeeDraftSchema, EmployeeSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Query string accepted by the live preview endpoint.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// `sample` (default) renders placeholder rows; `live` renders employees.
    #[param(value_type = Option<String>, example = "sample")]
    #[serde(default)]
    pub source: PreviewSource,
}

pub(crate) fn pdf_response(
    pdf: Vec<u8>,
    disposition: DispositionType,
    file_name: &str,
) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            ContentDisposition {
                disposition,
                parameters: vec![DispositionParam::Filename(file_name.to_owned())],
            },
        ))
        .body(pdf)
}

/// List every employee.
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees", body = [EmployeeSchema]),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Employee>>> {
    let employees = state.employees.list_employees().await?;
    Ok(web::Json(employees))
}

/// Fetch one employee.
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeSchema),
        (status = 404, description = "Unknown employee", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Employee>> {
    let employee = state
        .employees
        .employee(EmployeeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(employee))
}

/// Create an employee.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeDraftSchema,
    responses(
        (status = 201, description = "Employee created", body = EmployeeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<EmployeeDraft>,
) -> ApiResult<HttpResponse> {
    let employee = state.employees.create_employee(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// Replace an employee's fields.
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    request_body = EmployeeDraftSchema,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown employee", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[put("/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<EmployeeDraft>,
) -> ApiResult<web::Json<Employee>> {
    let employee = state
        .employees
        .update_employee(EmployeeId::new(path.into_inner()), payload.into_inner())
        .await?;
    Ok(web::Json(employee))
}

/// Delete an employee.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i64, Path, description = "Employee identifier")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Unknown employee", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .employees
        .delete_employee(EmployeeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Render an unsaved design. Nothing is persisted.
#[utoipa::path(
    post,
    path = "/api/employees/preview-live",
    params(PreviewQuery),
    request_body(content = String, content_type = "text/plain", description = "Design document"),
    responses(
        (status = 200, description = "Rendered preview", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Blank or invalid design", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "previewLive"
)]
#[post("/employees/preview-live")]
pub async fn preview_live(
    state: web::Data<HttpState>,
    query: web::Query<PreviewQuery>,
    design: String,
) -> ApiResult<HttpResponse> {
    let pdf = state.exports.preview(design, query.source).await?;
    Ok(pdf_response(pdf, DispositionType::Inline, "preview.pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::{TestPorts, init_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn ada(id: i64) -> Employee {
        let draft = EmployeeDraft::new("Ada", "1 Analytical Way", "555", "Female")
            .expect("valid draft");
        Employee::from_draft(EmployeeId::new(id), draft)
    }

    #[actix_web::test]
    async fn list_returns_json_array() {
        let mut ports = TestPorts::default();
        ports
            .employees
            .expect_list_employees()
            .returning(|| Ok(vec![ada(1), ada(2)]));
        let app = init_app(ports).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/employees").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["name"], "Ada");
    }

    #[actix_web::test]
    async fn missing_employee_is_404() {
        let mut ports = TestPorts::default();
        ports
            .employees
            .expect_employee()
            .with(eq(EmployeeId::new(404)))
            .returning(|id| Err(Error::not_found(format!("employee {id} not found"))));
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/employees/404").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }

    #[actix_web::test]
    async fn create_returns_201() {
        let mut ports = TestPorts::default();
        ports
            .employees
            .expect_create_employee()
            .withf(|draft| draft.name == "Ada")
            .returning(|draft| Ok(Employee::from_draft(EmployeeId::new(9), draft)));
        let app = init_app(ports).await;

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({ "name": "Ada", "address": "1 Analytical Way" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], 9);
    }

    #[rstest]
    #[case(Ok(()), StatusCode::NO_CONTENT)]
    #[case(Err(Error::not_found("employee 5 not found")), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn delete_maps_outcome(#[case] outcome: Result<(), Error>, #[case] expected: StatusCode) {
        let mut ports = TestPorts::default();
        ports
            .employees
            .expect_delete_employee()
            .return_once(move |_| outcome);
        let app = init_app(ports).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/api/employees/5").to_request(),
        )
        .await;

        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[case("/api/employees/preview-live", PreviewSource::Sample)]
    #[case("/api/employees/preview-live?source=live", PreviewSource::Live)]
    #[actix_web::test]
    async fn preview_live_returns_inline_pdf(#[case] uri: &str, #[case] source: PreviewSource) {
        let mut ports = TestPorts::default();
        ports
            .exports
            .expect_preview()
            .withf(move |design, requested| design == "<jasperReport/>" && *requested == source)
            .returning(|_, _| Ok(b"%PDF-1.4".to_vec()));
        let app = init_app(ports).await;

        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("<jasperReport/>")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"application/pdf".as_slice())
        );
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content disposition");
        assert!(disposition.starts_with("inline"));
        assert!(disposition.contains("preview.pdf"));
    }

    #[actix_web::test]
    async fn preview_live_rejection_is_400() {
        let mut ports = TestPorts::default();
        ports
            .exports
            .expect_preview()
            .returning(|_, _| Err(Error::invalid_request("design content must not be empty")));
        let app = init_app(ports).await;

        let req = test::TestRequest::post()
            .uri("/api/employees/preview-live")
            .set_payload("")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
