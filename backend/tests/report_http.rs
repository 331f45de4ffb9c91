//! End-to-end HTTP tests over in-process stores, bundled assets and the PDF
//! renderer.
use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use backend::domain::{
    EmployeeReportService, EmployeeService, ReportDesignService, ReportTemplateService,
};
use backend::inbound::http::configure_api;
use backend::inbound::http::error::json_error_handler;
use backend::inbound::http::state::HttpState;
use backend::outbound::assets::FsReportAssets;
use backend::outbound::memory::{InMemoryEmployeeRepository, InMemoryReportTemplateRepository};
use backend::outbound::rendering::PdfReportRenderer;
use serde_json::{Value, json};

const ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

fn http_state() -> HttpState {
    let employee_repo = Arc::new(InMemoryEmployeeRepository::new());
    let template_repo = Arc::new(InMemoryReportTemplateRepository::new());
    let assets = Arc::new(FsReportAssets::open(ASSETS_DIR).expect("bundled assets present"));
    let designs = Arc::new(ReportDesignService::new(
        Arc::clone(&template_repo),
        Arc::clone(&assets),
    ));
    let exports = EmployeeReportService::new(
        Arc::clone(&employee_repo),
        Arc::clone(&designs),
        assets,
        Arc::new(PdfReportRenderer::new()),
    );
    HttpState::new(
        Arc::new(EmployeeService::new(employee_repo)),
        Arc::new(ReportTemplateService::new(template_repo)),
        designs,
        Arc::new(exports),
    )
}

async fn init_app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(web::scope("/api").configure(configure_api)),
    )
    .await
}

async fn create_employee<S>(app: &S, name: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({
            "name": name,
            "address": "1 Analytical Way",
            "phone": "555-0100",
            "gender": "Female"
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

fn pdf_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

#[actix_web::test]
async fn employee_crud_round_trip() {
    let app = init_app().await;
    let created = create_employee(&app, "Ada Lovelace").await;
    let id = created["id"].as_i64().expect("generated id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/employees/{id}"))
        .set_json(json!({
            "name": "Ada King",
            "address": "2 Engine Row",
            "phone": "555-0101",
            "gender": "Female"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["name"], "Ada King");
    assert_eq!(updated["id"], id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/employees/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/employees/{id}"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn downloaded_report_lists_every_employee() {
    let app = init_app().await;
    create_employee(&app, "Ada Lovelace").await;
    create_employee(&app, "Grace Hopper").await;

    let req = test::TestRequest::get()
        .uri("/api/reports/employees/pdf")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition header");
    assert!(disposition.starts_with("attachment"));
    let body = test::read_body(res).await;
    assert!(body.starts_with(b"%PDF-"));
    let text = pdf_text(&body);
    assert!(text.contains("(Ada Lovelace)"));
    assert!(text.contains("(Grace Hopper)"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[actix_web::test]
async fn report_with_no_employees_still_renders() {
    let app = init_app().await;

    let req = test::TestRequest::get()
        .uri("/api/reports/employees/pdf")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert!(body.starts_with(b"%PDF-"));
}

#[actix_web::test]
async fn sample_preview_renders_inline_placeholders() {
    let app = init_app().await;
    let design = include_str!("../assets/reports/employee_report.jrxml");

    let req = test::TestRequest::post()
        .uri("/api/employees/preview-live")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(design)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition header");
    assert!(disposition.starts_with("inline"));
    let text = pdf_text(&test::read_body(res).await);
    assert!(text.contains("(John Doe)"));
}

#[actix_web::test]
async fn broken_preview_design_is_rejected() {
    let app = init_app().await;

    let req = test::TestRequest::post()
        .uri("/api/employees/preview-live")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("<jasperReport")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn saved_design_drives_the_next_download() {
    let app = init_app().await;
    create_employee(&app, "Ada Lovelace").await;
    let design = include_str!("../assets/reports/employee_report.jrxml")
        .replace("Created by ", "Prepared by ");

    let req = test::TestRequest::post()
        .uri("/api/reports/employees/design")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(design.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/reports/employees/preview")
        .to_request();
    let stored = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(stored.as_ref(), design.as_bytes());

    let req = test::TestRequest::get()
        .uri("/api/reports/employees/pdf")
        .to_request();
    let text = pdf_text(&test::read_body(test::call_service(&app, req).await).await);
    assert!(text.contains("(Prepared by Employee Report System)"));
}

#[actix_web::test]
async fn template_endpoints_enforce_one_active_design() {
    let app = init_app().await;
    for name in ["First", "Second"] {
        let req = test::TestRequest::post()
            .uri("/api/templates")
            .set_json(json!({
                "name": name,
                "jrxmlContent": format!("<jasperReport name=\"{name}\"/>"),
                "reportType": "employee_report"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/templates/type/employee_report")
        .to_request();
    let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let active: Vec<&str> = listed
        .as_array()
        .expect("array body")
        .iter()
        .filter(|template| template["active"] == true)
        .filter_map(|template| template["name"].as_str())
        .collect();
    assert_eq!(active, vec!["Second"]);

    let req = test::TestRequest::get()
        .uri("/api/templates/active/employee_report")
        .to_request();
    let current: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(current["name"], "Second");
}
