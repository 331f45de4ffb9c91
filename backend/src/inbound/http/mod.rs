//! HTTP inbound adapter exposing REST endpoints.

pub mod employees;
pub mod error;
pub mod health;
pub mod reports;
pub mod schemas;
pub mod state;
pub mod templates;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler. Mount under the `/api` scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(employees::list_employees)
        .service(employees::create_employee)
        .service(employees::preview_live)
        .service(employees::get_employee)
        .service(employees::update_employee)
        .service(employees::delete_employee)
        .service(templates::list_templates)
        .service(templates::templates_by_type)
        .service(templates::active_template)
        .service(templates::save_template)
        .service(templates::delete_template)
        .service(reports::download_employee_report)
        .service(reports::employee_report_design)
        .service(reports::save_employee_report_design);
}
