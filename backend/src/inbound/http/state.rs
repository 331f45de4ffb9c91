//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{EmployeeDirectory, ReportDesigns, ReportExports, ReportTemplates};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub employees: Arc<dyn EmployeeDirectory>,
    pub templates: Arc<dyn ReportTemplates>,
    pub designs: Arc<dyn ReportDesigns>,
    pub exports: Arc<dyn ReportExports>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     EmployeeDirectory, ReportDesigns, ReportExports, ReportTemplates,
    /// };
    /// use backend::inbound::http::state::HttpState;
    ///
    /// fn build(
    ///     employees: Arc<dyn EmployeeDirectory>,
    ///     templates: Arc<dyn ReportTemplates>,
    ///     designs: Arc<dyn ReportDesigns>,
    ///     exports: Arc<dyn ReportExports>,
    /// ) -> HttpState {
    ///     HttpState::new(employees, templates, designs, exports)
    /// }
    /// ```
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        templates: Arc<dyn ReportTemplates>,
        designs: Arc<dyn ReportDesigns>,
        exports: Arc<dyn ReportExports>,
    ) -> Self {
        Self {
            employees,
            templates,
            designs,
            exports,
        }
    }
}
