//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, the ports those adapters implement, and the services that drive
//! them. Types here never depend on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Employee, EmployeeDraft: employee records.
//! - ReportType, ReportTemplate, TemplateDraft: stored report designs.
//! - EmployeeService, ReportTemplateService, ReportDesignService,
//!   EmployeeReportService: driving port implementations.

pub mod employee;
pub mod employee_service;
pub mod error;
pub mod ports;
pub mod report;
pub mod report_design_service;
pub mod report_export_service;
pub mod report_template_service;
pub mod trace_id;

pub use self::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeValidationError};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::report::{
    CREATED_BY, ParameterValue, PreviewSource, REPORT_TYPE_MAX_LEN, RenderRequest,
    ReportParameters, ReportRow, ReportTemplate, ReportType, ReportTypeValidationError,
    TemplateDraft, TemplateId, TemplateValidationError,
};
pub use self::report_design_service::{DEFAULT_DESIGN_DESCRIPTION, ReportDesignService};
pub use self::report_export_service::{
    CREATED_BY_PARAMETER, EmployeeReportService, employee_row, sample_rows,
};
pub use self::report_template_service::{MAX_ACTIVATION_ATTEMPTS, ReportTemplateService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
