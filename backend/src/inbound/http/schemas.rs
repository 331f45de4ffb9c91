//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape for utoipa and are never
//! constructed at runtime.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A concurrent write won the race.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "employee 7 not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Employee`].
#[derive(ToSchema)]
#[schema(as = Employee)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmployeeSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "John Doe")]
    name: String,
    #[schema(example = "123 Main St")]
    address: String,
    #[schema(example = "1234567890")]
    phone: String,
    #[schema(example = "Male")]
    gender: String,
}

/// OpenAPI schema for [`crate::domain::EmployeeDraft`].
#[derive(ToSchema)]
#[schema(as = EmployeeDraft)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmployeeDraftSchema {
    /// Must not be blank.
    #[schema(example = "John Doe")]
    name: String,
    #[schema(example = "123 Main St")]
    address: Option<String>,
    #[schema(example = "1234567890")]
    phone: Option<String>,
    #[schema(example = "Male")]
    gender: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ReportTemplate`].
#[derive(ToSchema)]
#[schema(as = ReportTemplate, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReportTemplateSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "employee_report")]
    name: String,
    /// Design document text.
    jrxml_content: String,
    #[schema(example = "employee_report")]
    report_type: String,
    active: bool,
    description: Option<String>,
    /// Incremented on every update.
    #[schema(example = 1)]
    revision: u32,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}
