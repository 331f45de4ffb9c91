//! In-process repository adapters.
//!
//! Used when no database URL is configured and by integration tests. They
//! honour the same invariants as the PostgreSQL adapters, including the
//! one-active-template-per-type rule, but lose all data on restart.

mod employee_store;
mod template_store;

pub use employee_store::InMemoryEmployeeRepository;
pub use template_store::InMemoryReportTemplateRepository;
