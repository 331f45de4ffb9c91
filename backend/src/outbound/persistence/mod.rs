//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/employees")).await?;
//! let repo = DieselEmployeeRepository::new(pool);
//! ```

mod diesel_employee_repository;
mod diesel_helpers;
mod diesel_report_template_repository;
mod models;
mod pool;
mod schema;

pub use diesel_employee_repository::DieselEmployeeRepository;
pub use diesel_report_template_repository::DieselReportTemplateRepository;
pub use pool::{DbPool, PoolConfig, PoolError, run_migrations};
