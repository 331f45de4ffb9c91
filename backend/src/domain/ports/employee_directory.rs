//! Driving port for employee record management.
//!
//! Inbound adapters use this port to read and mutate employees without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeDraft, EmployeeId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>, Error>;

    /// Fetch one employee; `not_found` when the id is unknown.
    async fn employee(&self, id: EmployeeId) -> Result<Employee, Error>;

    async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee, Error>;

    /// Overwrite an employee; `not_found` when the id is unknown.
    async fn update_employee(&self, id: EmployeeId, draft: EmployeeDraft)
    -> Result<Employee, Error>;

    /// Remove an employee; `not_found` when the id is unknown.
    async fn delete_employee(&self, id: EmployeeId) -> Result<(), Error>;
}
