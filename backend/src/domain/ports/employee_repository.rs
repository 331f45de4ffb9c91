//! Port abstraction for employee persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Employee, EmployeeDraft, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "employee repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Every employee, ordered by identifier.
    async fn list(&self) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    async fn find_by_id(&self, id: EmployeeId)
    -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Insert a record and return it with its generated identifier.
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError>;

    /// Overwrite a record. Returns `None` when `id` does not exist.
    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Remove a record. Returns `false` when `id` did not exist.
    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError>;
}
