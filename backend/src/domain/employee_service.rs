//! Employee record service implementing the [`EmployeeDirectory`] port.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{EmployeeDirectory, EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeDraft, EmployeeId, Error};

/// Employee service backed by an [`EmployeeRepository`].
#[derive(Clone)]
pub struct EmployeeService<R> {
    repo: Arc<R>,
}

impl<R> EmployeeService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

pub(crate) fn map_employee_error(error: EmployeeRepositoryError) -> Error {
    match error {
        EmployeeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("employee repository unavailable: {message}"))
        }
        EmployeeRepositoryError::Query { message } => {
            Error::internal(format!("employee repository error: {message}"))
        }
    }
}

fn employee_not_found(id: EmployeeId) -> Error {
    Error::not_found(format!("employee {id} not found"))
        .with_details(json!({ "employeeId": id.get() }))
}

fn validate(draft: &EmployeeDraft) -> Result<(), Error> {
    draft.validate().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
    })
}

#[async_trait]
impl<R> EmployeeDirectory for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn list_employees(&self) -> Result<Vec<Employee>, Error> {
        self.repo.list().await.map_err(map_employee_error)
    }

    async fn employee(&self, id: EmployeeId) -> Result<Employee, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_employee_error)?
            .ok_or_else(|| employee_not_found(id))
    }

    async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee, Error> {
        validate(&draft)?;
        let employee = self.repo.create(&draft).await.map_err(map_employee_error)?;
        info!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, Error> {
        validate(&draft)?;
        match self.repo.update(id, &draft).await.map_err(map_employee_error)? {
            Some(employee) => {
                info!(employee_id = %id, "employee updated");
                Ok(employee)
            }
            None => {
                warn!(employee_id = %id, "update of unknown employee");
                Err(employee_not_found(id))
            }
        }
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_employee_error)? {
            info!(employee_id = %id, "employee deleted");
            Ok(())
        } else {
            warn!(employee_id = %id, "delete of unknown employee");
            Err(employee_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockEmployeeRepository;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> EmployeeDraft {
        EmployeeDraft::new("Ada", "1 Analytical Way", "555-0100", "Female").expect("valid draft")
    }

    fn service(repo: MockEmployeeRepository) -> EmployeeService<MockEmployeeRepository> {
        EmployeeService::new(Arc::new(repo))
    }

    #[rstest]
    #[tokio::test]
    async fn missing_employee_is_not_found() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo)
            .employee(EmployeeId::new(42))
            .await
            .expect_err("missing id fails");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.details(), Some(&json!({ "employeeId": 42 })));
    }

    #[rstest]
    #[tokio::test]
    async fn blank_name_is_rejected_before_persistence() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_create().never();
        let draft = EmployeeDraft {
            name: "  ".to_owned(),
            ..EmployeeDraft::default()
        };

        let err = service(repo)
            .create_employee(draft)
            .await
            .expect_err("blank name fails");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn create_returns_persisted_record(draft: EmployeeDraft) {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|draft| Ok(Employee::from_draft(EmployeeId::new(7), draft.clone())));

        let employee = service(repo)
            .create_employee(draft)
            .await
            .expect("create succeeds");

        assert_eq!(employee.id, EmployeeId::new(7));
        assert_eq!(employee.name, "Ada");
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_employee_is_not_found(draft: EmployeeDraft) {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let err = service(repo)
            .update_employee(EmployeeId::new(3), draft)
            .await
            .expect_err("unknown id fails");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn delete_reports_missing_rows(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_delete().returning(move |_| Ok(existed));

        let result = service(repo).delete_employee(EmployeeId::new(1)).await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[case(EmployeeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(EmployeeRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_errors_are_mapped(
        #[case] error: EmployeeRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_list().return_once(move || Err(error));

        let err = service(repo)
            .list_employees()
            .await
            .expect_err("repository failure surfaces");

        assert_eq!(err.code(), expected);
    }
}
