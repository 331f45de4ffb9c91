//! In-memory `EmployeeRepository`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeDraft, EmployeeId};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    rows: BTreeMap<i64, Employee>,
}

/// Employee records held in a mutex-guarded ordered map.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    state: Mutex<State>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        Ok(self.state.lock().await.rows.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.state.lock().await.rows.get(&id.get()).cloned())
    }

    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = EmployeeId::new(state.next_id);
        let employee = Employee::from_draft(id, draft.clone());
        state.rows.insert(id.get(), employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(slot) = state.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        *slot = Employee::from_draft(id, draft.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        Ok(self.state.lock().await.rows.remove(&id.get()).is_some())
    }
}
