//! Employee records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised for [`EmployeeDraft`] payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmployeeValidationError {
    #[error("employee name must not be empty")]
    EmptyName,
}

/// Database-assigned employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(i64);

impl EmployeeId {
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EmployeeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Persisted employee record.
///
/// # Examples
/// ```
/// use backend::domain::{Employee, EmployeeDraft, EmployeeId};
///
/// let draft = EmployeeDraft::new("Ada", "1 Analytical Way", "555-0100", "Female")
///     .expect("valid draft");
/// let employee = Employee::from_draft(EmployeeId::new(1), draft);
/// assert_eq!(employee.name, "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub gender: String,
}

impl Employee {
    /// Attach an identifier to a validated draft.
    #[must_use]
    pub fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        let EmployeeDraft {
            name,
            address,
            phone,
            gender,
        } = draft;
        Self {
            id,
            name,
            address,
            phone,
            gender,
        }
    }
}

/// Employee fields supplied by clients on create and update.
///
/// Only `name` is constrained; the remaining fields are free text and default
/// to empty strings when omitted. Any `id` in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
}

impl EmployeeDraft {
    /// Build a validated draft.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        gender: impl Into<String>,
    ) -> Result<Self, EmployeeValidationError> {
        let draft = Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            gender: gender.into(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Check the invariants of a deserialised payload.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        Ok(())
    }
}
