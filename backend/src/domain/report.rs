//! Report types, stored design templates and render inputs.
//!
//! A report type owns any number of [`ReportTemplate`] rows. At most one of
//! them is active; the active row is the authoritative design for the type.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a report type key.
pub const REPORT_TYPE_MAX_LEN: usize = 64;

/// Value injected as the `createdBy` render parameter.
pub const CREATED_BY: &str = "Employee Report System";

/// Validation errors returned by [`ReportType::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportTypeValidationError {
    #[error("report type must not be empty")]
    Empty,
    #[error("report type must be at most {max} characters")]
    TooLong { max: usize },
    #[error("report type may only contain ASCII letters, digits, '_' or '-'")]
    InvalidCharacters,
}

/// Key naming a family of report designs, for example `employee_report`.
///
/// # Examples
/// ```
/// use backend::domain::ReportType;
///
/// let report_type = ReportType::new("employee_report").expect("valid key");
/// assert_eq!(report_type.as_ref(), "employee_report");
/// assert!(ReportType::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportType(String);

impl ReportType {
    /// Key of the employee listing report.
    pub const EMPLOYEE_REPORT: &'static str = "employee_report";

    /// Validate and construct a report type.
    pub fn new(value: impl Into<String>) -> Result<Self, ReportTypeValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ReportTypeValidationError::Empty);
        }
        if value.chars().count() > REPORT_TYPE_MAX_LEN {
            return Err(ReportTypeValidationError::TooLong {
                max: REPORT_TYPE_MAX_LEN,
            });
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(ReportTypeValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// The employee listing report type.
    #[must_use]
    pub fn employee_report() -> Self {
        Self(Self::EMPLOYEE_REPORT.to_owned())
    }
}

impl AsRef<str> for ReportType {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReportType {
    type Error = ReportTypeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReportType> for String {
    fn from(value: ReportType) -> Self {
        value.0
    }
}

/// Database-assigned template identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(i64);

impl TemplateId {
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored report design document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub id: TemplateId,
    pub name: String,
    /// Design document text.
    #[serde(rename = "jrxmlContent")]
    pub content: String,
    pub report_type: ReportType,
    pub active: bool,
    pub description: Option<String>,
    /// Starts at 1 and increments on every update.
    pub revision: u32,
    pub updated_at: DateTime<Utc>,
}

impl ReportTemplate {
    /// Whether the stored design has usable content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Validation errors raised for [`TemplateDraft`] payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateValidationError {
    #[error("template name must not be empty")]
    EmptyName,
    #[error("template content must not be empty")]
    EmptyContent,
}

/// Template fields supplied on create or update.
///
/// `id == None` inserts a new row; `Some` updates the existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub id: Option<TemplateId>,
    pub name: String,
    pub content: String,
    pub report_type: ReportType,
    pub active: bool,
    pub description: Option<String>,
}

impl TemplateDraft {
    /// Check the text fields are non-blank.
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        if self.content.trim().is_empty() {
            return Err(TemplateValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// Data row handed to the renderer, keyed by field name.
pub type ReportRow = BTreeMap<String, String>;

/// Value of a named render parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Text(String),
    /// Encoded image bytes (PNG or JPEG).
    Image(Vec<u8>),
}

/// Named render parameters.
pub type ReportParameters = BTreeMap<String, ParameterValue>;

/// Everything the renderer needs to produce a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub design: String,
    pub rows: Vec<ReportRow>,
    pub parameters: ReportParameters,
}

/// Data source used when previewing an ad-hoc design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewSource {
    /// Two fixed placeholder rows.
    #[default]
    Sample,
    /// Current employee records.
    Live,
}
