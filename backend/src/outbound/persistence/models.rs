//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! mapped to domain types before leaving the adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::domain::{Employee, EmployeeId, ReportTemplate, ReportType, TemplateId};

use super::diesel_helpers::cast_revision;
use super::schema::{employees, report_templates};

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub gender: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::new(row.id),
            name: row.name,
            address: row.address,
            phone: row.phone,
            gender: row.gender,
        }
    }
}

/// Insertable and changeset struct for employee fields.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
pub(crate) struct EmployeeFields<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub phone: &'a str,
    pub gender: &'a str,
}

/// Row struct for reading from the report_templates table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = report_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReportTemplateRow {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub report_type: String,
    pub is_active: bool,
    pub description: Option<String>,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReportTemplateRow> for ReportTemplate {
    type Error = String;

    fn try_from(row: ReportTemplateRow) -> Result<Self, Self::Error> {
        let report_type = ReportType::new(row.report_type.clone()).map_err(|err| {
            warn!(template_id = row.id, report_type = %row.report_type, "stored report type is invalid");
            format!("template {} has invalid report type: {err}", row.id)
        })?;
        Ok(Self {
            id: TemplateId::new(row.id),
            name: row.name,
            content: row.content,
            report_type,
            active: row.is_active,
            description: row.description,
            revision: cast_revision(row.revision),
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for new templates.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = report_templates)]
pub(crate) struct NewReportTemplateRow<'a> {
    pub name: &'a str,
    pub content: &'a str,
    pub report_type: &'a str,
    pub is_active: bool,
    pub description: Option<&'a str>,
}

/// Changeset for a full template update. `description` of `None` clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = report_templates)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReportTemplateUpdate<'a> {
    pub name: &'a str,
    pub content: &'a str,
    pub report_type: &'a str,
    pub is_active: bool,
    pub description: Option<&'a str>,
}
