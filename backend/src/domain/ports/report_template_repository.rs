//! Port abstraction for stored report designs.
//!
//! Adapters must uphold the one-active-template-per-type invariant: inserting
//! a second active row for a type fails with
//! [`ReportTemplateRepositoryError::ActiveConflict`] rather than succeeding.
use async_trait::async_trait;

use crate::domain::{ReportTemplate, ReportType, TemplateDraft, TemplateId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by report template adapters.
    pub enum ReportTemplateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "template repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "template repository query failed: {message}",
        /// Another template of the type is already active.
        ActiveConflict { report_type: String } => "an active template already exists for {report_type}",
        /// The template addressed by an update does not exist.
        NotFound { id: i64 } => "template {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportTemplateRepository: Send + Sync {
    /// Every template, ordered by identifier.
    async fn list(&self) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError>;

    async fn list_by_type(
        &self,
        report_type: &ReportType,
    ) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError>;

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError>;

    /// The single active template of `report_type`, if any.
    async fn find_active(
        &self,
        report_type: &ReportType,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError>;

    /// Insert `draft` as a new row, ignoring `draft.id`.
    ///
    /// Fails with `ActiveConflict` when `draft.active` and the type already
    /// has an active template.
    async fn insert(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError>;

    /// Persist `draft` atomically, deactivating sibling templates of the
    /// same type first when `draft.active` is set.
    ///
    /// Inserts when `draft.id` is `None`, otherwise updates that row and
    /// fails with `NotFound` if it is missing. Nothing is persisted on error.
    async fn save_exclusive(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError>;

    /// Replace the content of an active template, bumping its revision.
    /// Returns `None` when `id` does not exist or is no longer active.
    async fn update_content(
        &self,
        id: TemplateId,
        content: &str,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError>;

    /// Remove a template. Returns `false` when `id` did not exist.
    async fn delete(&self, id: TemplateId) -> Result<bool, ReportTemplateRepositoryError>;
}
