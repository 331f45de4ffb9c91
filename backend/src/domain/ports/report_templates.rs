//! Driving port for managing stored report designs.

use async_trait::async_trait;

use crate::domain::{Error, ReportTemplate, ReportType, TemplateDraft, TemplateId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportTemplates: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<ReportTemplate>, Error>;

    async fn templates_by_type(&self, report_type: &ReportType)
    -> Result<Vec<ReportTemplate>, Error>;

    async fn active_template(
        &self,
        report_type: &ReportType,
    ) -> Result<Option<ReportTemplate>, Error>;

    /// Insert or update a template. When the draft is active every other
    /// template of its type is deactivated in the same transaction.
    async fn save_template(&self, draft: TemplateDraft) -> Result<ReportTemplate, Error>;

    /// Remove a template. Unknown ids are ignored.
    async fn delete_template(&self, id: TemplateId) -> Result<(), Error>;
}
