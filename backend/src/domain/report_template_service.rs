//! Report template service implementing the [`ReportTemplates`] port.
//!
//! Activation is exclusive per report type: saving an active template
//! deactivates its siblings atomically inside the repository adapter. The
//! service retries the whole save when a racing writer still wins the unique
//! index, then gives up with a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ReportTemplateRepository, ReportTemplateRepositoryError, ReportTemplates,
};
use crate::domain::{Error, ReportTemplate, ReportType, TemplateDraft, TemplateId};

/// Attempts made by [`ReportTemplates::save_template`] before reporting a
/// conflict.
pub const MAX_ACTIVATION_ATTEMPTS: usize = 3;

/// Template service backed by a [`ReportTemplateRepository`].
#[derive(Clone)]
pub struct ReportTemplateService<R> {
    repo: Arc<R>,
}

impl<R> ReportTemplateService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

pub(crate) fn map_template_error(error: ReportTemplateRepositoryError) -> Error {
    match error {
        ReportTemplateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("template repository unavailable: {message}"))
        }
        ReportTemplateRepositoryError::Query { message } => {
            Error::internal(format!("template repository error: {message}"))
        }
        ReportTemplateRepositoryError::ActiveConflict { report_type } => Error::conflict(format!(
            "another template of type {report_type} was activated concurrently"
        ))
        .with_details(json!({ "reportType": report_type })),
        ReportTemplateRepositoryError::NotFound { id } => {
            Error::not_found(format!("template {id} not found"))
                .with_details(json!({ "templateId": id }))
        }
    }
}

#[async_trait]
impl<R> ReportTemplates for ReportTemplateService<R>
where
    R: ReportTemplateRepository,
{
    async fn list_templates(&self) -> Result<Vec<ReportTemplate>, Error> {
        self.repo.list().await.map_err(map_template_error)
    }

    async fn templates_by_type(
        &self,
        report_type: &ReportType,
    ) -> Result<Vec<ReportTemplate>, Error> {
        self.repo
            .list_by_type(report_type)
            .await
            .map_err(map_template_error)
    }

    async fn active_template(
        &self,
        report_type: &ReportType,
    ) -> Result<Option<ReportTemplate>, Error> {
        self.repo
            .find_active(report_type)
            .await
            .map_err(map_template_error)
    }

    async fn save_template(&self, draft: TemplateDraft) -> Result<ReportTemplate, Error> {
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let mut attempt = 1;
        loop {
            match self.repo.save_exclusive(&draft).await {
                Ok(saved) => {
                    info!(
                        template_id = %saved.id,
                        report_type = %saved.report_type,
                        active = saved.active,
                        revision = saved.revision,
                        "report template saved"
                    );
                    return Ok(saved);
                }
                Err(ReportTemplateRepositoryError::ActiveConflict { report_type })
                    if attempt < MAX_ACTIVATION_ATTEMPTS =>
                {
                    debug!(%report_type, attempt, "activation raced; retrying");
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        report_type = %draft.report_type,
                        template_id = ?draft.id.map(TemplateId::get),
                        error = %err,
                        "report template save failed"
                    );
                    return Err(map_template_error(err));
                }
            }
        }
    }

    async fn delete_template(&self, id: TemplateId) -> Result<(), Error> {
        let removed = self.repo.delete(id).await.map_err(map_template_error)?;
        if removed {
            info!(template_id = %id, "report template deleted");
        } else {
            debug!(template_id = %id, "delete of unknown template ignored");
        }
        Ok(())
    }
}
