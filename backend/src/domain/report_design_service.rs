//! Design resolution for report types, implementing [`ReportDesigns`].
//!
//! The design of a type is the content of its active template. When no usable
//! design exists the bundled default is persisted as the active template and
//! returned. Concurrent first callers race on the repository's unique active
//! index; the loser re-reads the winner's row instead of failing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ReportAssetError, ReportAssets, ReportDesigns, ReportTemplateRepository,
    ReportTemplateRepositoryError,
};
use crate::domain::report_template_service::map_template_error;
use crate::domain::{Error, ReportTemplate, ReportType, TemplateDraft};

/// Description stored on templates seeded from the bundled default.
pub const DEFAULT_DESIGN_DESCRIPTION: &str = "Bundled default design";

/// Design resolver backed by the template store and bundled assets.
#[derive(Clone)]
pub struct ReportDesignService<R, A> {
    repo: Arc<R>,
    assets: Arc<A>,
}

impl<R, A> ReportDesignService<R, A> {
    pub fn new(repo: Arc<R>, assets: Arc<A>) -> Self {
        Self { repo, assets }
    }
}

pub(crate) fn map_asset_error(error: ReportAssetError) -> Error {
    let resource = match &error {
        ReportAssetError::NotFound { resource } | ReportAssetError::Read { resource, .. } => {
            resource.clone()
        }
    };
    Error::internal(error.to_string()).with_details(json!({ "resource": resource }))
}

fn active_draft(report_type: &ReportType, content: String) -> TemplateDraft {
    TemplateDraft {
        id: None,
        name: report_type.to_string(),
        content,
        report_type: report_type.clone(),
        active: true,
        description: None,
    }
}

impl<R, A> ReportDesignService<R, A>
where
    R: ReportTemplateRepository,
    A: ReportAssets,
{
    async fn default_design(&self, report_type: &ReportType) -> Result<String, Error> {
        self.assets
            .default_design(report_type)
            .await
            .map_err(|err| {
                warn!(%report_type, error = %err, "bundled default design unavailable");
                map_asset_error(err)
            })
    }

    /// Persist the bundled default as the active template of `report_type`.
    async fn seed_default(&self, report_type: &ReportType) -> Result<String, Error> {
        let content = self.default_design(report_type).await?;
        let draft = TemplateDraft {
            description: Some(DEFAULT_DESIGN_DESCRIPTION.to_owned()),
            ..active_draft(report_type, content.clone())
        };
        match self.repo.insert(&draft).await {
            Ok(template) => {
                info!(%report_type, template_id = %template.id, "seeded default report design");
                Ok(content)
            }
            Err(ReportTemplateRepositoryError::ActiveConflict { .. }) => {
                debug!(%report_type, "default design seeded concurrently; re-reading");
                match self.find_active(report_type).await? {
                    Some(winner) if winner.has_content() => Ok(winner.content),
                    Some(_) => Ok(content),
                    None => Err(Error::internal(format!(
                        "active design for {report_type} vanished after a conflicting insert"
                    ))),
                }
            }
            Err(err) => Err(map_template_error(err)),
        }
    }

    async fn find_active(&self, report_type: &ReportType) -> Result<Option<ReportTemplate>, Error> {
        self.repo
            .find_active(report_type)
            .await
            .map_err(map_template_error)
    }

    async fn overwrite(
        &self,
        template: &ReportTemplate,
        content: &str,
    ) -> Result<Option<ReportTemplate>, Error> {
        self.repo
            .update_content(template.id, content)
            .await
            .map_err(map_template_error)
    }
}

#[async_trait]
impl<R, A> ReportDesigns for ReportDesignService<R, A>
where
    R: ReportTemplateRepository,
    A: ReportAssets,
{
    async fn resolve(&self, report_type: &ReportType) -> Result<String, Error> {
        match self.find_active(report_type).await? {
            Some(template) if template.has_content() => Ok(template.content),
            Some(template) => {
                let content = self.default_design(report_type).await?;
                if self.overwrite(&template, &content).await?.is_none() {
                    // Deactivated or deleted between the read and the write.
                    return self.seed_default(report_type).await;
                }
                info!(
                    %report_type,
                    template_id = %template.id,
                    "replaced blank design with default"
                );
                Ok(content)
            }
            None => self.seed_default(report_type).await,
        }
    }

    async fn save(
        &self,
        report_type: &ReportType,
        content: String,
    ) -> Result<ReportTemplate, Error> {
        if content.trim().is_empty() {
            return Err(Error::invalid_request("design content must not be empty")
                .with_details(json!({ "reportType": report_type.as_ref() })));
        }

        if let Some(current) = self.find_active(report_type).await? {
            if let Some(saved) = self.overwrite(&current, &content).await? {
                info!(
                    %report_type,
                    template_id = %saved.id,
                    revision = saved.revision,
                    "report design saved"
                );
                return Ok(saved);
            }
        }

        match self.repo.insert(&active_draft(report_type, content.clone())).await {
            Ok(saved) => {
                info!(%report_type, template_id = %saved.id, "report design created");
                Ok(saved)
            }
            Err(ReportTemplateRepositoryError::ActiveConflict { .. }) => {
                debug!(%report_type, "design created concurrently; overwriting winner");
                let winner = self.find_active(report_type).await?;
                let saved = match winner {
                    Some(winner) => self.overwrite(&winner, &content).await?,
                    None => None,
                };
                saved.ok_or_else(|| {
                    Error::conflict(format!("design for {report_type} changed concurrently"))
                })
            }
            Err(err) => Err(map_template_error(err)),
        }
    }
}
