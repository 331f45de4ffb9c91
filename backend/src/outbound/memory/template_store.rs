//! In-memory `ReportTemplateRepository`.
//!
//! A single mutex guards every row, which makes `save_exclusive` atomic and
//! lets `insert` enforce the one-active-template rule the way the partial
//! unique index does in PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::ports::{ReportTemplateRepository, ReportTemplateRepositoryError};
use crate::domain::{ReportTemplate, ReportType, TemplateDraft, TemplateId};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    rows: BTreeMap<i64, ReportTemplate>,
}

impl State {
    fn active_id(&self, report_type: &ReportType) -> Option<i64> {
        self.rows
            .values()
            .find(|row| row.active && &row.report_type == report_type)
            .map(|row| row.id.get())
    }

    fn push(&mut self, draft: &TemplateDraft) -> ReportTemplate {
        self.next_id += 1;
        let template = ReportTemplate {
            id: TemplateId::new(self.next_id),
            name: draft.name.clone(),
            content: draft.content.clone(),
            report_type: draft.report_type.clone(),
            active: draft.active,
            description: draft.description.clone(),
            revision: 1,
            updated_at: Utc::now(),
        };
        self.rows.insert(self.next_id, template.clone());
        template
    }

    fn deactivate_siblings(&mut self, report_type: &ReportType, keep: Option<TemplateId>) {
        let now = Utc::now();
        for row in self.rows.values_mut() {
            if row.active && &row.report_type == report_type && Some(row.id) != keep {
                row.active = false;
                row.revision += 1;
                row.updated_at = now;
            }
        }
    }
}

/// Report templates held in a mutex-guarded ordered map.
#[derive(Debug, Default)]
pub struct InMemoryReportTemplateRepository {
    state: Mutex<State>,
}

impl InMemoryReportTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportTemplateRepository for InMemoryReportTemplateRepository {
    async fn list(&self) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError> {
        Ok(self.state.lock().await.rows.values().cloned().collect())
    }

    async fn list_by_type(
        &self,
        report_type: &ReportType,
    ) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .values()
            .filter(|row| &row.report_type == report_type)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        Ok(self.state.lock().await.rows.get(&id.get()).cloned())
    }

    async fn find_active(
        &self,
        report_type: &ReportType,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .active_id(report_type)
            .and_then(|id| state.rows.get(&id).cloned()))
    }

    async fn insert(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError> {
        let mut state = self.state.lock().await;
        if draft.active && state.active_id(&draft.report_type).is_some() {
            return Err(ReportTemplateRepositoryError::active_conflict(
                draft.report_type.as_ref(),
            ));
        }
        Ok(state.push(draft))
    }

    async fn save_exclusive(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError> {
        let mut state = self.state.lock().await;
        if let Some(id) = draft.id {
            if !state.rows.contains_key(&id.get()) {
                return Err(ReportTemplateRepositoryError::not_found(id.get()));
            }
        }

        if draft.active {
            state.deactivate_siblings(&draft.report_type, draft.id);
        }

        let Some(id) = draft.id else {
            return Ok(state.push(draft));
        };
        let row = state
            .rows
            .get_mut(&id.get())
            .ok_or_else(|| ReportTemplateRepositoryError::not_found(id.get()))?;
        row.name.clone_from(&draft.name);
        row.content.clone_from(&draft.content);
        row.report_type = draft.report_type.clone();
        row.active = draft.active;
        row.description.clone_from(&draft.description);
        row.revision += 1;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn update_content(
        &self,
        id: TemplateId,
        content: &str,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(row) = state.rows.get_mut(&id.get()).filter(|row| row.active) else {
            return Ok(None);
        };
        content.clone_into(&mut row.content);
        row.revision += 1;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: TemplateId) -> Result<bool, ReportTemplateRepositoryError> {
        Ok(self.state.lock().await.rows.remove(&id.get()).is_some())
    }
}
