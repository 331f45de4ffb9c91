//! PostgreSQL-backed `ReportTemplateRepository` implementation using Diesel ORM.
//!
//! The partial unique index `report_templates_one_active_per_type` enforces
//! one active template per report type. Exclusive saves serialize on a
//! transaction-scoped advisory lock keyed by the report type, so concurrent
//! activations queue instead of racing on the index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ReportTemplateRepository, ReportTemplateRepositoryError};
use crate::domain::{ReportTemplate, ReportType, TemplateDraft, TemplateId};

use super::diesel_helpers::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReportTemplateRow, ReportTemplateRow, ReportTemplateUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::report_templates;

const LOCK_REPORT_TYPE_SQL: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

/// Diesel-backed implementation of the `ReportTemplateRepository` port.
#[derive(Clone)]
pub struct DieselReportTemplateRepository {
    pool: DbPool,
}

impl DieselReportTemplateRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReportTemplateRepositoryError {
    map_basic_pool_error(error, ReportTemplateRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ReportTemplateRepositoryError {
    map_basic_diesel_error(
        error,
        ReportTemplateRepositoryError::query,
        ReportTemplateRepositoryError::connection,
    )
}

/// Map write failures, reporting the partial unique index as a conflict.
fn map_write_error(error: DieselError, report_type: &ReportType) -> ReportTemplateRepositoryError {
    if is_unique_violation(&error) {
        return ReportTemplateRepositoryError::active_conflict(report_type.as_ref());
    }
    map_diesel_error(error)
}

/// Map failures of an exclusive save. An update whose row vanished surfaces
/// as Diesel's `NotFound`.
fn map_save_error(error: DieselError, draft: &TemplateDraft) -> ReportTemplateRepositoryError {
    match (error, draft.id) {
        (DieselError::NotFound, Some(id)) => ReportTemplateRepositoryError::not_found(id.get()),
        (error, _) => map_write_error(error, &draft.report_type),
    }
}

fn to_domain(row: ReportTemplateRow) -> Result<ReportTemplate, ReportTemplateRepositoryError> {
    ReportTemplate::try_from(row).map_err(ReportTemplateRepositoryError::query)
}

fn to_domain_all(
    rows: Vec<ReportTemplateRow>,
) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError> {
    rows.into_iter().map(to_domain).collect()
}

fn new_row(draft: &TemplateDraft) -> NewReportTemplateRow<'_> {
    NewReportTemplateRow {
        name: &draft.name,
        content: &draft.content,
        report_type: draft.report_type.as_ref(),
        is_active: draft.active,
        description: draft.description.as_deref(),
    }
}

fn update_row(draft: &TemplateDraft) -> ReportTemplateUpdate<'_> {
    ReportTemplateUpdate {
        name: &draft.name,
        content: &draft.content,
        report_type: draft.report_type.as_ref(),
        is_active: draft.active,
        description: draft.description.as_deref(),
    }
}

/// Body of an exclusive save; runs inside a transaction on `conn`.
async fn save_in_transaction(
    conn: &mut AsyncPgConnection,
    draft: &TemplateDraft,
) -> Result<ReportTemplateRow, DieselError> {
    sql_query(LOCK_REPORT_TYPE_SQL)
        .bind::<Text, _>(draft.report_type.as_ref())
        .execute(conn)
        .await?;

    if draft.active {
        let keep: Vec<i64> = draft.id.map(TemplateId::get).into_iter().collect();
        diesel::update(report_templates::table)
            .filter(report_templates::report_type.eq(draft.report_type.as_ref()))
            .filter(report_templates::is_active.eq(true))
            .filter(report_templates::id.ne_all(keep))
            .set((
                report_templates::is_active.eq(false),
                report_templates::revision.eq(report_templates::revision + 1),
                report_templates::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .await?;
    }

    match draft.id {
        None => {
            diesel::insert_into(report_templates::table)
                .values(&new_row(draft))
                .returning(ReportTemplateRow::as_returning())
                .get_result(conn)
                .await
        }
        Some(id) => {
            diesel::update(report_templates::table.find(id.get()))
                .set((
                    &update_row(draft),
                    report_templates::revision.eq(report_templates::revision + 1),
                    report_templates::updated_at.eq(diesel::dsl::now),
                ))
                .returning(ReportTemplateRow::as_returning())
                .get_result(conn)
                .await
        }
    }
}

#[async_trait]
impl ReportTemplateRepository for DieselReportTemplateRepository {
    async fn list(&self) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReportTemplateRow> = report_templates::table
            .select(ReportTemplateRow::as_select())
            .order_by(report_templates::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_domain_all(rows)
    }

    async fn list_by_type(
        &self,
        report_type: &ReportType,
    ) -> Result<Vec<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReportTemplateRow> = report_templates::table
            .filter(report_templates::report_type.eq(report_type.as_ref()))
            .select(ReportTemplateRow::as_select())
            .order_by(report_templates::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_domain_all(rows)
    }

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReportTemplateRow> = report_templates::table
            .find(id.get())
            .select(ReportTemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_domain).transpose()
    }

    async fn find_active(
        &self,
        report_type: &ReportType,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReportTemplateRow> = report_templates::table
            .filter(report_templates::report_type.eq(report_type.as_ref()))
            .filter(report_templates::is_active.eq(true))
            .select(ReportTemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_domain).transpose()
    }

    async fn insert(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: ReportTemplateRow = diesel::insert_into(report_templates::table)
            .values(&new_row(draft))
            .returning(ReportTemplateRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &draft.report_type))?;

        to_domain(row)
    }

    async fn save_exclusive(
        &self,
        draft: &TemplateDraft,
    ) -> Result<ReportTemplate, ReportTemplateRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| async move { save_in_transaction(conn, draft).await }.scope_boxed())
            .await
            .map_err(|err| map_save_error(err, draft))?;

        to_domain(row)
    }

    async fn update_content(
        &self,
        id: TemplateId,
        content: &str,
    ) -> Result<Option<ReportTemplate>, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReportTemplateRow> = diesel::update(report_templates::table.find(id.get()))
            .filter(report_templates::is_active.eq(true))
            .set((
                report_templates::content.eq(content),
                report_templates::revision.eq(report_templates::revision + 1),
                report_templates::updated_at.eq(diesel::dsl::now),
            ))
            .returning(ReportTemplateRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_domain).transpose()
    }

    async fn delete(&self, id: TemplateId) -> Result<bool, ReportTemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(report_templates::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for template repository error mapping.
    use super::*;
    use diesel::result::DatabaseErrorKind;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> TemplateDraft {
        TemplateDraft {
            id: Some(TemplateId::new(9)),
            name: "Quarterly".to_owned(),
            content: "<jasperReport/>".to_owned(),
            report_type: ReportType::employee_report(),
            active: true,
            description: None,
        }
    }

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        )
    }

    #[rstest]
    fn unique_violation_is_active_conflict(draft: TemplateDraft) {
        let err = map_write_error(unique_violation(), &draft.report_type);
        assert_eq!(
            err,
            ReportTemplateRepositoryError::active_conflict("employee_report")
        );
    }

    #[rstest]
    fn vanished_row_is_not_found(draft: TemplateDraft) {
        let err = map_save_error(DieselError::NotFound, &draft);
        assert_eq!(err, ReportTemplateRepositoryError::not_found(9));
    }

    #[rstest]
    fn not_found_without_id_is_query_error(mut draft: TemplateDraft) {
        draft.id = None;
        let err = map_save_error(DieselError::NotFound, &draft);
        assert!(matches!(err, ReportTemplateRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, ReportTemplateRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn rows_borrow_draft_columns(draft: TemplateDraft) {
        let insert = new_row(&draft);
        let update = update_row(&draft);

        assert_eq!(insert.report_type, "employee_report");
        assert!(insert.is_active);
        assert_eq!(update.content, "<jasperReport/>");
        assert_eq!(update.description, None);
    }
}
