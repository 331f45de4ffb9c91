//! Driving port for rendered report documents.

use async_trait::async_trait;

use crate::domain::{Error, PreviewSource};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportExports: Send + Sync {
    /// Render every employee with the stored employee report design.
    async fn export_employee_report(&self) -> Result<Vec<u8>, Error>;

    /// Render an unsaved design against sample or live rows.
    ///
    /// The design is never persisted; rejected designs surface as
    /// `invalid_request`.
    async fn preview(&self, design: String, source: PreviewSource) -> Result<Vec<u8>, Error>;
}
