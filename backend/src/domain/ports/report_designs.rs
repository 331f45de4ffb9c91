//! Driving port for the authoritative design of a report type.
//!
//! The design of a type is the content of its active template. A type that
//! has never been designed falls back to the bundled default, which is
//! persisted on first use.

use async_trait::async_trait;

use crate::domain::{Error, ReportTemplate, ReportType};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportDesigns: Send + Sync {
    /// Current design text for `report_type`.
    async fn resolve(&self, report_type: &ReportType) -> Result<String, Error>;

    /// Replace the design of `report_type`. Blank content is rejected.
    async fn save(&self, report_type: &ReportType, content: String)
    -> Result<ReportTemplate, Error>;
}
