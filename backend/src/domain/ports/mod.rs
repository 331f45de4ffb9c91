//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod employee_directory;
mod employee_repository;
mod report_assets;
mod report_designs;
mod report_exports;
mod report_renderer;
mod report_template_repository;
mod report_templates;

pub use employee_directory::EmployeeDirectory;
#[cfg(test)]
pub use employee_directory::MockEmployeeDirectory;
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{EmployeeRepository, EmployeeRepositoryError};
#[cfg(test)]
pub use report_assets::MockReportAssets;
pub use report_assets::{LogoSlot, ReportAssetError, ReportAssets};
#[cfg(test)]
pub use report_designs::MockReportDesigns;
pub use report_designs::ReportDesigns;
#[cfg(test)]
pub use report_exports::MockReportExports;
pub use report_exports::ReportExports;
#[cfg(test)]
pub use report_renderer::MockReportRenderer;
pub use report_renderer::{RenderError, ReportRenderer};
#[cfg(test)]
pub use report_template_repository::MockReportTemplateRepository;
pub use report_template_repository::{ReportTemplateRepository, ReportTemplateRepositoryError};
#[cfg(test)]
pub use report_templates::MockReportTemplates;
pub use report_templates::ReportTemplates;
