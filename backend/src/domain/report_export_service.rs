//! Employee report rendering, implementing [`ReportExports`].
//!
//! Every render receives the `createdBy` text parameter and both logo images.
//! Failures on the stored design are internal errors; failures on a
//! caller-supplied preview design are reported back as invalid requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::employee_service::map_employee_error;
use crate::domain::ports::{
    EmployeeRepository, LogoSlot, RenderError, ReportAssets, ReportDesigns, ReportExports,
    ReportRenderer,
};
use crate::domain::report_design_service::map_asset_error;
use crate::domain::{
    CREATED_BY, Employee, Error, ParameterValue, PreviewSource, RenderRequest, ReportParameters,
    ReportRow, ReportType,
};

/// Render parameter carrying the report author.
pub const CREATED_BY_PARAMETER: &str = "createdBy";

/// Report orchestration over employees, designs, assets and the renderer.
#[derive(Clone)]
pub struct EmployeeReportService<E, D, A, P> {
    employees: Arc<E>,
    designs: Arc<D>,
    assets: Arc<A>,
    renderer: Arc<P>,
}

impl<E, D, A, P> EmployeeReportService<E, D, A, P> {
    pub fn new(employees: Arc<E>, designs: Arc<D>, assets: Arc<A>, renderer: Arc<P>) -> Self {
        Self {
            employees,
            designs,
            assets,
            renderer,
        }
    }
}

/// Field map for one employee, as bound to `$F{...}` references.
#[must_use]
pub fn employee_row(employee: &Employee) -> ReportRow {
    ReportRow::from([
        ("id".to_owned(), employee.id.to_string()),
        ("name".to_owned(), employee.name.clone()),
        ("address".to_owned(), employee.address.clone()),
        ("phone".to_owned(), employee.phone.clone()),
        ("gender".to_owned(), employee.gender.clone()),
    ])
}

/// Placeholder rows used to preview a design without touching live data.
#[must_use]
pub fn sample_rows() -> Vec<ReportRow> {
    (1..=2)
        .map(|id| {
            ReportRow::from([
                ("id".to_owned(), id.to_string()),
                ("name".to_owned(), "John Doe".to_owned()),
                ("address".to_owned(), "123 Main St".to_owned()),
                ("phone".to_owned(), "1234567890".to_owned()),
                ("gender".to_owned(), "Male".to_owned()),
            ])
        })
        .collect()
}

fn render_failure_details(error: &RenderError) -> serde_json::Value {
    let stage = match error {
        RenderError::Compile { .. } => "compile",
        RenderError::Fill { .. } => "fill",
        RenderError::Export { .. } => "export",
    };
    json!({ "stage": stage })
}

impl<E, D, A, P> EmployeeReportService<E, D, A, P>
where
    E: EmployeeRepository,
    D: ReportDesigns,
    A: ReportAssets,
    P: ReportRenderer,
{
    async fn parameters(&self) -> Result<ReportParameters, Error> {
        let mut parameters = ReportParameters::new();
        parameters.insert(
            CREATED_BY_PARAMETER.to_owned(),
            ParameterValue::Text(CREATED_BY.to_owned()),
        );
        for slot in LogoSlot::ALL {
            let bytes = self.assets.logo(slot).await.map_err(|err| {
                warn!(parameter = slot.parameter_name(), error = %err, "logo unavailable");
                map_asset_error(err)
            })?;
            parameters.insert(
                slot.parameter_name().to_owned(),
                ParameterValue::Image(bytes),
            );
        }
        Ok(parameters)
    }

    async fn live_rows(&self) -> Result<Vec<ReportRow>, Error> {
        let employees = self.employees.list().await.map_err(map_employee_error)?;
        Ok(employees.iter().map(employee_row).collect())
    }
}

#[async_trait]
impl<E, D, A, P> ReportExports for EmployeeReportService<E, D, A, P>
where
    E: EmployeeRepository,
    D: ReportDesigns,
    A: ReportAssets,
    P: ReportRenderer,
{
    async fn export_employee_report(&self) -> Result<Vec<u8>, Error> {
        let report_type = ReportType::employee_report();
        let design = self.designs.resolve(&report_type).await?;
        let rows = self.live_rows().await?;
        let row_count = rows.len();
        let parameters = self.parameters().await?;

        let request = RenderRequest {
            design,
            rows,
            parameters,
        };
        match self.renderer.render(request).await {
            Ok(pdf) => {
                info!(%report_type, rows = row_count, bytes = pdf.len(), "employee report exported");
                Ok(pdf)
            }
            Err(err) => {
                warn!(%report_type, error = %err, "stored report design failed to render");
                Err(Error::internal(err.to_string()).with_details(render_failure_details(&err)))
            }
        }
    }

    async fn preview(&self, design: String, source: PreviewSource) -> Result<Vec<u8>, Error> {
        if design.trim().is_empty() {
            return Err(Error::invalid_request("design content must not be empty"));
        }
        let rows = match source {
            PreviewSource::Sample => sample_rows(),
            PreviewSource::Live => self.live_rows().await?,
        };
        let parameters = self.parameters().await?;

        let request = RenderRequest {
            design,
            rows,
            parameters,
        };
        self.renderer.render(request).await.map_err(|err| {
            info!(?source, error = %err, "preview design rejected");
            Error::invalid_request(err.to_string()).with_details(render_failure_details(&err))
        })
    }
}
