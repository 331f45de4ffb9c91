//! PDF renderer adapter for band-layout report designs.
//!
//! Rendering runs in three stages, each with its own failure class:
//! [`design::compile`] parses and validates the XML ([`RenderError::Compile`]),
//! [`layout::fill`] binds rows and parameters to bands and paginates
//! ([`RenderError::Fill`]), and [`pdf::write`] serializes the pages
//! ([`RenderError::Export`]).

mod design;
mod expression;
mod layout;
mod pdf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{RenderError, ReportRenderer};
use crate::domain::{RenderRequest, TraceId};

/// `ReportRenderer` producing PDF 1.4 documents.
///
/// Work runs on the blocking thread pool with the caller's trace id.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Render synchronously on the current thread.
///
/// # Errors
/// Returns the [`RenderError`] of the first stage that fails.
pub fn render_pdf(request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
    let design = design::compile(&request.design).map_err(RenderError::compile)?;
    let filled = layout::fill(&design, &request.rows, &request.parameters)
        .map_err(RenderError::fill)?;
    let pdf = pdf::write(&design.name, &design.page, &filled).map_err(RenderError::export)?;
    debug!(
        design = %design.name,
        rows = request.rows.len(),
        pages = filled.pages.len(),
        bytes = pdf.len(),
        "report rendered"
    );
    Ok(pdf)
}

#[async_trait]
impl ReportRenderer for PdfReportRenderer {
    async fn render(&self, request: RenderRequest) -> Result<Vec<u8>, RenderError> {
        let trace_id = TraceId::current();
        tokio::task::spawn_blocking(move || match trace_id {
            Some(id) => TraceId::sync_scope(id, || render_pdf(&request)),
            None => render_pdf(&request),
        })
        .await
        .map_err(|err| RenderError::export(format!("render task failed: {err}")))?
    }
}
