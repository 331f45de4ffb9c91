//! Port for the document renderer.
//!
//! The renderer is opaque to the domain: design text, data rows and
//! parameters go in, document bytes come out.
use async_trait::async_trait;

use crate::domain::RenderRequest;

use super::define_port_error;

define_port_error! {
    /// Failures reported by renderer adapters.
    pub enum RenderError {
        /// The design document was rejected.
        Compile { message: String } => "report design failed to compile: {message}",
        /// Binding rows or parameters to the design failed.
        Fill { message: String } => "report fill failed: {message}",
        /// Writing the output document failed.
        Export { message: String } => "report export failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render `request` into a PDF document.
    async fn render(&self, request: RenderRequest) -> Result<Vec<u8>, RenderError>;
}
