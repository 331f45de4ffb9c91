//! Port for read-only resources bundled with the deployment.
use async_trait::async_trait;

use crate::domain::ReportType;

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading bundled resources.
    pub enum ReportAssetError {
        /// The resource is not bundled.
        NotFound { resource: String } => "bundled resource {resource} not found",
        /// The resource exists but could not be read.
        Read { resource: String, message: String } => "failed to read bundled resource {resource}: {message}",
    }
}

/// Image slots every report render receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogoSlot {
    Left,
    Right,
}

impl LogoSlot {
    pub const ALL: [LogoSlot; 2] = [LogoSlot::Left, LogoSlot::Right];

    /// Render parameter the image is bound to.
    #[must_use]
    pub fn parameter_name(self) -> &'static str {
        match self {
            Self::Left => "logoLeft",
            Self::Right => "logoRight",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportAssets: Send + Sync {
    /// Bundled fallback design for `report_type`.
    async fn default_design(&self, report_type: &ReportType) -> Result<String, ReportAssetError>;

    /// Encoded image bytes for `slot`.
    async fn logo(&self, slot: LogoSlot) -> Result<Vec<u8>, ReportAssetError>;
}
