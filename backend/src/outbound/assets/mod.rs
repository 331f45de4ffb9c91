//! Filesystem adapter for bundled report resources.
//!
//! Resources are resolved beneath a single directory opened through
//! `cap_std`, so lookups cannot escape it:
//!
//! ```text
//! <assets>/reports/<report_type>.jrxml
//! <assets>/images/logo.png
//! <assets>/images/organization_logo.png
//! ```

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ReportType;
use crate::domain::ports::{LogoSlot, ReportAssetError, ReportAssets};

/// `ReportAssets` backed by a capability-scoped directory.
#[derive(Debug, Clone)]
pub struct FsReportAssets {
    root: Arc<Dir>,
}

impl FsReportAssets {
    /// Open the assets directory at `path`.
    ///
    /// # Errors
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = Dir::open_ambient_dir(path.as_ref(), ambient_authority())?;
        Ok(Self::from_dir(root))
    }

    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    async fn read(&self, resource: String) -> Result<Vec<u8>, ReportAssetError> {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || {
            debug!(resource = %resource, "reading bundled resource");
            root.read(&resource).map_err(|err| match err.kind() {
                ErrorKind::NotFound => ReportAssetError::not_found(resource),
                _ => ReportAssetError::read(resource, err.to_string()),
            })
        })
        .await
        .map_err(|err| ReportAssetError::read("<blocking task>", err.to_string()))?
    }
}

fn design_path(report_type: &ReportType) -> String {
    format!("reports/{report_type}.jrxml")
}

fn logo_path(slot: LogoSlot) -> &'static str {
    match slot {
        LogoSlot::Left => "images/logo.png",
        LogoSlot::Right => "images/organization_logo.png",
    }
}

#[async_trait]
impl ReportAssets for FsReportAssets {
    async fn default_design(&self, report_type: &ReportType) -> Result<String, ReportAssetError> {
        let resource = design_path(report_type);
        let bytes = self.read(resource.clone()).await?;
        String::from_utf8(bytes)
            .map_err(|err| ReportAssetError::read(resource, err.to_string()))
    }

    async fn logo(&self, slot: LogoSlot) -> Result<Vec<u8>, ReportAssetError> {
        self.read(logo_path(slot).to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn bundle() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open");
        root.create_dir_all("reports").expect("mkdir reports");
        root.create_dir_all("images").expect("mkdir images");
        root.write("reports/employee_report.jrxml", "<jasperReport/>")
            .expect("write design");
        root.write("images/logo.png", [1_u8, 2, 3]).expect("write logo");
        dir
    }

    #[rstest]
    #[tokio::test]
    async fn reads_default_design_by_report_type(bundle: TempDir) {
        let assets = FsReportAssets::open(bundle.path()).expect("open");

        let design = assets
            .default_design(&ReportType::employee_report())
            .await
            .expect("design");

        assert_eq!(design, "<jasperReport/>");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_report_type_is_not_found(bundle: TempDir) {
        let assets = FsReportAssets::open(bundle.path()).expect("open");
        let report_type = ReportType::new("payroll").expect("valid");

        let err = assets
            .default_design(&report_type)
            .await
            .expect_err("missing");

        assert_eq!(err, ReportAssetError::not_found("reports/payroll.jrxml"));
    }

    #[rstest]
    #[case(LogoSlot::Left, Ok(vec![1_u8, 2, 3]))]
    #[case(
        LogoSlot::Right,
        Err(ReportAssetError::not_found("images/organization_logo.png"))
    )]
    #[tokio::test]
    async fn reads_logos_by_slot(
        bundle: TempDir,
        #[case] slot: LogoSlot,
        #[case] expected: Result<Vec<u8>, ReportAssetError>,
    ) {
        let assets = FsReportAssets::open(bundle.path()).expect("open");
        assert_eq!(assets.logo(slot).await, expected);
    }

    #[rstest]
    fn missing_directory_fails_to_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(FsReportAssets::open(dir.path().join("absent")).is_err());
    }
}
