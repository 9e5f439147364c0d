use anyhow::Result;
use std::path::Path;

use super::RunStatus;
use crate::config::{IconSettings, Settings};
use crate::models::{ArtifactStatus, BatchReport};
use crate::raster::{RasterExporter, RenderError};
use crate::utils::get_working_dir;

const CAPABILITY_HINT: &str =
    "Please reinstall materialize built with the default resvg features (text, raster-images)";

/// `materialize icons`
pub fn run() -> Result<RunStatus> {
    let working_dir = get_working_dir()?;
    Ok(run_in(&working_dir))
}

/// 在 `root` 下使用内置设置导出
pub fn run_in(root: &Path) -> RunStatus {
    export(&Settings::default().icons, root)
}

/// 导出图标并打印每个产物的状态
pub fn export(settings: &IconSettings, root: &Path) -> RunStatus {
    if let Err(e) = settings.validate() {
        println!("Error creating icons: {}", e);
        return RunStatus::Failed;
    }

    let exporter = RasterExporter::new(settings.clone(), root);
    match exporter.export() {
        Ok(report) => {
            for line in report_lines(&report) {
                println!("{}", line);
            }
            RunStatus::from_report(&report)
        }
        Err(RenderError::BackendUnavailable { reason }) => {
            println!("Error: Missing rendering capability");
            println!("{}", CAPABILITY_HINT);
            println!("Details: {}", reason);
            RunStatus::Failed
        }
        Err(e) => {
            log::error!("Icon export failed: {}", e);
            println!("Error creating icons: {}", e);
            RunStatus::Failed
        }
    }
}

/// 报告转换为输出行
pub fn report_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.outcomes.len() + 2);
    for outcome in &report.outcomes {
        let is_container = outcome
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ico"));
        match &outcome.status {
            ArtifactStatus::Created { .. } | ArtifactStatus::AlreadyPresent => {
                lines.push(format!("Created {}", outcome.label));
            }
            ArtifactStatus::Failed { reason } if is_container => {
                lines.push(format!("Could not create ICO: {}", reason));
            }
            ArtifactStatus::Failed { reason } => {
                lines.push(format!("Error creating icons: {}", reason));
            }
        }
    }

    if !report.is_aborted() {
        lines.push(String::new());
        lines.push("Icon creation complete!".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use crate::raster::renderer::tests::{png_dimensions, SQUARE_SVG};

    #[test]
    fn test_report_lines() {
        let mut report = BatchReport::default();
        report.push(Outcome::new("out/icon_16.png", ArtifactStatus::Created { bytes: 300 }));
        report.push(Outcome::new("out/icon.png", ArtifactStatus::Created { bytes: 9000 }));
        report.push(Outcome::new(
            "out/icon.ico",
            ArtifactStatus::failed("missing 64x64 raster"),
        ));

        assert_eq!(
            report_lines(&report),
            vec![
                "Created icon_16.png",
                "Created icon.png",
                "Could not create ICO: missing 64x64 raster",
                "",
                "Icon creation complete!",
            ]
        );
    }

    #[test]
    fn test_aborted_report_has_no_completion_line() {
        let mut report = BatchReport::default();
        report.push(Outcome::new("icon_16.png", ArtifactStatus::Created { bytes: 300 }));
        report.push(Outcome::new(
            "icon_0.png",
            ArtifactStatus::failed("invalid raster size 0"),
        ));
        report.aborted = true;

        let lines = report_lines(&report);
        assert_eq!(lines.last().unwrap(), "Error creating icons: invalid raster size 0");
    }

    #[test]
    fn test_export_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let status = export(&IconSettings::default(), dir.path());
        assert_eq!(status, RunStatus::Failed);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_in_ignores_settings_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.svg"), SQUARE_SVG).unwrap();
        std::fs::write(
            dir.path().join("materialize.json"),
            r#"{"icons":{"sizes":[24],"file_prefix":"app"}}"#,
        )
        .unwrap();

        assert_eq!(run_in(dir.path()), RunStatus::Success);

        assert!(!dir.path().join("icon_24.png").exists());
        assert!(!dir.path().join("app.png").exists());
        for size in [16, 32, 48, 64, 128, 256, 512] {
            let png = std::fs::read(dir.path().join(format!("icon_{}.png", size))).unwrap();
            assert_eq!(png_dimensions(&png), (size, size));
        }
        let png = std::fs::read(dir.path().join("icon.png")).unwrap();
        assert_eq!(png_dimensions(&png), (256, 256));
        assert!(dir.path().join("icon.ico").exists());
    }

    #[test]
    fn test_export_invalid_settings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = IconSettings {
            sizes: Vec::new(),
            ..IconSettings::default()
        };
        assert_eq!(export(&settings, dir.path()), RunStatus::Failed);
    }
}
