use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use super::RunStatus;
use crate::config::{FetchSettings, Settings};
use crate::fetch::{AssetFetcher, FetchEvent, HttpTransport, Transport};
use crate::models::{ArtifactStatus, BatchReport, Manifest, Outcome};
use crate::utils::{format_megabytes, get_working_dir};

const BANNER_WIDTH: usize = 50;

/// `materialize fetch`
pub fn run() -> Result<RunStatus> {
    let working_dir = get_working_dir()?;
    let settings = Settings::default().fetch;
    let transport = HttpTransport::new(Duration::from_secs(settings.connect_timeout_secs))
        .context("Failed to build HTTP client")?;

    // 单线程运行时，条目依次 await
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(fetch(&settings, transport, &working_dir, &mut stdout))
}

/// 下载清单中缺失的资源，进度和结果逐行写入 `out`
pub async fn fetch<T: Transport, W: Write>(
    settings: &FetchSettings,
    transport: T,
    root: &Path,
    out: &mut W,
) -> Result<RunStatus> {
    let manifest = Manifest {
        directory: settings.directory.clone(),
        entries: settings.assets.clone(),
    };

    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", settings.title)?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;
    out.flush()?;

    let fetcher = AssetFetcher::new(transport, root);
    let mut write_error = None;
    let report = fetcher
        .fetch_all_with(&manifest, |event| {
            let line = match event {
                FetchEvent::Started { label } => format!("Downloading {}...", label),
                FetchEvent::Finished(outcome) => outcome_line(outcome),
            };
            if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
                write_error.get_or_insert(e);
            }
        })
        .await?;
    if let Some(e) = write_error {
        return Err(e).context("Failed to write progress");
    }

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", closing_message(settings, &report))?;
    writeln!(out, "{}", rule)?;

    Ok(RunStatus::from_report(&report))
}

/// 单个条目的结果行
pub fn outcome_line(outcome: &Outcome) -> String {
    match &outcome.status {
        ArtifactStatus::AlreadyPresent => format!("[OK] {} already exists", outcome.label),
        ArtifactStatus::Created { bytes } => format!(
            "[OK] Downloaded {} ({} MB)",
            outcome.label,
            format_megabytes(*bytes)
        ),
        ArtifactStatus::Failed { reason } => {
            format!("[ERROR] Error downloading {}: {}", outcome.label, reason)
        }
    }
}

fn closing_message(settings: &FetchSettings, report: &BatchReport) -> String {
    let failed = report
        .outcomes
        .iter()
        .filter(|o| o.status.is_failed())
        .count();
    if failed == 0 {
        settings.ready_message.clone()
    } else {
        format!(
            "{} of {} assets are missing; run again to retry them.",
            failed,
            report.outcomes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fetcher::tests::FakeTransport;
    use crate::models::AssetRecord;
    use std::path::PathBuf;

    const PRESENT_URL: &str = "https://example.com/voices/present.onnx";
    const FRESH_URL: &str = "https://example.com/voices/fresh.onnx";
    const BROKEN_URL: &str = "https://example.com/voices/broken.onnx";

    #[test]
    fn test_outcome_lines() {
        let mut report = BatchReport::default();
        report.push(Outcome::new(
            "models/en_US-amy-medium.onnx",
            ArtifactStatus::AlreadyPresent,
        ));
        report.push(Outcome::new(
            "models/en_US-amy-medium.onnx.json",
            ArtifactStatus::Created { bytes: 4_885 },
        ));
        report.push(Outcome::new(
            "models/extra.onnx",
            ArtifactStatus::Created { bytes: 63_201_294 },
        ));
        report.push(Outcome::new(
            "models/broken.onnx",
            ArtifactStatus::failed("HTTP 404 Not Found"),
        ));

        let lines: Vec<String> = report.outcomes.iter().map(outcome_line).collect();
        assert_eq!(
            lines,
            vec![
                "[OK] en_US-amy-medium.onnx already exists",
                "[OK] Downloaded en_US-amy-medium.onnx.json (0.0 MB)",
                "[OK] Downloaded extra.onnx (60.3 MB)",
                "[ERROR] Error downloading broken.onnx: HTTP 404 Not Found",
            ]
        );
    }

    #[test]
    fn test_closing_message() {
        let settings = FetchSettings::default();
        let mut report = BatchReport::default();
        report.push(Outcome::new("a.onnx", ArtifactStatus::AlreadyPresent));
        assert_eq!(closing_message(&settings, &report), settings.ready_message);

        report.push(Outcome::new("b.onnx", ArtifactStatus::failed("timed out")));
        assert_eq!(
            closing_message(&settings, &report),
            "1 of 2 assets are missing; run again to retry them."
        );
    }

    fn mixed_settings() -> FetchSettings {
        FetchSettings {
            directory: PathBuf::from("models"),
            assets: vec![
                AssetRecord::new(PRESENT_URL, "models/present.onnx"),
                AssetRecord::new(FRESH_URL, "models/fresh.onnx"),
                AssetRecord::new(BROKEN_URL, "models/broken.onnx"),
            ],
            ..FetchSettings::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_mixed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/present.onnx"), b"cached").unwrap();

        let settings = mixed_settings();
        let transport = FakeTransport::default()
            .with_body(FRESH_URL, &[1u8; 2048])
            .with_failure(BROKEN_URL, "connection reset by peer");
        let mut out = Vec::new();
        let status = fetch(&settings, transport, dir.path(), &mut out)
            .await
            .unwrap();

        assert_eq!(status, RunStatus::Partial);
        assert_eq!(status.exit_code(), 2);

        let rule = "=".repeat(BANNER_WIDTH);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                rule.as_str(),
                settings.title.as_str(),
                rule.as_str(),
                "",
                "[OK] present.onnx already exists",
                "Downloading fresh.onnx...",
                "[OK] Downloaded fresh.onnx (0.0 MB)",
                "Downloading broken.onnx...",
                "[ERROR] Error downloading broken.onnx: connection reset by peer",
                "",
                rule.as_str(),
                "1 of 3 assets are missing; run again to retry them.",
                rule.as_str(),
            ]
        );

        assert_eq!(
            std::fs::read(dir.path().join("models/present.onnx")).unwrap(),
            b"cached"
        );
        assert_eq!(
            std::fs::read(dir.path().join("models/fresh.onnx")).unwrap().len(),
            2048
        );
        assert!(!dir.path().join("models/broken.onnx").exists());
    }

    #[tokio::test]
    async fn test_fetch_everything_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        for name in ["present.onnx", "fresh.onnx", "broken.onnx"] {
            std::fs::write(dir.path().join("models").join(name), b"cached").unwrap();
        }

        let settings = mixed_settings();
        let mut out = Vec::new();
        let status = fetch(&settings, FakeTransport::default(), dir.path(), &mut out)
            .await
            .unwrap();

        assert_eq!(status, RunStatus::Success);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Downloading"));
        assert!(text.contains(&settings.ready_message));
    }
}
