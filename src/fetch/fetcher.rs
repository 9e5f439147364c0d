use reqwest::Url;
use std::path::{Path, PathBuf};

use super::{FetchError, Transport};
use crate::models::{file_label, ArtifactStatus, AssetRecord, BatchReport, Manifest, Outcome};
use crate::utils::{format_megabytes, resolve_path, StagedFile};

/// 下载过程中的进度事件
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// 开始传输某个条目（已存在的条目不会触发）
    Started { label: &'a str },
    /// 条目处理完毕
    Finished(&'a Outcome),
}

/// 资源下载器
///
/// 严格按清单顺序逐条处理，不并发、不重试。目标文件已存在即跳过；
/// 单条失败只记录在报告中，不影响后续条目。
///
/// 只创建清单的 `directory`，条目的父目录不会被创建：
/// 落在该目录之外且父目录不存在的条目按写入失败处理。
pub struct AssetFetcher<T> {
    transport: T,
    root: PathBuf,
}

impl<T: Transport> AssetFetcher<T> {
    /// `root` 为清单中相对路径的基准目录
    pub fn new(transport: T, root: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            root: root.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 处理整个清单
    ///
    /// 只有目标目录无法创建时返回 `Err`，此时不会处理任何条目。
    pub async fn fetch_all(&self, manifest: &Manifest) -> Result<BatchReport, FetchError> {
        self.fetch_all_with(manifest, |_| {}).await
    }

    /// 同 `fetch_all`，每个条目开始传输和处理完毕时回调 `on_event`
    pub async fn fetch_all_with<F>(
        &self,
        manifest: &Manifest,
        mut on_event: F,
    ) -> Result<BatchReport, FetchError>
    where
        F: FnMut(FetchEvent<'_>),
    {
        let directory = resolve_path(&self.root, &manifest.directory);
        std::fs::create_dir_all(&directory).map_err(|source| FetchError::Directory {
            path: directory.clone(),
            source,
        })?;

        let mut report = BatchReport::default();
        for record in &manifest.entries {
            let outcome = self.fetch_entry(record, &mut on_event).await;
            on_event(FetchEvent::Finished(&outcome));
            report.push(outcome);
        }

        log::info!(
            "Fetch finished: {} downloaded, {} entries total",
            report.created_count(),
            report.outcomes.len()
        );
        Ok(report)
    }

    /// 处理单个条目，所有错误都转换为 `Failed`
    pub async fn fetch_one(&self, record: &AssetRecord) -> Outcome {
        self.fetch_entry(record, &mut |_: FetchEvent<'_>| {}).await
    }

    async fn fetch_entry(
        &self,
        record: &AssetRecord,
        on_event: &mut dyn FnMut(FetchEvent<'_>),
    ) -> Outcome {
        let destination = resolve_path(&self.root, &record.destination);
        if destination.exists() {
            log::debug!("{:?} already exists, skipping", destination);
            return Outcome::new(destination, ArtifactStatus::AlreadyPresent);
        }

        let label = file_label(&destination);
        log::info!("Downloading {}...", label);
        on_event(FetchEvent::Started { label: &label });

        let status = match self.download(record, &destination).await {
            Ok(bytes) => {
                log::info!(
                    "Saved {:?} ({} MB)",
                    destination,
                    format_megabytes(bytes)
                );
                ArtifactStatus::Created { bytes }
            }
            Err(e) => {
                log::error!("Failed to download {}: {}", record.locator, e);
                ArtifactStatus::failed(e.to_string())
            }
        };
        Outcome::new(destination, status)
    }

    async fn download(&self, record: &AssetRecord, destination: &Path) -> Result<u64, FetchError> {
        let locator = Url::parse(&record.locator).map_err(|e| FetchError::InvalidLocator {
            locator: record.locator.clone(),
            reason: e.to_string(),
        })?;

        // 出错时 staged 被 drop，临时文件随之删除
        let mut staged = StagedFile::create(destination)?;
        let received = self.transport.transfer(&locator, &mut staged).await?;
        let bytes = staged.commit()?;
        if received != bytes {
            log::warn!(
                "Transport reported {} bytes but {} were written to {:?}",
                received,
                bytes,
                destination
            );
        }
        Ok(bytes)
    }
}
