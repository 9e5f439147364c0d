use std::path::{Path, PathBuf};

use super::{assemble_icon, probe_backend, RenderError, SvgSource};
use crate::config::IconSettings;
use crate::models::{ArtifactStatus, BatchReport, Outcome, SizeVariant};
use crate::utils::{resolve_path, StagedFile};

/// 默认图 `<prefix>.png` 的边长，固定值
pub const CANONICAL_SIZE: u32 = 256;

/// 图标导出器
///
/// 顺序：后端自检 → 读取源文件 → 按列表顺序逐个尺寸渲染并立即落盘 →
/// 单独渲染默认尺寸 → 组装 ICO（尽力而为）。
pub struct RasterExporter {
    settings: IconSettings,
    source_path: PathBuf,
    output_dir: PathBuf,
}

impl RasterExporter {
    /// `root` 为相对路径的基准目录
    pub fn new(settings: IconSettings, root: &Path) -> Self {
        let source_path = resolve_path(root, &settings.source);
        let output_dir = resolve_path(root, &settings.output_dir);
        Self {
            settings,
            source_path,
            output_dir,
        }
    }

    /// `<prefix>_<size>.png`
    pub fn variant_path(&self, size: u32) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.png", self.settings.file_prefix, size))
    }

    /// `<prefix>.png`
    pub fn default_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.png", self.settings.file_prefix))
    }

    /// `<prefix>.ico`
    pub fn container_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.ico", self.settings.file_prefix))
    }

    pub fn variants(&self) -> Vec<SizeVariant> {
        self.sized(&self.settings.sizes)
    }

    pub fn container_variants(&self) -> Vec<SizeVariant> {
        self.sized(&self.settings.container_sizes)
    }

    fn sized(&self, sizes: &[u32]) -> Vec<SizeVariant> {
        sizes
            .iter()
            .map(|&size| SizeVariant {
                size,
                path: self.variant_path(size),
            })
            .collect()
    }

    /// 执行导出
    ///
    /// 返回 `Err` 时没有写出任何文件。某个尺寸渲染失败会终止后续所有步骤，
    /// 此时报告被标记为 aborted，已写出的文件保留。
    pub fn export(&self) -> Result<BatchReport, RenderError> {
        probe_backend()?;
        let source = SvgSource::load(&self.source_path, self.settings.load_system_fonts)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut report = BatchReport::default();

        let mut renders: Vec<(u32, PathBuf)> = self
            .variants()
            .into_iter()
            .map(|v| (v.size, v.path))
            .collect();
        // 默认尺寸独立渲染一次，即使与列表中的尺寸重复
        renders.push((CANONICAL_SIZE, self.default_path()));

        for (size, path) in renders {
            match Self::render_to(&source, size, &path) {
                Ok(bytes) => {
                    log::info!("Created {:?} ({}x{}, {} bytes)", path, size, size, bytes);
                    report.push(Outcome::new(path, ArtifactStatus::Created { bytes }));
                }
                Err(e) => {
                    log::error!("Rendering {}x{} failed, aborting: {}", size, size, e);
                    report.push(Outcome::new(path, ArtifactStatus::failed(e.to_string())));
                    report.aborted = true;
                    return Ok(report);
                }
            }
        }

        if self.settings.assemble_container {
            let path = self.container_path();
            let status = match assemble_icon(&self.container_variants(), &path) {
                Ok(bytes) => {
                    log::info!("Created {:?} ({} bytes)", path, bytes);
                    ArtifactStatus::Created { bytes }
                }
                Err(e) => {
                    log::warn!("Could not create {:?}: {}", path, e);
                    ArtifactStatus::failed(e.to_string())
                }
            };
            report.push(Outcome::new(path, status));
        }

        Ok(report)
    }

    fn render_to(source: &SvgSource, size: u32, path: &Path) -> Result<u64, RenderError> {
        let png = source.render_png(size)?;
        StagedFile::write_atomic(path, &png).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
