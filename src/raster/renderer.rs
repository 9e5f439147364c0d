use resvg::{tiny_skia, usvg};
use std::path::{Path, PathBuf};

use super::RenderError;

/// 自检用的最小文档
const PROBE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><rect width="1" height="1" fill="#000"/></svg>"##;

/// 已解析的 SVG 源文件
pub struct SvgSource {
    path: PathBuf,
    tree: usvg::Tree,
}

impl SvgSource {
    /// 整体读入文本并解析
    pub fn load(path: &Path, load_system_fonts: bool) -> Result<Self, RenderError> {
        let text =
            std::fs::read_to_string(path).map_err(|source| RenderError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let mut opt = usvg::Options {
            // 相对 href（嵌入图片等）按源文件所在目录解析
            resources_dir: std::fs::canonicalize(path)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf())),
            ..usvg::Options::default()
        };
        if load_system_fonts {
            opt.fontdb_mut().load_system_fonts();
        }

        Self::parse(path, &text, &opt)
    }

    pub fn parse(path: &Path, text: &str, opt: &usvg::Options) -> Result<Self, RenderError> {
        let tree = usvg::Tree::from_str(text, opt).map_err(|source| RenderError::InvalidSource {
            path: path.to_path_buf(),
            source,
        })?;
        let size = tree.size();
        log::debug!(
            "Parsed {:?} ({}x{})",
            path,
            size.width(),
            size.height()
        );

        Ok(Self {
            path: path.to_path_buf(),
            tree,
        })
    }

    /// 渲染为 size x size 的 PNG
    ///
    /// 两个方向分别缩放到目标尺寸，不保持文档原有宽高比。
    pub fn render_png(&self, size: u32) -> Result<Vec<u8>, RenderError> {
        if size == 0 {
            return Err(RenderError::InvalidSize(size));
        }

        log::debug!("Rendering {:?} at {}x{}", self.path, size, size);
        let mut pixmap =
            tiny_skia::Pixmap::new(size, size).ok_or(RenderError::Allocation { size })?;
        let doc = self.tree.size();
        let transform = tiny_skia::Transform::from_scale(
            size as f32 / doc.width(),
            size as f32 / doc.height(),
        );
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        pixmap.encode_png().map_err(|e| RenderError::Encode {
            size,
            reason: e.to_string(),
        })
    }
}

/// 渲染后端自检：解析、栅格化并编码一个 1x1 文档
pub fn probe_backend() -> Result<(), RenderError> {
    let source = SvgSource::parse(Path::new("<probe>"), PROBE_SVG, &usvg::Options::default())
        .map_err(|e| RenderError::BackendUnavailable {
            reason: e.to_string(),
        })?;
    source
        .render_png(1)
        .map(|_| ())
        .map_err(|e| RenderError::BackendUnavailable {
            reason: e.to_string(),
        })
}
