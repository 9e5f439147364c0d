//! SVG → PNG 多尺寸导出与 ICO 组装

mod exporter;
mod icon;
pub(crate) mod renderer;

pub use exporter::*;
pub use icon::*;
pub use renderer::*;

use std::path::PathBuf;
use thiserror::Error;

/// 栅格化错误
///
/// `BackendUnavailable`、`SourceUnavailable`、`InvalidSource` 在写出任何文件之前返回。
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    #[error("cannot read vector source {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vector source {path:?}: {source}")]
    InvalidSource {
        path: PathBuf,
        #[source]
        source: resvg::usvg::Error,
    },

    #[error("invalid raster size {0}: sizes must be positive")]
    InvalidSize(u32),

    #[error("cannot allocate a {size}x{size} pixmap")]
    Allocation { size: u32 },

    #[error("failed to encode {size}x{size} PNG: {reason}")]
    Encode { size: u32, reason: String },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// ICO 组装错误，只影响图标容器本身
#[derive(Debug, Error)]
pub enum IconError {
    #[error("no sizes declared for the icon container")]
    Empty,

    #[error("size {0} cannot be stored in an ICO container (max 256)")]
    UnsupportedSize(u32),

    #[error("missing {size}x{size} raster {path:?}: {source}")]
    MissingVariant {
        size: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is {width}x{height}, expected {expected}x{expected}")]
    DimensionMismatch {
        path: PathBuf,
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to encode {size}x{size} icon entry: {source}")]
    Encode {
        size: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
