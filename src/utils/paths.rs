use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// 获取工作目录，所有相对路径都以它为基准
pub fn get_working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Cannot determine working directory")
}

/// 相对路径拼接到 `root`，绝对路径原样返回
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// 字节数换算为 MB（1024 * 1024），保留一位小数
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/work");
        assert_eq!(
            resolve_path(root, Path::new("models/a.onnx")),
            PathBuf::from("/work/models/a.onnx")
        );
        assert_eq!(
            resolve_path(root, Path::new("/tmp/a.onnx")),
            PathBuf::from("/tmp/a.onnx")
        );
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.0");
        assert_eq!(format_megabytes(1024 * 1024), "1.0");
        assert_eq!(format_megabytes(63_201_294), "60.3");
        assert_eq!(format_megabytes(4_885), "0.0");
    }
}
