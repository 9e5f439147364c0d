use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 清单条目：远程地址 + 本地目标路径
///
/// 目标路径决定幂等性：路径存在即视为已满足，不比较远程内容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(rename = "url")]
    pub locator: String,

    #[serde(rename = "path")]
    pub destination: PathBuf,
}

impl AssetRecord {
    pub fn new(locator: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            locator: locator.into(),
            destination: destination.into(),
        }
    }
}

/// 一次下载任务的完整清单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// 处理条目前创建一次的目录
    pub directory: PathBuf,
    pub entries: Vec<AssetRecord>,
}

/// 栅格尺寸变体（宽 = 高 = size）及其输出路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeVariant {
    pub size: u32,
    pub path: PathBuf,
}
