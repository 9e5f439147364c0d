use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 单个产物（栅格图、图标容器或下载文件）的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// 本次运行新写入，`bytes` 为落盘大小
    Created { bytes: u64 },
    /// 目标路径已存在，跳过
    AlreadyPresent,
    /// 失败原因（面向用户的可读文本）
    Failed { reason: String },
}

impl ArtifactStatus {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// 报告中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

impl Outcome {
    /// 以文件名作为 label 构建
    pub fn new(path: impl Into<PathBuf>, status: ArtifactStatus) -> Self {
        let path = path.into();
        Self {
            label: file_label(&path),
            path,
            status,
        }
    }
}

/// 一次批处理的有序结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
    /// 批处理在中途被终止（剩余条目未尝试）
    #[serde(default)]
    pub aborted: bool,
}

impl BatchReport {
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.aborted || self.outcomes.iter().any(|o| o.status.is_failed())
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn created_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ArtifactStatus::Created { .. }))
            .count()
    }

    pub fn find(&self, label: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}

/// 取路径的文件名部分用于展示，没有文件名时退回完整路径
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
