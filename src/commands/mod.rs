pub mod fetch;
pub mod icons;

use crate::models::{ArtifactStatus, BatchReport};

/// 命令执行结果，对应进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 全部产物已生成或已存在
    Success,
    /// 部分失败（或中途终止），但有产物可用
    Partial,
    /// 初始化失败或没有任何可用产物
    Failed,
}

impl RunStatus {
    pub fn from_report(report: &BatchReport) -> Self {
        if !report.has_failures() {
            return Self::Success;
        }
        let usable = report
            .outcomes
            .iter()
            .any(|o| !matches!(o.status, ArtifactStatus::Failed { .. }));
        if usable {
            Self::Partial
        } else {
            Self::Failed
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
            Self::Partial => 2,
        }
    }
}
