use std::path::PathBuf;
use thiserror::Error;

use crate::models::AssetRecord;

/// ICO 单帧允许的最大边长
pub const MAX_CONTAINER_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// 内置设置，编译期固定，不读取外部文件或环境变量
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub icons: IconSettings,
    pub fetch: FetchSettings,
}

/// 图标导出设置
///
/// 默认图 `<prefix>.png` 的尺寸不在这里，见 `raster::CANONICAL_SIZE`。
#[derive(Debug, Clone)]
pub struct IconSettings {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub sizes: Vec<u32>,
    pub container_sizes: Vec<u32>,
    pub assemble_container: bool,
    // SVG 中的 <text> 需要系统字体
    pub load_system_fonts: bool,
}

/// 资源下载设置
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub directory: PathBuf,
    pub title: String,
    pub ready_message: String,
    pub connect_timeout_secs: u64,
    pub assets: Vec<AssetRecord>,
}

const VOICE_BASE_URL: &str =
    "https://huggingface.co/rhasspy/piper-voices/resolve/main/en/en_US/amy/medium";

fn default_assets() -> Vec<AssetRecord> {
    vec![
        AssetRecord::new(
            format!("{}/en_US-amy-medium.onnx", VOICE_BASE_URL),
            "models/en_US-amy-medium.onnx",
        ),
        AssetRecord::new(
            format!("{}/en_US-amy-medium.onnx.json", VOICE_BASE_URL),
            "models/en_US-amy-medium.onnx.json",
        ),
    ]
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("icon.svg"),
            output_dir: PathBuf::from("."),
            file_prefix: "icon".to_string(),
            sizes: vec![16, 32, 48, 64, 128, 256, 512],
            container_sizes: vec![16, 32, 48, 64, 128, 256],
            assemble_container: true,
            load_system_fonts: true,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("models"),
            title: "Quick Download - Amy Voice Model (60MB)".to_string(),
            ready_message: "Amy model ready! You can now test the app.".to_string(),
            connect_timeout_secs: 30,
            assets: default_assets(),
        }
    }
}

impl IconSettings {
    /// 尺寸必须为正数，列表非空，ICO 帧不超过 256
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::Invalid("icons.sizes must not be empty".into()));
        }
        if self.sizes.contains(&0) {
            return Err(ConfigError::Invalid(
                "icons.sizes must contain positive integers only".into(),
            ));
        }
        if let Some(size) = self
            .container_sizes
            .iter()
            .find(|&&s| s == 0 || s > MAX_CONTAINER_SIZE)
        {
            return Err(ConfigError::Invalid(format!(
                "icons.container_sizes entry {} is outside 1..={}",
                size, MAX_CONTAINER_SIZE
            )));
        }
        if self.file_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "icons.file_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}
