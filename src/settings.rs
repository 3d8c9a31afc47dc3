use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cropper::{CropConfig, filter_name, parse_filter};
use crate::error::AppError;
use crate::storage::OutputFormat;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// 外壳设置（持久化为 JSON）。
///
/// 亮度阈值与扫描比例不属于可调项，这里只保存外围选项。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub output_dir: Option<String>,
    pub resize_filter: String,
    pub output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            resize_filter: filter_name(CropConfig::default().resize_filter).to_string(),
            output_format: OutputFormat::Png.as_str().to_string(),
        }
    }
}

impl AppSettings {
    /// 读取设置文件，文件不存在时返回默认值。
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::debug!("设置文件不存在，使用默认设置: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str::<Self>(&content)
            .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    pub fn to_crop_config(&self) -> Result<CropConfig, AppError> {
        let resize_filter = parse_filter(&self.resize_filter)?;
        Ok(CropConfig {
            resize_filter,
            ..CropConfig::default()
        })
    }

    pub fn output_format(&self) -> Result<OutputFormat, AppError> {
        OutputFormat::parse(&self.output_format)
    }
}
