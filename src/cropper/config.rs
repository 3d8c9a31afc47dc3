//! # 配置模块
//!
//! ## 设计思路
//!
//! 亮度阈值、亮行比例与缩放倍数是裁剪算法的固定常量，不在此处暴露。
//! `CropConfig` 只承载外围可调项：输入体积与像素上限、降采样滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供可直接使用的配置。
//! - `validate` 在构造 `BoundaryCropper` 时执行，尽早拒绝非法组合。
//! - `parse_filter` / `filter_name` 负责滤镜名称与 `FilterType` 之间的转换。

use image::imageops::FilterType;

use super::CropError;

/// 裁剪配置。
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 降采样滤镜，必须为插值滤镜。
    pub resize_filter: FilterType,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::CatmullRom,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<(), CropError> {
        if self.max_file_size == 0 {
            return Err(CropError::InvalidConfig("max_file_size 必须大于 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(CropError::InvalidConfig("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 4 {
            return Err(CropError::InvalidConfig(
                "max_decoded_bytes 至少需要容纳一个像素".to_string(),
            ));
        }
        if self.resize_filter == FilterType::Nearest {
            return Err(CropError::InvalidConfig(
                "resize_filter 不能为 nearest（需要插值降采样）".to_string(),
            ));
        }
        Ok(())
    }
}

/// 从外部字符串解析降采样滤镜。
///
/// # 示例
/// ```rust
/// use screencrop::cropper::{filter_name, parse_filter};
///
/// let filter = parse_filter("Lanczos3")?;
/// assert_eq!(filter_name(filter), "lanczos3");
/// # Ok::<(), screencrop::cropper::CropError>(())
/// ```
pub fn parse_filter(name: &str) -> Result<FilterType, CropError> {
    match name.trim().to_lowercase().as_str() {
        "triangle" | "bilinear" => Ok(FilterType::Triangle),
        "catmullrom" | "catmull-rom" => Ok(FilterType::CatmullRom),
        "gaussian" => Ok(FilterType::Gaussian),
        "lanczos3" => Ok(FilterType::Lanczos3),
        other => Err(CropError::InvalidConfig(format!(
            "未知降采样滤镜：{}（可选：triangle / catmullrom / gaussian / lanczos3）",
            other
        ))),
    }
}

/// 将滤镜输出为稳定字符串，供设置文件持久化。
pub fn filter_name(filter: FilterType) -> &'static str {
    match filter {
        FilterType::Nearest => "nearest",
        FilterType::Triangle => "triangle",
        FilterType::CatmullRom => "catmullrom",
        FilterType::Gaussian => "gaussian",
        FilterType::Lanczos3 => "lanczos3",
    }
}
