//! 裁剪结果存储模块
//!
//! # 设计思路
//!
//! 统一管理裁剪结果的持久化路径，支持用户自定义目录，
//! 并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 优先使用设置中配置的自定义目录。
//! - 未设置时回退到当前工作目录下的 `cropped` 子目录。
//! - 文件名带时间戳，避免覆盖已有结果。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use chrono::Local;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cropper::Bitmap;
use crate::error::AppError;

const DEFAULT_OUTPUT_DIR: &str = "cropped";

/// 输出编码格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self, AppError> {
        match name.trim().to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(AppError::Settings(format!(
                "未知输出格式：{}（可选：png / jpeg）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// 获取输出目录
///
/// # 参数
/// * `custom_dir` - 用户自定义目录（可选，空字符串视为未设置）
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的输出目录
/// - `Err(AppError::Storage)` — 无法创建目录
pub fn resolve_output_dir(custom_dir: Option<&str>) -> Result<PathBuf, AppError> {
    let path = match custom_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_OUTPUT_DIR),
    };

    if !path.exists() {
        fs::create_dir_all(&path).map_err(|e| {
            AppError::Storage(format!("创建输出目录 '{}' 失败: {}", path.display(), e))
        })?;
    }
    Ok(path)
}

/// 将裁剪结果写入目录，返回文件路径。
pub fn save_bitmap(bitmap: &Bitmap, dir: &Path, format: OutputFormat) -> Result<PathBuf, AppError> {
    let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
    let file_name = format!("crop_{}.{}", timestamp, format.extension());
    let file_path = dir.join(&file_name);

    let rgba = bitmap.to_rgba_image();
    let result = match format {
        // JPEG 不支持 alpha 通道
        OutputFormat::Jpeg => DynamicImage::ImageRgba8(rgba)
            .to_rgb8()
            .save_with_format(&file_path, format.image_format()),
        OutputFormat::Png => rgba.save_with_format(&file_path, format.image_format()),
    };
    result.map_err(|e| AppError::Storage(format!("保存图片失败: {}", e)))?;

    log::info!(
        "💾 已保存裁剪结果 {}x{} -> {}",
        bitmap.width(),
        bitmap.height(),
        file_path.display()
    );

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::RgbaPixel;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("screencrop-storage-{}", name))
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::parse("PNG").ok(), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("jpg").ok(), Some(OutputFormat::Jpeg));
        assert!(matches!(OutputFormat::parse("gif"), Err(AppError::Settings(_))));
        assert_eq!(OutputFormat::Jpeg.as_str(), "jpeg");
    }

    #[test]
    fn resolve_output_dir_creates_custom_dir() {
        let dir = temp_dir("resolve").join("nested");
        let _ = fs::remove_dir_all(&dir);

        let resolved = resolve_output_dir(dir.to_str()).expect("resolve");
        assert_eq!(resolved, dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn save_bitmap_writes_decodable_png_and_jpeg() {
        let dir = resolve_output_dir(temp_dir("save").to_str()).expect("resolve");
        let pixels = vec![RgbaPixel::new(200, 10, 10); 6 * 4];
        let bitmap = Bitmap::from_pixels(6, 4, pixels).expect("bitmap");

        for format in [OutputFormat::Png, OutputFormat::Jpeg] {
            let path = save_bitmap(&bitmap, &dir, format).expect("save");
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some(format.extension()));

            let decoded = image::open(&path).expect("reopen");
            assert_eq!((decoded.width(), decoded.height()), (6, 4));
        }
    }
}
