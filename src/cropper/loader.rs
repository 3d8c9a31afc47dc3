//! # 加载与解码模块
//!
//! ## 设计思路
//!
//! 选图器交给裁剪核心的是“某种来源的编码图片”，这里负责把它变成 `Bitmap`。
//! 校验尽量前置：体积 → 文件签名 → 头部尺寸 → 像素/内存上限 → 完整解码，
//! 尽快失败，减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - Base64：Data URL / 纯 Base64 解析，解码前先估算体积。
//! - 解码失败统一映射为 `CropError::InvalidImage`。

use base64::{Engine as _, engine::general_purpose};
use image::{GenericImageView, ImageReader};
use std::io::Cursor;
use std::path::Path;

use super::source::RawImageData;
use super::{Bitmap, BoundaryCropper, CropConfig, CropError, ImageSource};

impl BoundaryCropper {
    /// 按来源加载并解码为位图。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use screencrop::cropper::{BoundaryCropper, CropConfig, ImageSource};
    ///
    /// let cropper = BoundaryCropper::new(CropConfig::default())?;
    /// let bitmap = cropper.load(ImageSource::FilePath("photo.png".into()))?;
    /// let _cropped = cropper.crop(&bitmap)?;
    /// # Ok::<(), screencrop::cropper::CropError>(())
    /// ```
    pub fn load(&self, source: ImageSource) -> Result<Bitmap, CropError> {
        let raw = match source {
            ImageSource::FilePath(path) => Self::load_from_file(&path, &self.config)?,
            ImageSource::Base64(data) => Self::load_from_base64(&data, &self.config)?,
            ImageSource::Bytes(bytes) => Self::load_from_bytes(bytes, &self.config)?,
        };
        Self::decode_bitmap(raw, &self.config)
    }

    fn load_from_file(path: &Path, config: &CropConfig) -> Result<RawImageData, CropError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(CropError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| CropError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(CropError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| CropError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    fn load_from_base64(data: &str, config: &CropConfig) -> Result<RawImageData, CropError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    fn load_from_bytes(bytes: Vec<u8>, config: &CropConfig) -> Result<RawImageData, CropError> {
        if bytes.len() as u64 > config.max_file_size {
            return Err(CropError::ResourceLimit(format!(
                "图片数据过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    /// 解码为位图，完整解码前先按头部尺寸做资源限制。
    fn decode_bitmap(raw: RawImageData, config: &CropConfig) -> Result<Bitmap, CropError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| CropError::InvalidImage(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_pixel_limits(config, width, height)?;

        let bitmap = Bitmap::from_dynamic(&decoded)?;

        log::info!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(bitmap)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), CropError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CropError::InvalidImage(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| CropError::InvalidImage(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量与预计解码内存是否超过配置上限。
    fn validate_pixel_limits(config: &CropConfig, width: u32, height: u32) -> Result<(), CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidImage(format!(
                "图片尺寸为空：{}x{}",
                width, height
            )));
        }

        let pixels = u64::from(width)
            .checked_mul(u64::from(height))
            .ok_or_else(|| CropError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(CropError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        let estimated = pixels
            .checked_mul(4)
            .ok_or_else(|| CropError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(CropError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, CropError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| CropError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| CropError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, CropError> {
        let normalized = data.trim();

        let payload = if normalized.starts_with("data:image/") {
            let base64_start = normalized
                .find(";base64,")
                .ok_or_else(|| CropError::InvalidImage("缺少 base64 标记".to_string()))?;
            &normalized[base64_start + 8..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(payload)?;
        if estimated_len > max_file_size {
            return Err(CropError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| CropError::InvalidImage(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), CropError> {
        if bytes.is_empty() {
            return Err(CropError::InvalidImage("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| CropError::InvalidImage("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(CropError::InvalidImage(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
