//! # 降采样模块
//!
//! ## 设计思路
//!
//! 扫描前先把原图缩小到 `W/4 × H/4`，降低逐行扫描成本。
//! 缩放必须是真正的插值重采样（不是最近邻），让阈值判定在噪声附近更稳定。
//!
//! ## 实现思路
//!
//! 1. 首选 `fast_image_resize` 卷积缩放
//! 2. 失败时回退到 `image::imageops::resize`
//! 3. 结果重新包装为 `Bitmap`，保持不透明约束

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{ImageBuffer, Rgba};

use super::{Bitmap, CropError};

/// 扫描前的降采样倍数。
pub const DOWNSAMPLE_FACTOR: u32 = 4;

/// 降采样目标尺寸，单边最小为 1。
pub fn downsampled_dimensions(width: u32, height: u32) -> (u32, u32) {
    (
        (width / DOWNSAMPLE_FACTOR).max(1),
        (height / DOWNSAMPLE_FACTOR).max(1),
    )
}

pub fn downsample(source: &Bitmap, filter: FilterType) -> Result<Bitmap, CropError> {
    if filter == FilterType::Nearest {
        return Err(CropError::InvalidConfig(
            "降采样必须使用插值滤镜，不支持 Nearest".to_string(),
        ));
    }

    let (width, height) = source.dimensions();
    let (target_width, target_height) = downsampled_dimensions(width, height);

    match resize_with_fast_image_resize(source, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 降采样失败，回退 image::imageops::resize：{}", err);
            let resized = image::imageops::resize(
                &source.to_rgba_image(),
                target_width,
                target_height,
                filter,
            );
            Bitmap::from_rgba_bytes(target_width, target_height, resized.into_raw())
        }
    }
}

fn resize_with_fast_image_resize(
    source: &Bitmap,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<Bitmap, CropError> {
    let (src_width, src_height) = source.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        source.clone().into_rgba_bytes(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| CropError::InvalidImage(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| CropError::InvalidImage(format!("fast_image_resize 执行失败：{}", e)))?;

    let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
        target_width,
        target_height,
        dst_image.into_vec(),
    )
    .ok_or_else(|| CropError::InvalidImage("fast_image_resize 输出缓冲长度异常".to_string()))?;

    Bitmap::from_rgba_bytes(target_width, target_height, rgba.into_raw())
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::RgbaPixel;

    fn solid(width: u32, height: u32, pixel: RgbaPixel) -> Bitmap {
        Bitmap::from_pixels(width, height, vec![pixel; (width * height) as usize])
            .expect("solid bitmap")
    }

    #[test]
    fn target_is_quarter_size_with_floor_of_one() {
        assert_eq!(downsampled_dimensions(400, 800), (100, 200));
        assert_eq!(downsampled_dimensions(401, 803), (100, 200));
        assert_eq!(downsampled_dimensions(3, 2), (1, 1));
    }

    #[test]
    fn solid_colour_survives_resampling() {
        let source = solid(64, 32, RgbaPixel::new(240, 240, 240));
        let small = downsample(&source, FilterType::CatmullRom).expect("downsample");

        assert_eq!(small.dimensions(), (16, 8));
        for pixel in small.pixels() {
            assert!((i16::from(pixel.red()) - 240).abs() <= 1);
            assert_eq!(pixel.alpha(), 255);
        }
    }

    #[test]
    fn interpolation_blends_neighbouring_rows() {
        // 每 2 行黑白交替，插值后得到介于两者之间的灰度
        let mut source = solid(16, 64, RgbaPixel::BLACK);
        for y in (0..64).filter(|y| (y / 2) % 2 == 0) {
            for x in 0..16 {
                source.set(x, y, RgbaPixel::WHITE);
            }
        }

        let small = downsample(&source, FilterType::Triangle).expect("downsample");
        let middle = small.get(2, 8).expect("pixel");
        assert!(middle.red() > 0 && middle.red() < 255);
    }

    #[test]
    fn nearest_filter_is_rejected() {
        let source = solid(8, 8, RgbaPixel::WHITE);
        let err = downsample(&source, FilterType::Nearest).unwrap_err();
        assert!(matches!(err, CropError::InvalidConfig(_)));
    }
}
