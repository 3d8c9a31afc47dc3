//! # 位图缓冲
//!
//! ## 设计思路
//!
//! `Bitmap` 独占一段连续的 `Vec<RgbaPixel>`，按行优先存储，宽高固定。
//! 所有访问均做边界检查，越界返回 `None` 而不是触发未定义行为；
//! 同一时刻只由流水线中的一个阶段持有，阶段之间通过移动所有权传递。
//!
//! ## 实现思路
//!
//! - 构造时校验 `width * height` 不溢出且与数据长度一致。
//! - 构造时统一将 alpha 置为 255，保持“全程不透明”的约束。
//! - 来自解码结果的 RGBA 字节先按 alpha 预乘到黑色背景，透明区域不保留隐藏的颜色。
//! - 与 `image` crate 之间提供 `RgbaImage` / `DynamicImage` 转换。

use image::{DynamicImage, RgbaImage};

use super::{CropError, CropRect, RgbaPixel};

/// 独占的 RGBA 像素网格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<RgbaPixel>,
}

impl Bitmap {
    /// 分配指定尺寸的空白（不透明黑色）位图。
    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        let len = Self::pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![RgbaPixel::BLACK; len],
        })
    }

    /// 使用已有像素构造位图，长度必须等于 `width * height`。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<RgbaPixel>) -> Result<Self, CropError> {
        let expected = Self::pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(CropError::InvalidImage(format!(
                "像素数量不匹配：期望 {}，实际 {}",
                expected,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        }
        .map_pixels(RgbaPixel::opaque))
    }

    /// 使用 RGBA 字节（`width * height * 4`）构造位图，颜色按 alpha 预乘到黑色背景。
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, CropError> {
        let expected = Self::pixel_count(width, height)?
            .checked_mul(4)
            .ok_or_else(|| CropError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

        if bytes.len() != expected {
            return Err(CropError::InvalidImage(format!(
                "像素数据长度异常：期望 {} 字节，实际 {} 字节",
                expected,
                bytes.len()
            )));
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|chunk| {
                RgbaPixel::from_rgba([chunk[0], chunk[1], chunk[2], chunk[3]]).premultiplied()
            })
            .collect();

        Self::from_pixels(width, height, pixels)
    }

    /// 从已解码的 `DynamicImage` 构造位图（任意色彩格式统一转为 RGBA8）。
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, CropError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba_bytes(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[RgbaPixel] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<RgbaPixel> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut RgbaPixel> {
        let idx = self.index(x, y)?;
        self.pixels.get_mut(idx)
    }

    /// 写入单个像素，越界时返回 `false`。
    pub fn set(&mut self, x: u32, y: u32, pixel: RgbaPixel) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = pixel.opaque();
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: u32) -> Option<&[RgbaPixel]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.pixels.get(start..start + self.width as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RgbaPixel]> {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// 对每个像素应用纯函数，原地复用缓冲。
    ///
    /// 结果仍保持不透明约束。
    pub fn map_pixels<F>(mut self, transform: F) -> Self
    where
        F: Fn(RgbaPixel) -> RgbaPixel,
    {
        for pixel in &mut self.pixels {
            *pixel = transform(*pixel).opaque();
        }
        self
    }

    /// 复制矩形区域为新位图。
    pub fn crop(&self, rect: &CropRect) -> Result<Self, CropError> {
        if rect.width == 0 || rect.height == 0 || !rect.fits_within(self.width, self.height) {
            return Err(CropError::DegenerateCrop {
                top: i64::from(rect.y),
                height: i64::from(rect.height),
                source_height: self.height,
            });
        }

        let x_start = rect.x as usize;
        let x_end = x_start + rect.width as usize;
        let mut pixels = Vec::with_capacity(rect.width as usize * rect.height as usize);
        for row in self.rows().skip(rect.y as usize).take(rect.height as usize) {
            pixels.extend_from_slice(&row[x_start..x_end]);
        }

        Ok(Self {
            width: rect.width,
            height: rect.height,
            pixels,
        })
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.pixels[y as usize * self.width as usize + x as usize].into()
        })
    }

    pub fn into_rgba_bytes(self) -> Vec<u8> {
        self.pixels.into_iter().flat_map(RgbaPixel::to_rgba).collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn pixel_count(width: u32, height: u32) -> Result<usize, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidImage(format!(
                "图片尺寸为空：{}x{}",
                width, height
            )));
        }

        (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CropError::ResourceLimit("图片像素数溢出".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| RgbaPixel::new(x as u8, y as u8, 0)))
            .collect();
        Bitmap::from_pixels(width, height, pixels).expect("gradient bitmap")
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(Bitmap::new(0, 4), Err(CropError::InvalidImage(_))));
        assert!(matches!(Bitmap::new(4, 0), Err(CropError::InvalidImage(_))));
    }

    #[test]
    fn from_rgba_bytes_validates_length_and_premultiplies_alpha() {
        let err = Bitmap::from_rgba_bytes(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, CropError::InvalidImage(_)));

        let bytes = vec![
            255, 255, 255, 0, //
            200, 100, 50, 128, //
            10, 20, 30, 255,
        ];
        let bitmap = Bitmap::from_rgba_bytes(3, 1, bytes).expect("bitmap");
        assert_eq!(bitmap.get(0, 0), Some(RgbaPixel::BLACK));
        assert_eq!(bitmap.get(1, 0), Some(RgbaPixel::new(100, 50, 25)));
        assert_eq!(bitmap.get(2, 0), Some(RgbaPixel::new(10, 20, 30)));
    }

    #[test]
    fn access_is_bounds_checked() {
        let mut bitmap = Bitmap::new(3, 2).expect("bitmap");
        assert!(bitmap.set(2, 1, RgbaPixel::WHITE));
        assert!(!bitmap.set(3, 1, RgbaPixel::WHITE));
        assert_eq!(bitmap.get(2, 1), Some(RgbaPixel::WHITE));
        assert_eq!(bitmap.get(0, 2), None);
        assert!(bitmap.row(2).is_none());
        assert_eq!(bitmap.row(1).map(<[RgbaPixel]>::len), Some(3));
        assert_eq!(bitmap.rows().count(), 2);
    }

    #[test]
    fn map_pixels_applies_pure_function() {
        let inverted = gradient(4, 4).map_pixels(|p| {
            RgbaPixel::new(255 - p.red(), 255 - p.green(), 255 - p.blue())
        });
        assert_eq!(inverted.get(1, 2), Some(RgbaPixel::new(254, 253, 255)));
    }

    #[test]
    fn crop_copies_requested_rows() {
        let source = gradient(4, 6);
        let rect = CropRect::full_width(4, 6, 2, 3).expect("rect");
        let cropped = source.crop(&rect).expect("crop");

        assert_eq!(cropped.dimensions(), (4, 3));
        assert_eq!(cropped.get(3, 0), Some(RgbaPixel::new(3, 2, 0)));
        assert_eq!(cropped.get(0, 2), Some(RgbaPixel::new(0, 4, 0)));
    }

    #[test]
    fn crop_rejects_rect_outside_bitmap() {
        let source = gradient(4, 6);
        let rect = CropRect { x: 0, y: 4, width: 4, height: 3 };
        assert!(source.crop(&rect).unwrap_err().is_degenerate());
    }

    #[test]
    fn rgba_image_conversion_keeps_pixels() {
        let source = gradient(5, 3);
        let image = source.to_rgba_image();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.get_pixel(4, 2).0, [4, 2, 0, 255]);

        let back = Bitmap::from_dynamic(&DynamicImage::ImageRgba8(image)).expect("bitmap");
        assert_eq!(back, source);
        assert_eq!(back.into_rgba_bytes().len(), 5 * 3 * 4);
    }
}
