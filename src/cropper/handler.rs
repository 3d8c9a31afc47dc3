//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `BoundaryCropper` 只负责把一张位图变成另一张位图，不持有任何跨调用的可变状态。
//! 处理链路固定为：
//! 1. 降采样到 `W/4 × H/4`
//! 2. 逐行亮度扫描得到上下边界
//! 3. 边界换算回原图坐标
//! 4. 在原始分辨率位图上裁剪
//!
//! ## 实现思路
//!
//! - 边界换算使用倍数 2（而非降采样的 4），与既有行为保持一致：
//!   `top = (above + 1) * 2`，`height = 2 * (below - (above + 1))`。
//! - 换算结果为空或越界时返回 `DegenerateCrop`，不做截断。
//! - 记录 `downsample/scan/crop/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::downsample::downsample;
use super::scan::{self, Boundaries};
use super::{Bitmap, CropConfig, CropError, CropRect};

/// 降采样行号换算回原图行号的倍数。
pub const INVERSE_SCALE: i64 = 2;

/// 一次裁剪的完整计算结果（尚未执行像素复制）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub source_size: (u32, u32),
    pub downsampled_size: (u32, u32),
    pub boundaries: Boundaries,
    pub rect: CropRect,
}

/// 边界裁剪器。
pub struct BoundaryCropper {
    pub(super) config: CropConfig,
}

impl BoundaryCropper {
    /// 根据配置创建裁剪器，配置非法时立即失败。
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// 计算裁剪方案（步骤 1–3）。
    pub fn plan(&self, source: &Bitmap) -> Result<CropPlan, CropError> {
        let downsampled = downsample(source, self.config.resize_filter)?;
        plan_from_downsampled(&downsampled, source.width(), source.height())
    }

    /// 裁剪主入口：返回原始分辨率下的水平条带。
    ///
    /// # 示例
    /// ```rust
    /// use screencrop::cropper::{Bitmap, BoundaryCropper, CropConfig, RgbaPixel};
    ///
    /// let cropper = BoundaryCropper::new(CropConfig::default())?;
    /// // 全白图片在中线处即命中上下边界，结果退化
    /// let white = Bitmap::from_pixels(40, 80, vec![RgbaPixel::WHITE; 40 * 80])?;
    /// assert!(cropper.crop(&white).unwrap_err().is_degenerate());
    /// # Ok::<(), screencrop::cropper::CropError>(())
    /// ```
    pub fn crop(&self, source: &Bitmap) -> Result<Bitmap, CropError> {
        let total_start = Instant::now();

        let downsample_start = Instant::now();
        let downsampled = downsample(source, self.config.resize_filter)?;
        let downsample_elapsed = downsample_start.elapsed();

        let scan_start = Instant::now();
        let plan = plan_from_downsampled(&downsampled, source.width(), source.height())?;
        let scan_elapsed = scan_start.elapsed();

        let crop_start = Instant::now();
        let cropped = source.crop(&plan.rect)?;
        let crop_elapsed = crop_start.elapsed();

        log::info!(
            "✅ 裁剪完成 - {}x{} -> {}x{} downsample={}ms scan={}ms crop={}ms total={}ms",
            source.width(),
            source.height(),
            cropped.width(),
            cropped.height(),
            downsample_elapsed.as_millis(),
            scan_elapsed.as_millis(),
            crop_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(cropped)
    }
}

/// 在已降采样的位图上执行扫描与坐标换算。
///
/// `source_width` / `source_height` 是原图尺寸，裁剪矩形落在原图坐标系中。
pub fn plan_from_downsampled(
    downsampled: &Bitmap,
    source_width: u32,
    source_height: u32,
) -> Result<CropPlan, CropError> {
    let boundaries = scan::find_boundaries(downsampled);

    log::debug!(
        "🔍 边界扫描 - center={} above={} below={}（降采样 {}x{}）",
        boundaries.center_row,
        boundaries.above,
        boundaries.below,
        downsampled.width(),
        downsampled.height()
    );

    let (top, height) = map_to_source(&boundaries);
    let rect = CropRect::full_width(source_width, source_height, top, height)?;

    Ok(CropPlan {
        source_size: (source_width, source_height),
        downsampled_size: downsampled.dimensions(),
        boundaries,
        rect,
    })
}

/// 降采样边界换算到原图的 `(top, height)`，结果可能为负。
pub fn map_to_source(boundaries: &Boundaries) -> (i64, i64) {
    let first_kept = i64::from(boundaries.above) + 1;
    let top = first_kept * INVERSE_SCALE;
    let height = INVERSE_SCALE * (i64::from(boundaries.below) - first_kept);
    (top, height)
}
