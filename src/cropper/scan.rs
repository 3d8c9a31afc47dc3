//! # 亮度扫描模块
//!
//! ## 设计思路
//!
//! 在降采样后的位图上，从垂直中线出发分别向下、向上逐行扫描，
//! 找到第一条“浅色背景行”作为上下边界：
//!
//! ```text
//!   row 0 ────────────────  ← 向上扫描终点
//!          ...
//!   boundary_above ═══════  ← 向上第一条合格行
//!          ...
//!   center_row ───────────  ← 两个方向都从这里开始（含）
//!          ...
//!   boundary_below ═══════  ← 向下第一条合格行
//!          ...
//!   row h-1 ──────────────  ← 向下扫描终点
//! ```
//!
//! ## 实现思路
//!
//! - 亮像素：R/G/B 三个通道均严格大于 230。
//! - 合格行：从左到右累计亮像素数，一旦超过 `floor(width * 0.95)` 立即判定合格。
//! - 某方向没有合格行时，向下默认取 `height`，向上默认取 `0`。

use super::{Bitmap, RgbaPixel};

/// 亮像素阈值（0–255），三个颜色通道都必须严格大于该值。
pub const BRIGHTNESS_THRESHOLD: u8 = 230;

/// 一行中亮像素占比需要超过的比例。
pub const BRIGHT_ROW_RATIO: f64 = 0.95;

/// 扫描结果（降采样坐标系）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub center_row: u32,
    /// 中线及以上第一条合格行；不存在时为 0。
    pub above: u32,
    /// 中线及以下第一条合格行；不存在时为位图高度。
    pub below: u32,
}

pub fn is_bright(pixel: RgbaPixel) -> bool {
    pixel.red() > BRIGHTNESS_THRESHOLD
        && pixel.green() > BRIGHTNESS_THRESHOLD
        && pixel.blue() > BRIGHTNESS_THRESHOLD
}

/// 合格行需要超过的亮像素数量。
pub fn bright_count_threshold(row_width: usize) -> usize {
    (row_width as f64 * BRIGHT_ROW_RATIO) as usize
}

/// 判断一行是否为浅色背景行。
pub fn row_qualifies(row: &[RgbaPixel]) -> bool {
    let threshold = bright_count_threshold(row.len());
    let mut bright = 0usize;
    for &pixel in row {
        if is_bright(pixel) {
            bright += 1;
        }
        if bright > threshold {
            return true;
        }
    }
    false
}

/// 从 `center_row` 向下扫描（含中线），返回第一条合格行。
pub fn scan_below(bitmap: &Bitmap, center_row: u32) -> Option<u32> {
    (center_row..bitmap.height()).find(|&y| bitmap.row(y).is_some_and(row_qualifies))
}

/// 从 `center_row` 向上扫描（含中线），返回第一条合格行。
pub fn scan_above(bitmap: &Bitmap, center_row: u32) -> Option<u32> {
    (0..=center_row)
        .rev()
        .find(|&y| bitmap.row(y).is_some_and(row_qualifies))
}

pub fn find_boundaries(bitmap: &Bitmap) -> Boundaries {
    let center_row = bitmap.height() / 2;
    let below = scan_below(bitmap, center_row).unwrap_or(bitmap.height());
    let above = scan_above(bitmap, center_row).unwrap_or(0);

    Boundaries {
        center_row,
        above,
        below,
    }
}
