//! # 边界裁剪模块（cropper）
//!
//! ## 设计思路
//!
//! 该模块将“加载解码 → 降采样 → 逐行亮度扫描 → 坐标换算 → 原图裁剪”
//! 按职责拆分为多个子模块：
//!
//! - `pixel` / `bitmap` / `rect`：像素、独占位图、裁剪矩形
//! - `downsample`：插值降采样
//! - `scan`：亮像素判定与中线向外扫描
//! - `handler`：`BoundaryCropper` 编排整条流水线
//! - `loader` / `source`：外壳侧输入加载与解码
//! - `config` / `error`：配置与错误
//!
//! ## 调用链
//!
//! ```text
//! ImageSource
//!    ↓
//! loader.rs（体积/签名/尺寸校验 + 解码）
//!    ↓  Bitmap（原始分辨率）
//! handler.rs
//!    ├─ downsample.rs（W/4 × H/4）
//!    ├─ scan.rs（above / below）
//!    └─ rect.rs（×2 换算 + 越界拒绝）
//!    ↓
//! Bitmap（裁剪结果）或 CropError
//! ```

mod bitmap;
mod config;
mod downsample;
mod error;
mod handler;
mod loader;
mod pixel;
mod rect;
pub mod scan;
mod source;

pub use bitmap::Bitmap;
pub use config::{CropConfig, filter_name, parse_filter};
pub use downsample::{DOWNSAMPLE_FACTOR, downsample, downsampled_dimensions};
pub use error::CropError;
pub use handler::{BoundaryCropper, CropPlan, INVERSE_SCALE, map_to_source, plan_from_downsampled};
pub use pixel::RgbaPixel;
pub use rect::CropRect;
pub use source::ImageSource;
