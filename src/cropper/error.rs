//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 裁剪核心只有两种终止性错误：输入无法解释为像素网格（`InvalidImage`），
//! 以及计算出的裁剪矩形为空或越界（`DegenerateCrop`）。
//! 其余分支来自外壳侧的加载与配置校验，同样一次性返回，不做重试。

/// 裁剪链路统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("无效图片：{0}")]
    InvalidImage(String),

    #[error("裁剪区域无效：top={top} height={height}（原图高度 {source_height}）")]
    DegenerateCrop {
        top: i64,
        height: i64,
        source_height: u32,
    },

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),
}

impl CropError {
    /// 是否为裁剪矩形退化导致的失败。
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateCrop { .. })
    }
}
