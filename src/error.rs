//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError` 枚举，承载外壳（会话、存储、设置）与裁剪核心的所有失败。
//! 裁剪失败对单次调用是终止性的：直接返回，由外壳决定如何向用户展示。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `CropError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于外壳直接展示或上报。

use serde::Serialize;

use crate::cropper::CropError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 裁剪流水线错误（加载 / 解码 / 裁剪）
    #[error("{0}")]
    Crop(#[from] CropError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出目录不可用或写入失败
    #[error("存储错误: {0}")]
    Storage(String),

    /// 设置文件读写失败
    #[error("设置错误: {0}")]
    Settings(String),

    /// 会话状态机收到非法事件，或后台任务异常退出
    #[error("会话错误: {0}")]
    Session(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
