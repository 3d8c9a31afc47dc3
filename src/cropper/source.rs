//! # 数据源与中间模型
//!
//! - `ImageSource` 表示外部来源语义（选图器给出的文件、Base64 或内存字节）
//! - `RawImageData` 表示已加载但未解码的字节

use std::path::PathBuf;

/// 图片输入来源。
pub enum ImageSource {
    /// 本地文件路径来源。
    FilePath(PathBuf),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 已在内存中的编码字节。
    Bytes(Vec<u8>),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}
