//! # screencrop — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                外壳 (main.rs / 调用方界面)                │
//! │                                                          │
//! │  选图 ── session (Idle → Picking → Processing →          │
//! │                   Ready | Failed) ── storage 保存         │
//! │       │                                                  │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Bitmap / Result<Bitmap, CropError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            裁剪核心                               │
//! │                                                          │
//! │  cropper ── loader → downsample → scan → rect → crop     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`cropper`] | 边界裁剪核心：位图模型、降采样、亮度扫描、坐标换算、裁剪 |
//! | [`session`] | 外壳会话状态机，后台线程执行裁剪 |
//! | [`storage`] | 输出目录管理与结果编码保存 |
//! | [`settings`] | JSON 设置文件读写 |
//! | [`error`] | 应用级错误类型 `AppError` |

pub mod cropper;
pub mod error;
pub mod session;
pub mod settings;
pub mod storage;
