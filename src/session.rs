//! # 会话状态机
//!
//! ## 设计思路
//!
//! 外壳的界面状态由一个显式状态机驱动，替代零散的布尔标记：
//!
//! ```text
//!            OpenPicker              ImageSelected
//!   Idle ─────────────→ Picking ─────────────→ Processing
//!    ↑                    │ PickerCancelled        │
//!    └────────────────────┘                        │ CropFinished
//!                                    ┌─────────────┴─────────────┐
//!                                    ↓ Ok                        ↓ Err
//!                              Ready { saved }               Failed
//!                                    │ SaveFinished
//!                                    ↓
//!                              Ready { saved: true }
//! ```
//!
//! `Ready` / `Failed` 均可再次 `OpenPicker` 开始下一轮；其余组合视为非法事件。
//!
//! ## 实现思路
//!
//! - `transition` 是纯函数：输入旧状态与事件，输出新状态；非法时原样归还旧状态。
//! - 裁剪通过 `tokio::task::spawn_blocking` 在阻塞线程池执行，调用方线程不被占用。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cropper::{Bitmap, BoundaryCropper, ImageSource};
use crate::error::AppError;

/// 外壳可见的会话状态。
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Picking,
    Processing,
    Ready {
        result: Bitmap,
        saved_to: Option<PathBuf>,
    },
    Failed(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Picking => "picking",
            Self::Processing => "processing",
            Self::Ready { .. } => "ready",
            Self::Failed(_) => "failed",
        }
    }

    pub fn result(&self) -> Option<&Bitmap> {
        match self {
            Self::Ready { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Ready { saved_to: Some(_), .. })
    }
}

/// 驱动状态迁移的离散事件。
#[derive(Debug)]
pub enum SessionEvent {
    OpenPicker,
    PickerCancelled,
    ImageSelected,
    CropFinished(Result<Bitmap, AppError>),
    SaveFinished(Result<PathBuf, String>),
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenPicker => "open_picker",
            Self::PickerCancelled => "picker_cancelled",
            Self::ImageSelected => "image_selected",
            Self::CropFinished(_) => "crop_finished",
            Self::SaveFinished(_) => "save_finished",
        }
    }
}

/// 计算下一个状态；非法事件时归还旧状态与错误。
pub fn transition(
    state: SessionState,
    event: SessionEvent,
) -> Result<SessionState, (SessionState, AppError)> {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (S::Idle | S::Ready { .. } | S::Failed(_), E::OpenPicker) => Ok(S::Picking),
        (S::Picking, E::PickerCancelled) => Ok(S::Idle),
        (S::Picking, E::ImageSelected) => Ok(S::Processing),
        (S::Processing, E::CropFinished(Ok(result))) => Ok(S::Ready {
            result,
            saved_to: None,
        }),
        (S::Processing, E::CropFinished(Err(err))) => {
            log::warn!("⚠️ 裁剪失败：{}", err);
            Ok(S::Failed(err.to_string()))
        }
        (S::Ready { result, .. }, E::SaveFinished(Ok(path))) => Ok(S::Ready {
            result,
            saved_to: Some(path),
        }),
        (S::Ready { result, saved_to }, E::SaveFinished(Err(err))) => {
            log::warn!("⚠️ 保存失败，结果保留：{}", err);
            Ok(S::Ready { result, saved_to })
        }
        (state, event) => {
            let err = AppError::Session(format!(
                "状态 {} 不接受事件 {}",
                state.name(),
                event.name()
            ));
            Err((state, err))
        }
    }
}

/// 单个用户会话：持有当前状态并串行处理事件。
#[derive(Debug, Default)]
pub struct CropSession {
    state: SessionState,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn handle(&mut self, event: SessionEvent) -> Result<&SessionState, AppError> {
        let current = std::mem::take(&mut self.state);
        let from = current.name();
        match transition(current, event) {
            Ok(next) => {
                log::debug!("🔁 会话状态 {} -> {}", from, next.name());
                self.state = next;
                Ok(&self.state)
            }
            Err((previous, err)) => {
                self.state = previous;
                Err(err)
            }
        }
    }

    /// 选图完成后执行裁剪，并推进到 `Ready` 或 `Failed`。
    ///
    /// 只有非法事件会返回 `Err`；裁剪本身的失败体现在 `Failed` 状态中。
    pub async fn process_selected(
        &mut self,
        cropper: Arc<BoundaryCropper>,
        source: ImageSource,
    ) -> Result<&SessionState, AppError> {
        self.handle(SessionEvent::ImageSelected)?;
        let outcome = crop_in_background(cropper, source).await;
        self.handle(SessionEvent::CropFinished(outcome))
    }

    /// 记录保存结果并推进状态，保存结果原样返回给调用方。
    pub fn record_save(
        &mut self,
        saved: Result<PathBuf, AppError>,
    ) -> Result<PathBuf, AppError> {
        match saved {
            Ok(path) => {
                self.handle(SessionEvent::SaveFinished(Ok(path.clone())))?;
                Ok(path)
            }
            Err(err) => {
                self.handle(SessionEvent::SaveFinished(Err(err.to_string())))?;
                Err(err)
            }
        }
    }
}

/// 在阻塞线程池中加载并裁剪一张图片。
pub async fn crop_in_background(
    cropper: Arc<BoundaryCropper>,
    source: ImageSource,
) -> Result<Bitmap, AppError> {
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        let bitmap = cropper.load(source)?;
        cropper.crop(&bitmap)
    })
    .await
    .map_err(|e| AppError::Session(format!("后台裁剪任务异常退出：{}", e)))?;

    log::info!("⏱️ 后台裁剪耗时 {}ms", start.elapsed().as_millis());
    Ok(result?)
}
