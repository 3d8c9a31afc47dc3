//! # screencrop — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与会话驱动。
//! 裁剪逻辑位于 `cropper` 模块，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use screencrop::cropper::{BoundaryCropper, ImageSource};
use screencrop::error::AppError;
use screencrop::session::{CropSession, SessionEvent, SessionState};
use screencrop::settings::{AppSettings, SETTINGS_FILE_NAME};
use screencrop::storage::{self, OutputFormat};

/// Crop a photo to the band bounded by its light background and save the result
#[derive(Parser, Debug)]
#[command(name = "screencrop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image file to crop
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (overrides the settings file)
    #[arg(long, value_name = "DIR")]
    out: Option<String>,

    /// Settings file
    #[arg(long, value_name = "FILE", default_value = SETTINGS_FILE_NAME)]
    settings: PathBuf,

    /// Output format: png or jpeg (overrides the settings file)
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(path) => {
            println!("saved {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("❌ {}", err);
            eprintln!("processing failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<PathBuf, AppError> {
    let settings = AppSettings::load(&cli.settings)?;
    let cropper = Arc::new(BoundaryCropper::new(settings.to_crop_config()?)?);
    let format = match cli.format.as_deref() {
        Some(name) => OutputFormat::parse(name)?,
        None => settings.output_format()?,
    };
    let output_dir = cli.out.as_deref().or(settings.output_dir.as_deref());

    let mut session = CropSession::new();
    session.handle(SessionEvent::OpenPicker)?;
    log::info!("📂 已选择图片: {}", cli.input.display());

    let saved = match session
        .process_selected(cropper, ImageSource::FilePath(cli.input))
        .await?
    {
        SessionState::Ready { result, .. } => storage::resolve_output_dir(output_dir)
            .and_then(|dir| storage::save_bitmap(result, &dir, format)),
        SessionState::Failed(message) => {
            return Err(AppError::Session(format!("裁剪失败: {}", message)));
        }
        other => {
            return Err(AppError::Session(format!("意外的会话状态: {}", other.name())));
        }
    };

    session.record_save(saved)
}
