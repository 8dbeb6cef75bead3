//! # painlabel
//!
//! 통증 강도 프레임 라벨링 CLI.
//! 설정 로드, 어댑터 와이어링 후 하위 명령 하나를 실행한다.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use painlabel_app::capture::CaptureSession;
use painlabel_app::wiring::AnnotationServices;
use painlabel_core::config::AppConfig;
use painlabel_core::config_manager::ConfigManager;
use painlabel_core::models::selection::CropSelection;
use painlabel_core::ports::playback::PlaybackSource;
use painlabel_vision::snapshot::{SnapshotPlayback, StillFramePlayback};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 영상 프레임 크롭을 통증 카테고리별로 저장하고 증강용 메타데이터를 기록한다
#[derive(Parser, Debug)]
#[command(name = "painlabel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 저장소 루트 (설정의 storage.root_dir 대신 사용)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 카테고리 디렉토리와 Augmentation 구조 생성
    Init,
    /// 현재 프레임의 선택 영역을 카테고리에 저장
    Capture(CaptureArgs),
    /// 영상의 저장된 크롭을 카테고리별로 나열
    List {
        #[arg(long)]
        video: String,
    },
    /// 크롭 파일과 이를 참조하는 레코드 삭제
    Delete {
        /// 루트 기준 경로 (예: "Indolor/frame_50_video_1.png")
        path: String,
    },
}

#[derive(clap::Args, Debug)]
struct CaptureArgs {
    #[arg(long)]
    video: String,

    /// 현재 프레임 이미지 (생략 시 재생 엔진 스냅샷 파일을 읽고 삭제)
    #[arg(long)]
    frame_image: Option<PathBuf>,

    /// 스냅샷 사용 시 영상 너비
    #[arg(long, default_value_t = 0)]
    video_width: u32,

    /// 스냅샷 사용 시 영상 높이
    #[arg(long, default_value_t = 0)]
    video_height: u32,

    /// 현재 재생 시각 (ms)
    #[arg(long)]
    time_ms: u64,

    /// 초당 프레임 수 (0이면 미상)
    #[arg(long, default_value_t = 0.0)]
    fps: f64,

    #[arg(long)]
    category: String,

    #[arg(long)]
    x1: u32,
    #[arg(long)]
    y1: u32,
    #[arg(long)]
    x2: u32,
    #[arg(long)]
    y2: u32,

    /// 좌표를 드래그 시작/끝 점으로 보고 정사각형으로 정규화
    #[arg(long)]
    from_drag: bool,
}

impl CaptureArgs {
    fn selection(&self) -> CropSelection {
        if self.from_drag {
            CropSelection::from_drag((self.x1, self.y1), (self.x2, self.y2))
        } else {
            CropSelection::new(self.x1, self.y1, self.x2, self.y2)
        }
    }

    fn playback(&self, config: &AppConfig) -> Box<dyn PlaybackSource> {
        match &self.frame_image {
            Some(path) => Box::new(StillFramePlayback::new(
                self.video.clone(),
                self.time_ms,
                self.fps,
                path.clone(),
            )),
            None => Box::new(SnapshotPlayback::new(
                self.video.clone(),
                self.time_ms,
                self.fps,
                config
                    .storage
                    .root_dir
                    .join(&config.capture.snapshot_file_name),
                (self.video_width, self.video_height),
            )),
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    debug!("설정 파일: {}", manager.config_path().display());

    let mut config = manager.get();
    if let Some(root) = &args.root {
        config.storage.root_dir = root.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run_capture(
    services: AnnotationServices,
    config: &AppConfig,
    args: &CaptureArgs,
) -> Result<()> {
    let playback = args.playback(config);
    let mut session = CaptureSession::open(services, playback.as_ref()).await?;
    let outcome = session.save(&args.category, args.selection()).await?;

    println!("저장: {}", outcome.path.record_path());
    println!("  프레임: {}", outcome.frame_number);
    println!("  레코드: {}개", outcome.records_written);
    if let Some(old_path) = &outcome.evicted {
        println!("  동일 크롭을 대체함: {old_path}");
    }
    if outcome.stale_records_removed > 0 {
        println!("  기존 레코드 {}개 정리", outcome.stale_records_removed);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "painlabel={},painlabel_app={},painlabel_core={},painlabel_vision={},painlabel_storage={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(&args)?;
    let services = AnnotationServices::from_config(&config)?;
    info!("저장소 루트: {}", config.storage.root_dir.display());

    match &args.command {
        Command::Init => {
            let created = services.initialize_layout().await?;
            if created {
                println!("Augmentation 구조 생성 완료");
            } else {
                println!("Augmentation 구조가 이미 존재함");
            }
        }
        Command::Capture(capture) => run_capture(services, &config, capture).await?,
        Command::List { video } => {
            let listings = services.browser().list_for_video(video).await?;
            for listing in &listings {
                println!("[{}] {}개", listing.category, listing.files.len());
                for path in listing.record_paths() {
                    println!("  {path}");
                }
            }
        }
        Command::Delete { path } => {
            let outcome = services.browser().delete_crop(path).await?;
            println!("레코드 {}개 제거", outcome.records_removed);
            if let Some(reason) = outcome.file_error {
                return Err(anyhow!("파일 삭제 실패 ({path}): {reason}"));
            }
        }
    }

    Ok(())
}
