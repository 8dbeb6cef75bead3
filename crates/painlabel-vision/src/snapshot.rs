//! 재생 엔진 스냅샷 로드.
//!
//! 재생 엔진은 현재 프레임을 임시 파일로 떨구고, 코어는 그 파일을 읽은 뒤
//! 반드시 지운다 (디코딩 실패 시에도).

use async_trait::async_trait;
use painlabel_core::error::CoreError;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::ports::playback::PlaybackSource;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::crop::decode_file;

/// 스냅샷 임시 파일을 디코딩하고 삭제한다.
///
/// # Arguments
/// * `snapshot_path` - 재생 엔진이 기록한 임시 파일
/// * `video_width`, `video_height` - 재생 엔진이 보고한 영상 크기 (0이면 재생 전)
pub async fn load_snapshot(
    snapshot_path: &Path,
    video_width: u32,
    video_height: u32,
) -> Result<PixelBuffer, CoreError> {
    if video_width == 0 || video_height == 0 {
        return Err(CoreError::validation(
            "video",
            "로드된 영상이 없거나 재생이 아직 시작되지 않음",
        ));
    }
    if !tokio::fs::try_exists(snapshot_path).await? {
        return Err(CoreError::NotFound {
            resource_type: "Snapshot".to_string(),
            id: snapshot_path.display().to_string(),
        });
    }

    let owned = snapshot_path.to_path_buf();
    let decoded = tokio::task::spawn_blocking(move || decode_file(&owned))
        .await
        .map_err(|e| CoreError::Internal(format!("스냅샷 디코딩 작업 실패: {e}")))?;

    if let Err(e) = tokio::fs::remove_file(snapshot_path).await {
        warn!("스냅샷 임시 파일 삭제 실패: {}: {e}", snapshot_path.display());
    }

    let frame = decoded?;
    debug!(
        "스냅샷 로드: {}x{} ({})",
        frame.width(),
        frame.height(),
        snapshot_path.display()
    );
    Ok(frame)
}

/// 정지 이미지 한 장을 현재 프레임으로 제공하는 재생 소스.
///
/// CLI 캡처와 테스트에서 외부 재생 엔진 대신 사용한다. 원본 파일은 지우지 않는다.
#[derive(Debug, Clone)]
pub struct StillFramePlayback {
    video_name: String,
    current_time_ms: u64,
    fps: f64,
    frame_path: PathBuf,
}

impl StillFramePlayback {
    pub fn new(
        video_name: impl Into<String>,
        current_time_ms: u64,
        fps: f64,
        frame_path: PathBuf,
    ) -> Self {
        Self {
            video_name: video_name.into(),
            current_time_ms,
            fps,
            frame_path,
        }
    }
}

#[async_trait]
impl PlaybackSource for StillFramePlayback {
    fn video_name(&self) -> &str {
        &self.video_name
    }

    fn current_time_ms(&self) -> u64 {
        self.current_time_ms
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    async fn snapshot_frame(&self) -> Result<PixelBuffer, CoreError> {
        let path = self.frame_path.clone();
        tokio::task::spawn_blocking(move || decode_file(&path))
            .await
            .map_err(|e| CoreError::Internal(format!("프레임 디코딩 작업 실패: {e}")))?
    }
}

/// 재생 엔진이 떨군 스냅샷 파일을 현재 프레임으로 쓰는 재생 소스.
///
/// 프레임을 읽을 때마다 [`load_snapshot`]으로 디코딩하고 파일을 지운다.
#[derive(Debug, Clone)]
pub struct SnapshotPlayback {
    video_name: String,
    current_time_ms: u64,
    fps: f64,
    snapshot_path: PathBuf,
    video_size: (u32, u32),
}

impl SnapshotPlayback {
    pub fn new(
        video_name: impl Into<String>,
        current_time_ms: u64,
        fps: f64,
        snapshot_path: PathBuf,
        video_size: (u32, u32),
    ) -> Self {
        Self {
            video_name: video_name.into(),
            current_time_ms,
            fps,
            snapshot_path,
            video_size,
        }
    }
}

#[async_trait]
impl PlaybackSource for SnapshotPlayback {
    fn video_name(&self) -> &str {
        &self.video_name
    }

    fn current_time_ms(&self) -> u64 {
        self.current_time_ms
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    async fn snapshot_frame(&self) -> Result<PixelBuffer, CoreError> {
        let (width, height) = self.video_size;
        load_snapshot(&self.snapshot_path, width, height).await
    }
}
