//! 캡처 세션: 일시정지된 프레임 하나에 대한 크롭 저장 트랜잭션.
//!
//! 저장 한 번의 흐름:
//!
//! ```text
//! 선택 검증 → 로그 검증 → 중복 검사/축출(+레코드 정리) → 인덱스 선택 → 크롭 기록
//!   → 윈도우 레코드 생성 → 교차 정리 → 로그 추가
//! ```
//!
//! 손상된 로그가 하나라도 있으면 파일과 로그 어느 것도 바꾸지 않는다.
//! 크롭 기록이 실패하면 메타데이터는 전혀 쓰지 않는다.
//! 크롭 인덱스는 디스크에 이미 있는 같은 프레임/영상의 인덱스를 피해 고른다.
//! 같은 영상에 대해 동시에 진행되는 저장은 [`InFlightRegistry`]가 거부한다.

use painlabel_core::error::CoreError;
use painlabel_core::identity::{
    build_crop_path, derive_frame_number, parse_crop_index, CropPath, FrameNumber,
};
use painlabel_core::models::category::Category;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::models::selection::CropSelection;
use painlabel_core::ports::playback::PlaybackSource;
use painlabel_storage::window::build_window_records;
use painlabel_vision::crop::extract_crop;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::wiring::AnnotationServices;

/// 영상별 진행 중 캡처 목록
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    videos: Arc<Mutex<HashSet<String>>>,
}

/// 진행 중 표시. 드롭되면 해제된다.
#[derive(Debug)]
pub struct InFlightGuard {
    videos: Arc<Mutex<HashSet<String>>>,
    video_name: String,
}

impl InFlightRegistry {
    /// 영상에 대한 캡처 시작. 이미 진행 중이면 `CaptureInProgress`.
    pub fn try_begin(&self, video_name: &str) -> Result<InFlightGuard, CoreError> {
        if !self.videos.lock().insert(video_name.to_string()) {
            return Err(CoreError::CaptureInProgress(video_name.to_string()));
        }
        Ok(InFlightGuard {
            videos: Arc::clone(&self.videos),
            video_name: video_name.to_string(),
        })
    }

    pub fn is_busy(&self, video_name: &str) -> bool {
        self.videos.lock().contains(video_name)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.videos.lock().remove(&self.video_name);
    }
}

/// 저장 한 번의 결과
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// 기록된 크롭 경로
    pub path: CropPath,
    pub frame_number: FrameNumber,
    /// 로그에 추가된 레코드 수 (FPS 미상이면 0)
    pub records_written: usize,
    /// 같은 픽셀의 기존 크롭을 축출하고 대체했는지
    pub superseded: bool,
    /// 축출된 크롭의 루트 기준 경로
    pub evicted: Option<String>,
    /// 정리된 기존 레코드 수 (축출된 크롭 참조 + 교차 카테고리 중복)
    pub stale_records_removed: usize,
}

/// 일시정지된 프레임 하나에 대한 캡처 세션
pub struct CaptureSession {
    services: AnnotationServices,
    video_name: String,
    current_time_ms: u64,
    fps: f64,
    frame: PixelBuffer,
    crop_index: u32,
    layout_ready: bool,
}

impl CaptureSession {
    /// 재생 소스에서 현재 프레임을 받아 세션 시작
    pub async fn open(
        services: AnnotationServices,
        playback: &dyn PlaybackSource,
    ) -> Result<Self, CoreError> {
        let frame = playback.snapshot_frame().await?;
        debug!(
            "캡처 세션 시작: {} @ {}ms ({}x{})",
            playback.video_name(),
            playback.current_time_ms(),
            frame.width(),
            frame.height()
        );

        Ok(Self {
            services,
            video_name: playback.video_name().to_string(),
            current_time_ms: playback.current_time_ms(),
            fps: playback.fps(),
            frame,
            crop_index: 0,
            layout_ready: false,
        })
    }

    pub fn video_name(&self) -> &str {
        &self.video_name
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn frame_number(&self) -> FrameNumber {
        derive_frame_number(self.current_time_ms, self.fps)
    }

    /// 마지막으로 사용한 크롭 인덱스 (아직 저장 전이면 0)
    pub fn crop_index(&self) -> u32 {
        self.crop_index
    }

    /// 선택 영역을 카테고리에 저장
    pub async fn save(
        &mut self,
        category_name: &str,
        selection: CropSelection,
    ) -> Result<CaptureOutcome, CoreError> {
        let services = self.services.clone();
        let category = services.categories.get(category_name)?.clone();
        selection.validate(self.frame.width(), self.frame.height())?;

        let _in_flight = services.in_flight.try_begin(&self.video_name)?;

        services
            .crop_store
            .ensure_category_directory(&category)
            .await?;
        if !self.layout_ready {
            services.crop_store.ensure_augmentation_layout().await?;
            self.layout_ready = true;
        }

        let crop = extract_crop(&self.frame, &selection)?;

        // 1. 축출/정리가 어느 카테고리든 건드릴 수 있으므로 전체 로그를 먼저 검증
        services
            .record_log
            .verify_logs(services.categories.as_slice())
            .await?;

        // 2. 중복 검사. 동일 픽셀 크롭은 축출하고 그 파일을 가리키던 레코드도 제거
        let evicted = services
            .detector
            .check_and_evict_duplicate(&crop, &self.video_name, services.categories.as_slice())
            .await?;
        let mut evicted_records_removed = 0;
        if let Some(old_path) = &evicted {
            evicted_records_removed = services
                .record_log
                .delete_records_by_path(old_path)
                .await?;
        }
        let superseded = evicted.is_some();

        let frame_number = self.frame_number();
        self.crop_index = self
            .next_crop_index(&category, frame_number, superseded)
            .await?;
        let path = build_crop_path(&category, &self.video_name, frame_number, self.crop_index);

        // 3. 크롭 기록
        if let Err(e) = services.crop_store.write_crop(&path, &crop).await {
            error!("크롭 저장 실패, 메타데이터 기록 생략: {}: {e}", path.record_path());
            return Err(e);
        }

        // 4. 윈도우 레코드
        let Some(capture_frame) = frame_number.known() else {
            warn!(
                "FPS 미상, 메타데이터 윈도우 생략: {} ({})",
                path.record_path(),
                self.fps
            );
            return Ok(CaptureOutcome {
                path,
                frame_number,
                records_written: 0,
                superseded,
                evicted,
                stale_records_removed: evicted_records_removed,
            });
        };
        let records = build_window_records(
            capture_frame,
            selection.coordinates(),
            &self.video_name,
            &path.record_path(),
            services.window_radius,
        );
        if records.is_empty() {
            warn!("윈도우 레코드 없음: {} (프레임 {})", path.record_path(), capture_frame);
        }

        // 5. 교차 카테고리 정리 후 추가
        let reconciled = services
            .record_log
            .reconcile_against_existing(&records, &services.reconcile_categories)
            .await?;
        services
            .record_log
            .append_records(&category, &reconciled.records)
            .await?;

        let stale_records_removed = evicted_records_removed + reconciled.removed_from_existing;
        info!(
            "크롭 저장: {} (레코드 {}개, 대체={}, 정리 {}개)",
            path.record_path(),
            reconciled.records.len(),
            superseded,
            stale_records_removed
        );

        Ok(CaptureOutcome {
            path,
            frame_number,
            records_written: reconciled.records.len(),
            superseded,
            evicted,
            stale_records_removed,
        })
    }

    /// 이번 저장에 쓸 크롭 인덱스.
    ///
    /// 대체 저장은 현재 인덱스를 재사용하되, 그 이름이 디스크에 있으면
    /// 새 저장처럼 디스크/세션 최대값 다음 인덱스를 쓴다.
    async fn next_crop_index(
        &self,
        category: &Category,
        frame_number: FrameNumber,
        superseded: bool,
    ) -> Result<u32, CoreError> {
        let taken: HashSet<u32> = self
            .services
            .crop_store
            .list_crop_files(category)
            .await?
            .iter()
            .filter_map(|name| parse_crop_index(name, &self.video_name, frame_number))
            .collect();

        if superseded && !taken.contains(&self.crop_index) {
            return Ok(self.crop_index);
        }

        let highest = taken
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(self.crop_index);
        if !taken.is_empty() {
            debug!("{}: 기존 크롭 인덱스 {}까지 사용 중", category, highest);
        }
        highest
            .checked_add(1)
            .ok_or_else(|| CoreError::Internal(format!("{}: 크롭 인덱스 한계 초과", category)))
    }
}
