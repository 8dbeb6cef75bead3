//! 재생 엔진 경계 포트.
//!
//! 실제 미디어 재생(열기/탐색/속도)은 외부 엔진 책임.
//! 코어는 현재 시각, FPS, 현재 프레임 픽셀만 요구한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::pixels::PixelBuffer;

/// 일시정지된 재생 상태에서 캡처에 필요한 정보 제공
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// 영상 이름 (크롭 파일명/레코드에 사용)
    fn video_name(&self) -> &str;

    /// 현재 재생 시각 (ms)
    fn current_time_ms(&self) -> u64;

    /// 초당 프레임 수 (알 수 없으면 0 이하)
    fn fps(&self) -> f64;

    /// 현재 프레임 픽셀
    async fn snapshot_frame(&self) -> Result<PixelBuffer, CoreError>;
}
