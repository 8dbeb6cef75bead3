//! 비전(픽셀 내용) 포트.
//!
//! 구현: `painlabel-vision` crate (image, sha2)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::category::Category;
use crate::models::pixels::PixelBuffer;

/// 내용 해시 기반 중복 크롭 감지기
#[async_trait]
pub trait DuplicateDetector: Send + Sync {
    /// `categories` 디렉토리에서 `crop`과 픽셀이 동일한 파일을 찾아 삭제.
    ///
    /// `video_name`을 파일명에 포함하는 후보만 비교한다.
    /// 삭제한 파일의 루트 기준 경로(레코드 `caminho`와 같은 형식)를 반환한다.
    /// 중복이 없으면 `None`.
    /// 디코딩할 수 없는 후보는 로그만 남기고 건너뛴다.
    async fn check_and_evict_duplicate(
        &self,
        crop: &PixelBuffer,
        video_name: &str,
        categories: &[Category],
    ) -> Result<Option<String>, CoreError>;
}
