//! 로컬 저장소 포트.
//!
//! 구현: `painlabel-storage` crate (파일 시스템 + JSON)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::identity::CropPath;
use crate::models::category::Category;
use crate::models::pixels::PixelBuffer;
use crate::models::record::Record;

/// 카테고리별 크롭 이미지 디렉토리
#[async_trait]
pub trait CropStore: Send + Sync {
    /// 카테고리 이미지 디렉토리 생성 (멱등)
    async fn ensure_category_directory(&self, category: &Category) -> Result<(), CoreError>;

    /// Augmentation 루트와 카테고리별 빈 로그 생성.
    ///
    /// 루트가 이미 있으면 아무것도 하지 않는다. 새로 만들었으면 `true`.
    async fn ensure_augmentation_layout(&self) -> Result<bool, CoreError>;

    /// 크롭 픽셀을 `path`에 기록. 같은 경로의 파일이 이미 있으면 덮어쓰지 않고 에러.
    async fn write_crop(&self, path: &CropPath, crop: &PixelBuffer) -> Result<(), CoreError>;

    /// 카테고리 디렉토리의 이미지 파일명 목록 (인식 가능한 확장자만, 이름순)
    async fn list_crop_files(&self, category: &Category) -> Result<Vec<String>, CoreError>;

    /// 루트 기준 상대 경로의 크롭 파일 삭제
    async fn remove_crop(&self, relative_path: &str) -> Result<(), CoreError>;
}

/// 교차 카테고리 정리 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// 배치 내부 중복이 제거된 신규 레코드
    pub records: Vec<Record>,
    /// 기존 로그에서 제거된 레코드 수
    pub removed_from_existing: usize,
}

impl ReconcileOutcome {
    pub fn removed_any(&self) -> bool {
        self.removed_from_existing > 0
    }
}

/// 카테고리별 JSON 메타데이터 로그
#[async_trait]
pub trait RecordLog: Send + Sync {
    /// 카테고리 로그 전체 로드 (파일 없음/빈 파일 → 빈 목록)
    async fn load(&self, category: &Category) -> Result<Vec<Record>, CoreError>;

    /// 레코드를 카테고리 로그 끝에 추가
    async fn append_records(&self, category: &Category, records: &[Record])
        -> Result<(), CoreError>;

    /// `categories` 로그를 모두 읽어 파싱 가능한지 확인. 아무것도 쓰지 않는다.
    async fn verify_logs(&self, categories: &[Category]) -> Result<(), CoreError>;

    /// `categories` 로그에서 신규 레코드와 식별자가 같은 기존 레코드 제거.
    ///
    /// 모든 로그를 먼저 읽고 파싱한 뒤 변경된 로그만 다시 쓴다.
    /// 하나라도 `CorruptLog`이면 어떤 로그도 쓰지 않는다.
    async fn reconcile_against_existing(
        &self,
        new_records: &[Record],
        categories: &[Category],
    ) -> Result<ReconcileOutcome, CoreError>;

    /// 모든 카테고리 로그에서 `path`를 참조하는 레코드 제거. 제거된 수 반환.
    ///
    /// 로그 하나라도 파싱할 수 없으면 어떤 로그도 쓰지 않는다.
    async fn delete_records_by_path(&self, path: &str) -> Result<usize, CoreError>;
}
