//! 저장된 크롭 조회/삭제.
//!
//! 크롭 파일을 직접 지울 때는 항상 레코드 로그도 함께 정리한다.

use painlabel_core::error::CoreError;
use painlabel_core::models::category::{Category, CategorySet};
use painlabel_core::ports::storage::{CropStore, RecordLog};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 카테고리 하나의 크롭 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub category: Category,
    /// 파일명 (이름순)
    pub files: Vec<String>,
}

impl CategoryListing {
    /// 레코드 `caminho`와 같은 형식의 루트 기준 경로
    pub fn record_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| {
                Path::new(self.category.as_str())
                    .join(f)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

/// 크롭 삭제 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub file_removed: bool,
    /// 파일 삭제 실패 사유 (레코드 정리는 계속 진행됨)
    pub file_error: Option<String>,
    pub records_removed: usize,
}

pub struct CropBrowser {
    crop_store: Arc<dyn CropStore>,
    record_log: Arc<dyn RecordLog>,
    categories: CategorySet,
}

impl CropBrowser {
    pub fn new(
        crop_store: Arc<dyn CropStore>,
        record_log: Arc<dyn RecordLog>,
        categories: CategorySet,
    ) -> Self {
        Self {
            crop_store,
            record_log,
            categories,
        }
    }

    /// 영상 이름을 포함하는 크롭을 카테고리별로 나열
    pub async fn list_for_video(&self, video_name: &str) -> Result<Vec<CategoryListing>, CoreError> {
        let mut listings = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let files = self
                .crop_store
                .list_crop_files(category)
                .await?
                .into_iter()
                .filter(|f| f.contains(video_name))
                .collect();
            listings.push(CategoryListing {
                category: category.clone(),
                files,
            });
        }
        Ok(listings)
    }

    /// 크롭 파일 삭제 후 해당 경로를 참조하는 레코드 제거
    pub async fn delete_crop(&self, relative_path: &str) -> Result<DeleteOutcome, CoreError> {
        let file_error = match self.crop_store.remove_crop(relative_path).await {
            Ok(()) => None,
            Err(e) => {
                warn!("크롭 파일 삭제 실패, 레코드 정리는 계속: {relative_path}: {e}");
                Some(e.to_string())
            }
        };

        let records_removed = self.record_log.delete_records_by_path(relative_path).await?;
        info!(
            "크롭 삭제 처리: {} (레코드 {}개 제거)",
            relative_path, records_removed
        );

        Ok(DeleteOutcome {
            file_removed: file_error.is_none(),
            file_error,
            records_removed,
        })
    }
}
