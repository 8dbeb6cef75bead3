//! 어댑터 와이어링.
//!
//! `AppConfig` 하나로 저장소/비전 어댑터를 만들고 `Arc<dyn Port>`로 묶는다.

use painlabel_core::config::AppConfig;
use painlabel_core::error::CoreError;
use painlabel_core::models::category::{Category, CategorySet};
use painlabel_core::ports::storage::{CropStore, RecordLog};
use painlabel_core::ports::vision::DuplicateDetector;
use painlabel_storage::category_store::FsCropStore;
use painlabel_storage::layout::StorageLayout;
use painlabel_storage::record_log::JsonRecordLog;
use painlabel_vision::dedup::ContentDeduplicator;
use std::sync::Arc;
use tracing::debug;

use crate::browser::CropBrowser;
use crate::capture::InFlightRegistry;

/// 캡처 세션과 브라우저가 공유하는 서비스 묶음
#[derive(Clone)]
pub struct AnnotationServices {
    pub crop_store: Arc<dyn CropStore>,
    pub record_log: Arc<dyn RecordLog>,
    pub detector: Arc<dyn DuplicateDetector>,
    pub categories: CategorySet,
    /// 저장 시 교차 카테고리 정리 대상
    pub reconcile_categories: Vec<Category>,
    pub window_radius: u32,
    pub in_flight: InFlightRegistry,
}

impl AnnotationServices {
    /// 검증된 설정으로 파일 시스템 어댑터 생성
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let layout = StorageLayout::from_config(config);
        let categories = config.category_set()?;
        let extensions = config.image_extensions();

        let crop_store = Arc::new(FsCropStore::new(
            layout.clone(),
            categories.clone(),
            extensions.clone(),
        ));
        let record_log = Arc::new(JsonRecordLog::new(layout.clone(), categories.clone()));
        let detector = Arc::new(ContentDeduplicator::new(
            layout.root().to_path_buf(),
            extensions,
        ));

        debug!(
            "어댑터 와이어링 완료: root={}, {}개 카테고리",
            layout.root().display(),
            categories.len()
        );

        Ok(Self {
            crop_store,
            record_log,
            detector,
            reconcile_categories: config.reconcile_set()?,
            categories,
            window_radius: config.annotation.window_radius,
            in_flight: InFlightRegistry::default(),
        })
    }

    /// 같은 어댑터를 공유하는 크롭 브라우저
    pub fn browser(&self) -> CropBrowser {
        CropBrowser::new(
            Arc::clone(&self.crop_store),
            Arc::clone(&self.record_log),
            self.categories.clone(),
        )
    }

    /// 카테고리 디렉토리와 Augmentation 구조 생성. 구조를 새로 만들었으면 `true`.
    pub async fn initialize_layout(&self) -> Result<bool, CoreError> {
        for category in &self.categories {
            self.crop_store.ensure_category_directory(category).await?;
        }
        self.crop_store.ensure_augmentation_layout().await
    }
}
