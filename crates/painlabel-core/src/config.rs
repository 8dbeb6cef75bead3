//! 애플리케이션 설정 구조체.
//!
//! 저장소 루트, 카테고리 목록, 메타데이터 윈도우 정책 등 런타임 설정.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;
use crate::models::category::{Category, CategorySet, DEFAULT_CATEGORIES};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 분류 카테고리 (순서 유지, 디렉토리 이름으로 사용)
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// 메타데이터(Augmentation) 설정
    #[serde(default)]
    pub annotation: AnnotationConfig,
    /// 프레임 캡처 설정
    #[serde(default)]
    pub capture: CaptureConfig,
}

// ============================================================
// 저장소 설정
// ============================================================

/// 저장소 설정. 카테고리 디렉토리와 Augmentation 디렉토리의 위치
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 저장소 루트 (기본: 현재 작업 디렉토리)
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// 메타데이터 로그 루트 디렉토리 이름
    #[serde(default = "default_augmentation_dir_name")]
    pub augmentation_dir_name: String,
    /// 크롭 파일로 인정하는 확장자 (소문자, 점 제외)
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            augmentation_dir_name: default_augmentation_dir_name(),
            image_extensions: default_image_extensions(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_augmentation_dir_name() -> String {
    "Augmentation".to_string()
}

fn default_image_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string()]
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

// ============================================================
// 메타데이터 설정
// ============================================================

/// 캡처 주변 프레임 윈도우 및 교차 카테고리 정리 정책
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// 캡처 프레임 앞뒤로 레코드를 생성할 프레임 수
    #[serde(default = "default_window_radius")]
    pub window_radius: u32,
    /// 저장 시 중복 레코드를 정리할 카테고리 (None이면 전체)
    #[serde(default)]
    pub reconcile_categories: Option<Vec<String>>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            window_radius: default_window_radius(),
            reconcile_categories: None,
        }
    }
}

fn default_window_radius() -> u32 {
    10
}

// ============================================================
// 캡처 설정
// ============================================================

/// 재생 엔진 스냅샷 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 재생 엔진이 현재 프레임을 떨구는 임시 파일명
    #[serde(default = "default_snapshot_file_name")]
    pub snapshot_file_name: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snapshot_file_name: default_snapshot_file_name(),
        }
    }
}

fn default_snapshot_file_name() -> String {
    "temp_frame.png".to_string()
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            categories: default_categories(),
            annotation: AnnotationConfig::default(),
            capture: CaptureConfig::default(),
        }
    }

    /// 설정 전체 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let set = self.category_set()?;
        self.reconcile_set_from(&set)?;
        Category::new(self.storage.augmentation_dir_name.clone()).map_err(|e| {
            CoreError::Config(format!("augmentation_dir_name 사용 불가: {e}"))
        })?;
        if set
            .iter()
            .any(|c| c.as_str() == self.storage.augmentation_dir_name)
        {
            return Err(CoreError::Config(format!(
                "카테고리 이름이 Augmentation 디렉토리와 겹침: {}",
                self.storage.augmentation_dir_name
            )));
        }
        if self.storage.image_extensions.is_empty() {
            return Err(CoreError::Config("image_extensions가 비어 있음".to_string()));
        }
        if self.annotation.window_radius == 0 {
            return Err(CoreError::Config("window_radius는 1 이상이어야 함".to_string()));
        }
        Ok(())
    }

    /// 설정된 카테고리 집합
    pub fn category_set(&self) -> Result<CategorySet, CoreError> {
        CategorySet::from_names(&self.categories)
            .map_err(|e| CoreError::Config(format!("카테고리 설정 오류: {e}")))
    }

    /// 교차 카테고리 정리 대상 (미지정 시 전체 카테고리)
    pub fn reconcile_set(&self) -> Result<Vec<Category>, CoreError> {
        let set = self.category_set()?;
        self.reconcile_set_from(&set)
    }

    fn reconcile_set_from(&self, set: &CategorySet) -> Result<Vec<Category>, CoreError> {
        match &self.annotation.reconcile_categories {
            Some(names) => set
                .subset(names)
                .map_err(|e| CoreError::Config(format!("reconcile_categories 오류: {e}"))),
            None => Ok(set.as_slice().to_vec()),
        }
    }

    /// 소문자로 정규화된 이미지 확장자
    pub fn image_extensions(&self) -> Vec<String> {
        self.storage
            .image_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }
}
