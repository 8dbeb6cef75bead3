//! 저장소 디렉토리 구조.
//!
//! ```text
//! <root>/
//!     <카테고리>/frame_<N>_<영상>_<인덱스>.png
//!     Augmentation/
//!         <카테고리>/Augmentation_<카테고리>.json
//! ```

use painlabel_core::config::AppConfig;
use painlabel_core::models::category::Category;
use std::path::{Path, PathBuf};

/// 루트 기준 경로 규칙
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
    augmentation_dir_name: String,
}

impl StorageLayout {
    pub fn new(root: PathBuf, augmentation_dir_name: impl Into<String>) -> Self {
        Self {
            root,
            augmentation_dir_name: augmentation_dir_name.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.storage.root_dir.clone(),
            config.storage.augmentation_dir_name.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 카테고리 이미지 디렉토리
    pub fn category_dir(&self, category: &Category) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Augmentation 루트 디렉토리
    pub fn augmentation_root(&self) -> PathBuf {
        self.root.join(&self.augmentation_dir_name)
    }

    /// 카테고리 로그 디렉토리
    pub fn log_dir(&self, category: &Category) -> PathBuf {
        self.augmentation_root().join(category.as_str())
    }

    /// 카테고리 JSON 로그 파일
    pub fn log_path(&self, category: &Category) -> PathBuf {
        self.log_dir(category).join(category.log_file_name())
    }

    /// 루트 기준 상대 경로 해석
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}
