//! 카테고리별 크롭 이미지 저장소.
//!
//! 카테고리마다 같은 이름의 디렉토리에 PNG 크롭을 저장/조회/삭제하고,
//! 최초 캡처 시 Augmentation 디렉토리 구조를 만든다.

use async_trait::async_trait;
use image::{ImageError, ImageFormat, RgbImage};
use painlabel_core::error::CoreError;
use painlabel_core::identity::{has_image_extension, CropPath};
use painlabel_core::models::category::{Category, CategorySet};
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::ports::storage::CropStore;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::layout::StorageLayout;

/// 빈 레코드 로그 내용
const EMPTY_LOG: &str = "[]";

/// 파일 시스템 크롭 저장소 (`CropStore` 구현)
pub struct FsCropStore {
    layout: StorageLayout,
    categories: CategorySet,
    extensions: Vec<String>,
}

impl FsCropStore {
    /// # Arguments
    /// * `layout` - 루트 기준 경로 규칙
    /// * `categories` - Augmentation 구조를 만들 카테고리 집합
    /// * `extensions` - 목록 조회 시 인정할 이미지 확장자 (소문자)
    pub fn new(layout: StorageLayout, categories: CategorySet, extensions: Vec<String>) -> Self {
        Self {
            layout,
            categories,
            extensions,
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}

/// 저장소 루트를 벗어나지 않는 상대 경로인지 검증
fn checked_relative(relative_path: &str) -> Result<PathBuf, CoreError> {
    let path = Path::new(relative_path);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if relative_path.is_empty() || escapes {
        return Err(CoreError::validation(
            "path",
            format!("저장소 상대 경로가 아님: {relative_path}"),
        ));
    }
    Ok(path.to_path_buf())
}

fn image_error(path: &Path, e: ImageError) -> CoreError {
    match e {
        ImageError::IoError(io) => CoreError::Io(io),
        other => CoreError::Image(format!("{}: {other}", path.display())),
    }
}

/// 임시 파일에 PNG로 쓴 뒤 이름을 바꾼다 (부분 기록된 크롭이 남지 않도록).
/// 대상 파일이 이미 있으면 `AlreadyExists`로 거부한다.
fn write_png(target: &Path, image: &RgbImage) -> Result<(), CoreError> {
    if target.try_exists()? {
        return Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("크롭 파일이 이미 존재함: {}", target.display()),
        )
        .into());
    }
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CoreError::validation("path", format!("파일명 없음: {}", target.display())))?;
    let partial = target.with_file_name(format!(".{file_name}.partial"));

    if let Err(e) = image.save_with_format(&partial, ImageFormat::Png) {
        if let Err(cleanup) = std::fs::remove_file(&partial) {
            if cleanup.kind() != ErrorKind::NotFound {
                warn!("부분 파일 정리 실패: {}: {cleanup}", partial.display());
            }
        }
        return Err(image_error(target, e));
    }
    std::fs::rename(&partial, target)?;
    Ok(())
}

#[async_trait]
impl CropStore for FsCropStore {
    async fn ensure_category_directory(&self, category: &Category) -> Result<(), CoreError> {
        let dir = self.layout.category_dir(category);
        fs::create_dir_all(&dir).await?;
        debug!("카테고리 디렉토리 확인: {}", dir.display());
        Ok(())
    }

    async fn ensure_augmentation_layout(&self) -> Result<bool, CoreError> {
        let aug_root = self.layout.augmentation_root();
        if fs::try_exists(&aug_root).await? {
            debug!("Augmentation 구조 이미 존재: {}", aug_root.display());
            return Ok(false);
        }

        for category in &self.categories {
            fs::create_dir_all(self.layout.log_dir(category)).await?;
            fs::write(self.layout.log_path(category), EMPTY_LOG).await?;
        }

        info!(
            "Augmentation 구조 생성: {} ({}개 카테고리)",
            aug_root.display(),
            self.categories.len()
        );
        Ok(true)
    }

    async fn write_crop(&self, path: &CropPath, crop: &PixelBuffer) -> Result<(), CoreError> {
        let target = path.resolve(self.layout.root());
        let image = RgbImage::from_raw(crop.width(), crop.height(), crop.as_bytes().to_vec())
            .ok_or_else(|| {
                CoreError::InvalidSelection(format!(
                    "크롭 버퍼 크기 불일치: {}x{}",
                    crop.width(),
                    crop.height()
                ))
            })?;

        let write_target = target.clone();
        tokio::task::spawn_blocking(move || write_png(&write_target, &image))
            .await
            .map_err(|e| CoreError::Internal(format!("크롭 저장 작업 실패: {e}")))??;

        debug!(
            "크롭 저장: {} ({}x{})",
            target.display(),
            crop.width(),
            crop.height()
        );
        Ok(())
    }

    async fn list_crop_files(&self, category: &Category) -> Result<Vec<String>, CoreError> {
        let dir = self.layout.category_dir(category);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if has_image_extension(&name, &self.extensions) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn remove_crop(&self, relative_path: &str) -> Result<(), CoreError> {
        let target = self.layout.resolve(checked_relative(relative_path)?);
        fs::remove_file(&target).await?;
        info!("크롭 삭제: {}", target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use painlabel_core::identity::{build_crop_path, FrameNumber};
    use tempfile::TempDir;

    fn store(root: &Path) -> FsCropStore {
        FsCropStore::new(
            StorageLayout::new(root.to_path_buf(), "Augmentation"),
            CategorySet::defaults(),
            vec!["png".to_string(), "jpg".to_string()],
        )
    }

    fn crop() -> PixelBuffer {
        PixelBuffer::new(3, 3, (0..27).collect()).unwrap()
    }

    #[tokio::test]
    async fn category_directory_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let category = Category::new("Indolor").unwrap();
        store.ensure_category_directory(&category).await.unwrap();
        store.ensure_category_directory(&category).await.unwrap();
        assert!(tmp.path().join("Indolor").is_dir());
    }

    #[tokio::test]
    async fn augmentation_layout_created_once() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());

        assert!(store.ensure_augmentation_layout().await.unwrap());
        let log = tmp
            .path()
            .join("Augmentation/Muita dor/Augmentation_Muita dor.json");
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "[]");

        // 이미 있으면 건드리지 않음
        std::fs::write(&log, "[{\"keep\": true}]").unwrap();
        assert!(!store.ensure_augmentation_layout().await.unwrap());
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "[{\"keep\": true}]");
    }

    #[tokio::test]
    async fn write_then_list_and_decode() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let category = Category::new("Incerto").unwrap();
        store.ensure_category_directory(&category).await.unwrap();

        let path = build_crop_path(&category, "vid", FrameNumber::Known(9), 1);
        store.write_crop(&path, &crop()).await.unwrap();

        let files = store.list_crop_files(&category).await.unwrap();
        assert_eq!(files, vec!["frame_9_vid_1.png".to_string()]);

        let decoded = image::open(path.resolve(tmp.path())).unwrap().to_rgb8();
        assert_eq!(decoded.into_raw(), crop().into_bytes());
    }

    #[tokio::test]
    async fn write_refuses_to_replace_existing_crop() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let category = Category::new("Indolor").unwrap();
        store.ensure_category_directory(&category).await.unwrap();

        let path = build_crop_path(&category, "vid", FrameNumber::Known(4), 1);
        store.write_crop(&path, &crop()).await.unwrap();
        let original = std::fs::read(path.resolve(tmp.path())).unwrap();

        let other = PixelBuffer::new(3, 3, vec![200; 27]).unwrap();
        let err = store.write_crop(&path, &other).await.unwrap_err();
        assert!(matches!(err, CoreError::Io(ref io) if io.kind() == ErrorKind::AlreadyExists));
        assert_eq!(std::fs::read(path.resolve(tmp.path())).unwrap(), original);
        assert_eq!(
            store.list_crop_files(&category).await.unwrap(),
            vec!["frame_4_vid_1.png".to_string()]
        );
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let category = Category::new("Indolor").unwrap();
        let path = build_crop_path(&category, "vid", FrameNumber::Known(1), 1);

        let err = store.write_crop(&path, &crop()).await.unwrap_err();
        assert!(matches!(err, CoreError::Io(_) | CoreError::Image(_)));
        assert!(!tmp.path().join("Indolor").exists());
    }

    #[tokio::test]
    async fn list_filters_non_images_and_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let category = Category::new("Indolor").unwrap();
        assert!(store.list_crop_files(&category).await.unwrap().is_empty());

        let dir = tmp.path().join("Indolor");
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.join("a.png"), b"x").unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.join(".c.png.partial"), b"x").unwrap();

        let files = store.list_crop_files(&category).await.unwrap();
        assert_eq!(files, vec!["a.png".to_string(), "b.jpg".to_string()]);
    }

    #[tokio::test]
    async fn remove_rejects_escaping_paths() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        for bad in ["../x.png", "/etc/passwd", ""] {
            assert!(matches!(
                store.remove_crop(bad).await,
                Err(CoreError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let tmp = TempDir::new().unwrap();
        let store = store(tmp.path());
        let dir = tmp.path().join("Incerto");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("f.png"), b"x").unwrap();

        store.remove_crop("Incerto/f.png").await.unwrap();
        assert!(!dir.join("f.png").exists());
        assert!(matches!(
            store.remove_crop("Incerto/f.png").await,
            Err(CoreError::Io(_))
        ));
    }
}
