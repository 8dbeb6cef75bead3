//! 내용 기반 중복 크롭 제거.
//!
//! `DuplicateDetector` 포트 구현. 주어진 카테고리 디렉토리를 모두 훑어
//! 새 크롭과 지문이 같은 파일을 찾으면 그 파일을 삭제한다.
//! 판정 기준은 파일명이 아닌 픽셀 내용이다. 같은 영역을 다른 세션에서
//! 다시 캡처해도 저장소에는 파일 하나만 남는다.

use async_trait::async_trait;
use painlabel_core::error::CoreError;
use painlabel_core::identity::has_image_extension;
use painlabel_core::models::category::Category;
use painlabel_core::models::pixels::PixelBuffer;
use painlabel_core::ports::vision::DuplicateDetector;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::crop::decode_file;
use crate::fingerprint::Fingerprint;

/// 카테고리 디렉토리 전역 중복 제거기 (`DuplicateDetector` 구현)
pub struct ContentDeduplicator {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ContentDeduplicator {
    /// # Arguments
    /// * `root` - 카테고리 디렉토리들의 부모 디렉토리
    /// * `extensions` - 후보로 인정할 이미지 확장자 (소문자)
    pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
        Self { root, extensions }
    }
}

/// 중복 후보 파일 목록 (이름순). 디렉토리가 없으면 빈 목록.
fn candidate_files(
    dir: &Path,
    video_name: &str,
    extensions: &[String],
) -> Result<Vec<PathBuf>, CoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("카테고리 디렉토리 없음 (건너뜀): {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if has_image_extension(&name, extensions) && name.contains(video_name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}

/// 동기 스캔: 지문이 `target`과 같은 첫 파일 경로 반환.
///
/// 디코딩 실패한 후보는 경고 후 건너뛴다. 파일은 삭제하지 않는다.
pub fn find_duplicate(
    root: &Path,
    categories: &[Category],
    video_name: &str,
    target: Fingerprint,
    extensions: &[String],
) -> Result<Option<PathBuf>, CoreError> {
    let mut scanned = 0usize;
    for category in categories {
        let dir = root.join(category.as_str());
        for path in candidate_files(&dir, video_name, extensions)? {
            scanned += 1;
            match decode_file(&path) {
                Ok(existing) => {
                    if Fingerprint::of(&existing) == target {
                        debug!("지문 일치: {} ({}개 스캔)", path.display(), scanned);
                        return Ok(Some(path));
                    }
                }
                Err(e) => warn!("중복 검사 중 디코딩 실패 (건너뜀): {e}"),
            }
        }
    }
    debug!("중복 없음: {}개 후보 스캔, 지문 {:?}", scanned, target);
    Ok(None)
}

#[async_trait]
impl DuplicateDetector for ContentDeduplicator {
    async fn check_and_evict_duplicate(
        &self,
        crop: &PixelBuffer,
        video_name: &str,
        categories: &[Category],
    ) -> Result<Option<String>, CoreError> {
        let target = Fingerprint::of(crop);

        // 디코딩 + 해시는 CPU 작업이므로 블로킹 풀에서 실행
        let root = self.root.clone();
        let categories = categories.to_vec();
        let video_name = video_name.to_string();
        let extensions = self.extensions.clone();
        let found = tokio::task::spawn_blocking(move || {
            find_duplicate(&root, &categories, &video_name, target, &extensions)
        })
        .await
        .map_err(|e| CoreError::Internal(format!("중복 검사 작업 실패: {e}")))??;

        let Some(path) = found else {
            return Ok(None);
        };
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| {
                CoreError::Internal(format!("루트 밖의 중복 후보: {}", path.display()))
            })?
            .to_string_lossy()
            .into_owned();

        tokio::fs::remove_file(&path).await?;
        info!("중복 이미지 발견, 기존 파일 제거: {}", relative);
        Ok(Some(relative))
    }
}
