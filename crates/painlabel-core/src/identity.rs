//! 프레임 식별자와 크롭 경로 파생.
//!
//! 재생 시간(ms)과 FPS로부터 프레임 번호를 계산하고,
//! `<카테고리>/frame_<N>_<영상>_<인덱스>.png` 형태의 경로를 조립한다.
//! 충돌 검사는 하지 않는다. 크롭 인덱스 유일성은 호출 측(캡처 세션) 책임.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::category::Category;

/// 프레임 번호. FPS를 알 수 없으면 `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameNumber {
    Known(u64),
    Unknown,
}

impl FrameNumber {
    pub fn known(self) -> Option<u64> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }
}

/// 경로 구성요소로 안전하게 문자열화 (`unknown` 센티널 포함)
impl fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// `floor(current_time_ms * fps / 1000)`. `fps <= 0`(또는 NaN)이면 `Unknown`.
pub fn derive_frame_number(current_time_ms: u64, fps: f64) -> FrameNumber {
    if !(fps.is_finite() && fps > 0.0) {
        return FrameNumber::Unknown;
    }
    // ms * fps 를 먼저 곱해야 정수 FPS에서 0.7 * 30 같은 반올림 오차가 없다
    let frame = (current_time_ms as f64 * fps / 1000.0).floor();
    FrameNumber::Known(frame as u64)
}

/// 저장될 크롭 파일의 카테고리 상대 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropPath {
    category: Category,
    file_name: String,
}

impl CropPath {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 저장소 루트 기준 상대 경로 (`<카테고리>/<파일명>`)
    pub fn relative(&self) -> PathBuf {
        Path::new(self.category.as_str()).join(&self.file_name)
    }

    /// 레코드 `caminho` 필드에 기록되는 문자열
    pub fn record_path(&self) -> String {
        self.relative().to_string_lossy().into_owned()
    }

    /// 루트 디렉토리에 대한 절대 경로
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.relative())
    }
}

/// 크롭 파일명 (`frame_<N>_<영상>_<인덱스>.png`)
pub fn crop_file_name(video_name: &str, frame_number: FrameNumber, crop_index: u32) -> String {
    format!("frame_{frame_number}_{video_name}_{crop_index}.png")
}

/// [`crop_file_name`] 형식의 파일명에서 크롭 인덱스 추출.
///
/// 영상 이름이나 프레임 번호가 다르면 `None`.
pub fn parse_crop_index(
    file_name: &str,
    video_name: &str,
    frame_number: FrameNumber,
) -> Option<u32> {
    let prefix = format!("frame_{frame_number}_{video_name}_");
    let index = file_name.strip_prefix(prefix.as_str())?.strip_suffix(".png")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

/// 인식 가능한 이미지 확장자인지 (대소문자 무시, `extensions`는 소문자)
pub fn has_image_extension(file_name: &str, extensions: &[String]) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|known| known.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

pub fn build_crop_path(
    category: &Category,
    video_name: &str,
    frame_number: FrameNumber,
    crop_index: u32,
) -> CropPath {
    CropPath {
        category: category.clone(),
        file_name: crop_file_name(video_name, frame_number, crop_index),
    }
}
