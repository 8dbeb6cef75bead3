//! Augmentation 메타데이터 레코드.
//!
//! 카테고리별 JSON 배열 로그의 원소. 필드명은 기존 코퍼스와의
//! 파일 호환을 위해 포르투갈어 키를 그대로 사용한다.

use serde::{Deserialize, Serialize};

/// 크롭 영역 좌표 (표시 프레임 기준 픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

/// 캡처 주변 윈도우의 프레임 하나를 설명하는 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 영상 이름
    #[serde(rename = "nome do video")]
    pub video_name: String,
    /// 프레임 번호 (1 이상)
    pub frame: u64,
    /// 크롭 영역
    #[serde(rename = "coordenadas")]
    pub coordinates: Coordinates,
    /// 저장된 크롭 이미지의 상대 경로
    #[serde(rename = "caminho")]
    pub path: String,
}

/// 레코드 식별자: `path`를 제외한 모든 필드.
///
/// `path`는 카테고리(저장 위치)에 따라 달라지므로 중복 판정에서 제외한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordIdentity<'a> {
    pub video_name: &'a str,
    pub frame: u64,
    pub coordinates: Coordinates,
}

impl Record {
    pub fn identity(&self) -> RecordIdentity<'_> {
        RecordIdentity {
            video_name: &self.video_name,
            frame: self.frame,
            coordinates: self.coordinates,
        }
    }

    /// `path`를 제외하고 동일한지
    pub fn same_identity(&self, other: &Record) -> bool {
        self.identity() == other.identity()
    }
}
