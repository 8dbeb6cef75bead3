//! # painlabel-vision
//!
//! 픽셀 측 처리 크레이트.
//! 표시 프레임에서 정사각형 크롭 추출, 픽셀 내용 지문 계산,
//! 카테고리 디렉토리 전역의 내용 기반 중복 제거, 재생 엔진 스냅샷 로드를 담당한다.

pub mod crop;
pub mod dedup;
pub mod fingerprint;
pub mod snapshot;
