//! # painlabel-storage
//!
//! 로컬 저장소 어댑터.
//! 카테고리별 크롭 이미지 디렉토리와, `Augmentation/<카테고리>/` 아래의
//! JSON 배열 레코드 로그를 관리한다.
//!
//! ## 모듈
//! - `layout`: 루트 기준 디렉토리/파일 경로 규칙
//! - `category_store`: 크롭 이미지 파일 저장소 (`CropStore` 구현)
//! - `record_log`: 카테고리별 JSON 레코드 로그 (`RecordLog` 구현)
//! - `window`: 캡처 프레임 주변 윈도우 레코드 생성

pub mod category_store;
pub mod layout;
pub mod record_log;
pub mod window;
