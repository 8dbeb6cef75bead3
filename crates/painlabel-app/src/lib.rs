//! # painlabel-app
//!
//! 어댑터 와이어링과 사용자 흐름(캡처 저장, 크롭 조회/삭제).
//! `painlabel` 바이너리와 통합 테스트가 함께 사용한다.

pub mod browser;
pub mod capture;
pub mod wiring;
