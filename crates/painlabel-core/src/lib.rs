//! # painlabel-core
//!
//! 통증 강도 프레임 라벨링 도구의 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 카테고리, 메타데이터 레코드, 선택 영역, 픽셀 버퍼
//! - [`identity`] — 프레임 번호 / 크롭 경로 파생 (순수 함수)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod identity;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::record::{Coordinates, Record};

    #[test]
    fn record_serde_uses_log_field_names() {
        let record = Record {
            video_name: "paciente_01".to_string(),
            frame: 42,
            coordinates: Coordinates {
                x1: 10,
                x2: 74,
                y1: 20,
                y2: 84,
            },
            path: "Indolor/frame_41_paciente_01_1.png".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nome do video"], "paciente_01");
        assert_eq!(json["frame"], 42);
        assert_eq!(json["coordenadas"]["x2"], 74);
        assert_eq!(json["caminho"], "Indolor/frame_41_paciente_01_1.png");
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.annotation.window_radius, 10);
        assert_eq!(config.storage.augmentation_dir_name, "Augmentation");
        assert!(config.validate().is_ok());
    }
}
