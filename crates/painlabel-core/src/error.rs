//! painlabel 핵심 에러 타입.
//!
//! 어댑터 crate는 모두 `CoreError`를 그대로 반환한다.
//! 사용자 메시지 처리는 호출 측(UI/CLI) 책임.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 이미지 디코딩/인코딩 실패
    #[error("이미지 에러: {0}")]
    Image(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 선택 영역이 비어 있거나 이미지 범위를 벗어남
    #[error("잘못된 선택 영역: {0}")]
    InvalidSelection(String),

    /// 카테고리 JSON 로그가 존재하지만 파싱 불가 (덮어쓰지 않음)
    #[error("손상된 레코드 로그 ({category}): {message}")]
    CorruptLog {
        /// 로그가 속한 카테고리
        category: String,
        /// 파서 메시지
        message: String,
    },

    /// 같은 영상에 대해 이미 진행 중인 캡처가 있음
    #[error("캡처 진행 중: {0}")]
    CaptureInProgress(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Category")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 필드 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
