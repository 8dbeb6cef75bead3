//! painlabel 도메인 모델.
//!
//! 저장소/비전/앱 크레이트가 공유하는 데이터 구조체.
//! 디스크에 기록되는 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod category;
pub mod pixels;
pub mod record;
pub mod selection;
