//! 캡처 프레임 주변 윈도우 레코드 생성.
//!
//! 다운스트림 데이터 증강을 위해 캡처된 프레임의 앞뒤 이웃 프레임마다
//! 같은 좌표/경로를 가진 레코드를 만든다. 캡처 프레임 자신과
//! 1 미만의 프레임 번호는 제외한다.

use painlabel_core::models::record::{Coordinates, Record};

/// 기본 윈도우 반경 (±10 프레임)
pub const DEFAULT_WINDOW_RADIUS: u32 = 10;

/// 오프셋 `-radius..=radius`(0 제외) 순서로 레코드 생성
///
/// `i64` 범위를 넘는 프레임 번호는 윈도우를 만들지 않는다 (빈 결과).
pub fn build_window_records(
    capture_frame: u64,
    coordinates: Coordinates,
    video_name: &str,
    crop_path: &str,
    radius: u32,
) -> Vec<Record> {
    let radius = i64::from(radius);
    let Ok(capture) = i64::try_from(capture_frame) else {
        return Vec::new();
    };

    (-radius..=radius)
        .filter(|&offset| offset != 0)
        .filter_map(|offset| capture.checked_add(offset))
        .filter_map(|frame| u64::try_from(frame).ok())
        .filter(|&frame| frame >= 1)
        .map(|frame| Record {
            video_name: video_name.to_string(),
            frame,
            coordinates,
            path: crop_path.to_string(),
        })
        .collect()
}
