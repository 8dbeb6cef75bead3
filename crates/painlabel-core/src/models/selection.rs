//! 운영자가 표시 프레임 위에 그린 정사각형 선택 영역.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::record::Coordinates;

/// 축 정렬 선택 영역. 끝 좌표(`x2`, `y2`)는 포함하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSelection {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropSelection {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 마우스 드래그 시작/끝 점으로부터 정사각형 선택 영역 생성.
    ///
    /// 역방향 드래그를 정렬하고, 한 변은 `min(너비, 높이)`로 맞추며
    /// 좌상단 모서리를 기준점으로 유지한다.
    pub fn from_drag(start: (u32, u32), end: (u32, u32)) -> Self {
        let (x1, x2) = (start.0.min(end.0), start.0.max(end.0));
        let (y1, y2) = (start.1.min(end.1), start.1.max(end.1));
        let side = (x2 - x1).min(y2 - y1);
        Self {
            x1,
            y1,
            x2: x1 + side,
            y2: y1 + side,
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// 이미지 범위 내의 비어 있지 않은 영역인지 검증
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<(), CoreError> {
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(CoreError::InvalidSelection(format!(
                "면적이 0인 선택: ({}, {})-({}, {})",
                self.x1, self.y1, self.x2, self.y2
            )));
        }
        if self.x2 > image_width || self.y2 > image_height {
            return Err(CoreError::InvalidSelection(format!(
                "이미지 범위 초과: ({}, {})-({}, {}) / {}x{}",
                self.x1, self.y1, self.x2, self.y2, image_width, image_height
            )));
        }
        Ok(())
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            x1: self.x1,
            x2: self.x2,
            y1: self.y1,
            y2: self.y2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_is_normalized_to_square() {
        let sel = CropSelection::from_drag((100, 80), (20, 10));
        assert_eq!(sel, CropSelection::new(20, 10, 90, 80));
        assert!(sel.is_square());
        assert_eq!(sel.width(), 70);
    }

    #[test]
    fn zero_area_is_rejected() {
        let sel = CropSelection::from_drag((10, 10), (10, 50));
        assert!(sel.validate(100, 100).is_err());
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let sel = CropSelection::new(50, 50, 120, 120);
        assert!(sel.validate(100, 100).is_err());
        assert!(sel.validate(120, 120).is_ok());
    }

    #[test]
    fn coordinates_map_fields() {
        let c = CropSelection::new(1, 2, 3, 4).coordinates();
        assert_eq!((c.x1, c.x2, c.y1, c.y2), (1, 3, 2, 4));
    }
}
