//! RGB8 픽셀 버퍼.
//!
//! 코어 레이어는 이미지 크레이트에 의존하지 않으므로
//! 프레임과 크롭 모두 이 평면 버퍼로 주고받는다.

use crate::error::CoreError;

/// 행 우선(row-major) RGB8 픽셀 버퍼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl PixelBuffer {
    /// 채널 수 (RGB)
    pub const CHANNELS: usize = 3;

    /// 크기와 버퍼 길이가 일치하는지 검증 후 생성
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidSelection(format!(
                "크기가 0인 버퍼: {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * Self::CHANNELS;
        if rgb.len() != expected {
            return Err(CoreError::Internal(format!(
                "버퍼 길이 불일치: {} != {expected} ({width}x{height})",
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgb
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_size() {
        assert!(PixelBuffer::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(PixelBuffer::new(2, 2, vec![0; 11]).is_err());
        assert!(PixelBuffer::new(2, 2, vec![0; 12]).is_ok());
    }
}
