//! 픽셀 내용 지문.
//!
//! 크기(너비/높이, LE)와 RGB8 원본 바이트에 대한 SHA-256.

use painlabel_core::models::pixels::PixelBuffer;
use sha2::{Digest, Sha256};
use std::fmt;

/// 32바이트 SHA-256 지문
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(buffer: &PixelBuffer) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(buffer.width().to_le_bytes());
        hasher.update(buffer.height().to_le_bytes());
        hasher.update(buffer.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(w: u32, h: u32, fill: u8) -> PixelBuffer {
        PixelBuffer::new(w, h, vec![fill; (w * h * 3) as usize]).unwrap()
    }

    #[test]
    fn same_pixels_same_fingerprint() {
        assert_eq!(Fingerprint::of(&buffer(4, 4, 9)), Fingerprint::of(&buffer(4, 4, 9)));
    }

    #[test]
    fn one_pixel_changes_fingerprint() {
        let a = buffer(4, 4, 9);
        let mut bytes = a.as_bytes().to_vec();
        bytes[17] ^= 1;
        let b = PixelBuffer::new(4, 4, bytes).unwrap();
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn shape_is_part_of_fingerprint() {
        // 바이트는 같고 모양만 다름 (2x8 vs 4x4)
        assert_ne!(Fingerprint::of(&buffer(2, 8, 0)), Fingerprint::of(&buffer(4, 4, 0)));
    }

    #[test]
    fn hex_is_64_chars() {
        let hex = Fingerprint::of(&buffer(1, 1, 0)).to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
